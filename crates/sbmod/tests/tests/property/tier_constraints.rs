//! Property tests: tier-dependent limits come from the catalog and every
//! violation is named by field.

use proptest::prelude::*;
use sbmod_catalog::ConstraintCatalog;
use sbmod_types::{ErrorKind, RawAuthorizationRule, RawNamespaceConfig, Sku, TlsVersion};
use sbmod_validator::Validator;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn document(sku: Sku) -> RawNamespaceConfig {
    let mut raw = RawNamespaceConfig::new("rg-prop", "East US");
    raw.environment = Some("prop".into());
    raw.custom_name = Some("tiers".into());
    raw.sku = sku.as_str().into();
    raw
}

fn arb_unmetered_sku() -> impl Strategy<Value = Sku> {
    prop_oneof![Just(Sku::Basic), Just(Sku::Standard)]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn capacity_above_one_rejected_outside_premium(
        sku in arb_unmetered_sku(),
        capacity in 2u32..1000,
    ) {
        let mut raw = document(sku);
        raw.capacity = Some(capacity);

        let errors = Validator::default().validate(raw).unwrap_err();
        prop_assert!(errors.has("capacity", ErrorKind::OutOfRange));
    }

    #[test]
    fn premium_capacity_matches_catalog(capacity in 0u32..64) {
        let mut raw = document(Sku::Premium);
        raw.capacity = Some(capacity);

        let allowed = ConstraintCatalog::standard()
            .profile(Sku::Premium)
            .allowed_capacities()
            .contains(&capacity);
        let result = Validator::default().validate(raw);

        match result {
            Ok(config) => {
                prop_assert!(allowed);
                prop_assert_eq!(config.capacity, capacity);
            }
            Err(errors) => {
                prop_assert!(!allowed);
                prop_assert!(errors.has("capacity", ErrorKind::OutOfRange));
            }
        }
    }

    #[test]
    fn tls_versions_ordered_against_floor(major in 0u16..3, minor in 0u16..12) {
        let mut raw = document(Sku::Standard);
        raw.minimum_tls_version = format!("{}.{}", major, minor);

        let accepted = TlsVersion::new(major, minor) >= TlsVersion::V1_2;
        let result = Validator::default().validate(raw);
        if accepted {
            prop_assert!(result.is_ok());
        } else {
            let errors = result.unwrap_err();
            prop_assert!(errors.has("minimum_tls_version", ErrorKind::OutOfRange));
        }
    }

    #[test]
    fn rule_valid_iff_it_grants_something(
        listen in any::<bool>(),
        send in any::<bool>(),
        manage in any::<bool>(),
    ) {
        let mut raw = document(Sku::Standard);
        raw.namespace_authorization_rules
            .push(RawAuthorizationRule::new("rule", listen, send, manage));

        let grants = listen || send || manage;
        match Validator::default().validate(raw) {
            Ok(_) => prop_assert!(grants),
            Err(errors) => {
                prop_assert!(!grants);
                prop_assert!(errors.has("namespace_authorization_rules[0]", ErrorKind::InvalidRule));
            }
        }
    }
}
