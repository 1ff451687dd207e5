//! Scenario: defective documents are rejected with every field named,
//! before any graph is built or backend touched.

use sbmod_control::{ProvisionError, Provisioner};
use sbmod_reconcile::InMemoryBackend;
use sbmod_tests::{minimal, standard_enterprise};
use sbmod_types::{ErrorKind, RawAuthorizationRule, RawNamespaceConfig};
use sbmod_validator::Validator;
use std::sync::Arc;

fn named(sku: &str) -> RawNamespaceConfig {
    let mut raw = RawNamespaceConfig::new("rg-test", "East US");
    raw.location_short = Some("eus".into());
    raw.environment = Some("test".into());
    raw.custom_name = Some("test".into());
    raw.sku = sku.into();
    raw
}

#[test]
fn invalid_sku_is_named() {
    let errors = Validator::default().validate(named("Invalid")).unwrap_err();

    assert!(errors.has("sku", ErrorKind::InvalidEnum));
    assert!(errors.to_string().contains("invalid"));
}

#[test]
fn premium_capacity_twenty_is_out_of_range() {
    let mut raw = named("Premium");
    raw.capacity = Some(20);

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("capacity", ErrorKind::OutOfRange));
    assert!(errors.to_string().contains("invalid"));
}

#[test]
fn premium_accepts_each_messaging_unit_count() {
    for capacity in [1, 2, 4, 8, 16] {
        let mut raw = named("Premium");
        raw.capacity = Some(capacity);
        assert!(
            Validator::default().validate(raw).is_ok(),
            "capacity {} rejected",
            capacity
        );
    }
}

#[test]
fn capacity_above_one_rejected_outside_premium() {
    for sku in ["Basic", "Standard"] {
        let mut raw = named(sku);
        raw.capacity = Some(2);
        let errors = Validator::default().validate(raw).unwrap_err();
        assert!(errors.has("capacity", ErrorKind::OutOfRange), "{}", sku);
    }
}

#[test]
fn tls_below_floor_is_out_of_range() {
    let mut raw = named("Standard");
    raw.minimum_tls_version = "0.9".into();

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("minimum_tls_version", ErrorKind::OutOfRange));

    for version in ["1.2", "1.3"] {
        let mut raw = named("Standard");
        raw.minimum_tls_version = version.into();
        assert!(Validator::default().validate(raw).is_ok(), "{}", version);
    }
}

#[test]
fn rule_without_capability_is_invalid() {
    let mut raw = named("Standard");
    raw.namespace_authorization_rules
        .push(RawAuthorizationRule::new("idle", false, false, false));

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("namespace_authorization_rules[0]", ErrorKind::InvalidRule));
}

#[test]
fn every_defect_is_reported_together() {
    let mut raw = standard_enterprise();
    raw.sku = "Gold".into();
    raw.minimum_tls_version = "1.0".into();
    raw.queues[0].lock_duration = Some("five minutes".into());
    raw.topics[0].authorization_rules[0].listen = false;
    raw.topics[0].authorization_rules[0].send = false;

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("sku", ErrorKind::InvalidEnum));
    assert!(errors.has("minimum_tls_version", ErrorKind::OutOfRange));
    assert!(errors.has("queues[0].lock_duration", ErrorKind::MalformedDuration));
    assert!(errors.has("topics[0].authorization_rules[0]", ErrorKind::InvalidRule));
}

#[tokio::test]
async fn empty_resource_group_never_reaches_backend() {
    let backend = Arc::new(InMemoryBackend::new());
    let provisioner = Provisioner::builder()
        .with_in_memory(backend.clone())
        .build()
        .unwrap();

    let mut raw = minimal();
    raw.resource_group_name = String::new();

    let err = provisioner.plan(raw.clone()).await.unwrap_err();
    match err {
        ProvisionError::Validation(errors) => {
            assert!(errors.has("resource_group_name", ErrorKind::Required));
        }
        other => panic!("unexpected error: {}", other),
    }

    assert!(provisioner.apply(raw).await.is_err());
    assert_eq!(backend.applied_count(), 0);
}
