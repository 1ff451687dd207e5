//! Property tests: building is deterministic and reconciling a desired
//! graph against itself plans nothing.

use proptest::prelude::*;
use sbmod_graph::GraphBuilder;
use sbmod_reconcile::{reconcile, PlanAction};
use sbmod_types::{
    RawAuthorizationRule, RawNamespaceConfig, RawQueueConfig, RawSubscriptionConfig,
    RawTopicConfig,
};
use sbmod_validator::Validator;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_names(max: usize) -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z][a-z0-9-]{2,12}", 0..max)
}

/// Queue and topic names drawn from one set; they share a namespace scope
fn arb_entity_names() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    (arb_names(9), 0..5usize).prop_map(|(names, split)| {
        let mut queues: Vec<String> = names.into_iter().collect();
        let topics = queues.split_off(split.min(queues.len()));
        (queues, topics)
    })
}

fn arb_document() -> impl Strategy<Value = RawNamespaceConfig> {
    (
        arb_entity_names(),
        arb_names(3),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|((queues, topics), subscriptions, session, lock)| {
            let mut raw = RawNamespaceConfig::new("rg-prop", "North Europe");
            raw.environment = Some("prop".into());
            raw.enable_resource_lock = lock;

            raw.queues = queues
                .into_iter()
                .map(|name| RawQueueConfig {
                    requires_session: session,
                    authorization_rules: vec![RawAuthorizationRule::new(
                        format!("{}-send", name),
                        false,
                        true,
                        false,
                    )],
                    ..RawQueueConfig::named(name)
                })
                .collect();

            raw.topics = topics
                .into_iter()
                .map(|name| RawTopicConfig {
                    subscriptions: subscriptions
                        .iter()
                        .cloned()
                        .map(RawSubscriptionConfig::named)
                        .collect(),
                    ..RawTopicConfig::named(name)
                })
                .collect();
            raw
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn build_is_deterministic(raw in arb_document()) {
        let config = Validator::default().validate(raw).unwrap();
        let builder = GraphBuilder::default();

        let first = builder.build(&config);
        let second = builder.build(&config);
        prop_assert_eq!(&first, &second);

        let order = |g: &sbmod_graph::ResourceGraph| {
            g.nodes().into_iter().map(|n| n.id.clone()).collect::<Vec<_>>()
        };
        prop_assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn reconcile_against_self_is_all_noop(raw in arb_document()) {
        let config = Validator::default().validate(raw).unwrap();
        let graph = GraphBuilder::default().build(&config);

        let plan = reconcile(&graph, Some(&graph));
        prop_assert!(plan.is_converged());
        prop_assert_eq!(plan.len(), graph.len());
        prop_assert!(plan.operations().iter().all(|op| op.action == PlanAction::NoOp));
        prop_assert!(plan.retained().is_empty());
    }

    #[test]
    fn first_plan_creates_parents_before_children(raw in arb_document()) {
        let config = Validator::default().validate(raw).unwrap();
        let graph = GraphBuilder::default().build(&config);
        let plan = reconcile(&graph, None);

        prop_assert_eq!(plan.creates(), graph.len());
        let mut seen = BTreeSet::new();
        for op in plan.operations() {
            if let Some(parent) = &op.parent {
                prop_assert!(seen.contains(parent), "{} planned before its parent", op.id());
            }
            seen.insert(op.id().clone());
        }
    }
}
