//! Scenario: a fully populated Standard namespace validates, plans and
//! projects every declared resource.

use sbmod_control::Provisioner;
use sbmod_graph::GraphBuilder;
use sbmod_output::keys;
use sbmod_reconcile::{InMemoryBackend, PlanAction};
use sbmod_tests::{standard_enterprise, STANDARD_NAMESPACE};
use sbmod_types::{NodeId, NodeKind};
use sbmod_validator::Validator;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn provisioner() -> Provisioner {
    Provisioner::builder()
        .with_in_memory(Arc::new(InMemoryBackend::new()))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn standard_document_has_no_field_errors() {
    let config = Validator::default().validate(standard_enterprise()).unwrap();

    assert_eq!(config.name, STANDARD_NAMESPACE);
    assert_eq!(config.capacity, 1);
    assert_eq!(config.queues.len(), 1);
    assert_eq!(config.topics[0].subscriptions.len(), 1);
}

#[test]
fn graph_build_is_deterministic() {
    let config = Validator::default().validate(standard_enterprise()).unwrap();
    let builder = GraphBuilder::default();

    let first = builder.build(&config);
    let second = builder.build(&config);
    assert_eq!(first, second);

    let ids = |g: &sbmod_graph::ResourceGraph| {
        g.nodes().into_iter().map(|n| n.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn first_plan_creates_every_node() {
    let outcome = provisioner().plan(standard_enterprise()).await.unwrap();

    // namespace, 3 authorization rules, queue, topic, subscription, rule
    assert_eq!(outcome.plan.creates(), 8);
    assert_eq!(outcome.plan.updates(), 0);
    assert!(outcome.plan.retained().is_empty());

    let rule = NodeId::namespace(STANDARD_NAMESPACE)
        .child(NodeKind::Topic, "test-topic")
        .child(NodeKind::Subscription, "test-subscription")
        .child(NodeKind::Rule, "test-rule");
    assert_eq!(outcome.plan.action_for(&rule), Some(&PlanAction::Create));
}

#[tokio::test]
async fn outputs_name_every_declared_resource() {
    let outcome = provisioner().apply(standard_enterprise()).await.unwrap();
    assert!(outcome.is_success());

    let outputs = &outcome.outputs;
    assert_eq!(outputs.scalar(keys::NAMESPACE_NAME), Some(STANDARD_NAMESPACE));
    assert!(!outputs.scalar(keys::NAMESPACE_ID).unwrap().is_empty());
    assert_eq!(outputs.scalar(keys::SKU), Some("Standard"));
    assert_eq!(outputs.scalar(keys::CAPACITY), Some("1"));
    assert_eq!(outputs.scalar(keys::MANAGED_IDENTITY_ENABLED), Some("true"));
    assert_eq!(outputs.scalar(keys::IDENTITY), Some("SystemAssigned"));

    assert!(outputs.contains_resource(keys::QUEUES, "test-queue"));
    assert!(outputs.contains_resource(keys::TOPICS, "test-topic"));
    assert!(outputs.contains_resource(keys::SUBSCRIPTIONS, "test-subscription"));
    assert!(outputs.contains_resource(keys::NAMESPACE_AUTH_RULES, "test-namespace-rule"));
    assert!(outputs.contains_resource(keys::QUEUE_AUTH_RULES, "test-queue-rule"));
    assert!(outputs.contains_resource(keys::TOPIC_AUTH_RULES, "test-topic-rule"));

    let map = |key: &str| outputs.map(key).unwrap();
    assert!(map(keys::NAMESPACE_AUTH_RULES).contains_key("test-namespace-rule"));
    assert!(map(keys::QUEUE_AUTH_RULES).contains_key("test-queue-rule"));
    assert!(map(keys::TOPIC_AUTH_RULES).contains_key("test-topic-rule"));
    assert_eq!(map(keys::QUEUE_AUTH_RULES).len(), 1);

    for key in keys::ALL {
        assert!(outputs.get(key).is_some(), "missing output {}", key);
    }
}

#[tokio::test]
async fn subscription_outputs_are_keyed_by_topic() {
    let outcome = provisioner().plan(standard_enterprise()).await.unwrap();
    let subscriptions = outcome.outputs.map(keys::SUBSCRIPTIONS).unwrap();

    assert!(subscriptions.contains_key("test-topic/test-subscription"));
    let projected = &subscriptions["test-topic/test-subscription"];
    assert_eq!(projected.name, "test-subscription");
    assert!(projected.id.ends_with("/subscriptions/test-subscription"));
}
