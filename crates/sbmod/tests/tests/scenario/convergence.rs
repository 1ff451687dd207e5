//! Scenario: apply, re-plan, partial failure and shrinking desired state.

use anyhow::Result;
use sbmod_control::{EngineConfig, ProvisionError, Provisioner};
use sbmod_reconcile::{InMemoryBackend, NodeOutcome, PlanAction};
use sbmod_tests::{standard_enterprise, STANDARD_NAMESPACE};
use sbmod_types::{NodeId, NodeKind};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> (Provisioner, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let provisioner = Provisioner::builder()
        .with_in_memory(backend.clone())
        .build()
        .unwrap();
    (provisioner, backend)
}

fn namespace() -> NodeId {
    NodeId::namespace(STANDARD_NAMESPACE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn apply_then_replan_is_converged() -> Result<()> {
    let (provisioner, backend) = setup();

    let first = provisioner.apply(standard_enterprise()).await?.ensure_applied()?;
    assert_eq!(first.report.applied(), 8);

    let second = provisioner.plan(standard_enterprise()).await?;
    assert!(second.plan.is_converged());
    assert_eq!(second.plan.no_ops(), 8);
    assert_eq!(backend.applied_count(), 8);
    Ok(())
}

#[tokio::test]
async fn changed_attribute_plans_an_update() -> Result<()> {
    let (provisioner, _backend) = setup();
    provisioner.apply(standard_enterprise()).await?.ensure_applied()?;

    let mut raw = standard_enterprise();
    raw.queues[0].max_delivery_count = Some(20);
    let outcome = provisioner.plan(raw).await?;

    assert_eq!(outcome.plan.updates(), 1);
    let queue = namespace().child(NodeKind::Queue, "test-queue");
    match outcome.plan.action_for(&queue) {
        Some(PlanAction::Update { changed }) => {
            assert!(changed.contains("max_delivery_count"));
        }
        other => panic!("expected update, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn failed_topic_skips_its_subscriptions_only() -> Result<()> {
    let (provisioner, backend) = setup();
    let topic = namespace().child(NodeKind::Topic, "test-topic");
    let subscription = topic.child(NodeKind::Subscription, "test-subscription");
    let queue = namespace().child(NodeKind::Queue, "test-queue");
    backend.fail_on(topic.clone(), "quota exceeded");

    let outcome = provisioner.apply(standard_enterprise()).await?;
    let report = &outcome.report;

    assert!(matches!(report.outcome_for(&topic), Some(NodeOutcome::Failed(_))));
    assert!(matches!(
        report.outcome_for(&subscription),
        Some(NodeOutcome::Skipped { blocked_by }) if *blocked_by == topic
    ));
    assert!(matches!(report.outcome_for(&queue), Some(NodeOutcome::Applied(_))));
    assert!(matches!(outcome.ensure_applied(), Err(ProvisionError::Apply(_))));

    // The queue side stays applied; a retry creates only what was missing.
    backend.clear_failures();
    let retry = provisioner.apply(standard_enterprise()).await?.ensure_applied()?;
    assert_eq!(retry.plan.action_for(&queue), Some(&PlanAction::NoOp));
    assert_eq!(retry.plan.action_for(&topic), Some(&PlanAction::Create));
    Ok(())
}

#[tokio::test]
async fn stop_on_first_failure_skips_the_rest() -> Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    let mut config = EngineConfig::default();
    config.apply.stop_on_first_failure = true;
    let provisioner = Provisioner::builder()
        .with_config(config)
        .with_in_memory(backend.clone())
        .build()?;

    let queue = namespace().child(NodeKind::Queue, "test-queue");
    backend.fail_on(queue, "quota exceeded");

    let outcome = provisioner.apply(standard_enterprise()).await?;
    let topic = namespace().child(NodeKind::Topic, "test-topic");
    assert!(matches!(
        outcome.report.outcome_for(&topic),
        Some(NodeOutcome::Skipped { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn disabled_feature_is_retained_not_deleted() -> Result<()> {
    let (provisioner, backend) = setup();

    let mut raw = standard_enterprise();
    raw.enable_resource_lock = true;
    provisioner.apply(raw).await?.ensure_applied()?;

    let feature = namespace().child(NodeKind::Feature, "resource_lock");
    assert!(backend
        .snapshot(STANDARD_NAMESPACE)
        .is_some_and(|graph| graph.contains(&feature)));

    let outcome = provisioner.plan(standard_enterprise()).await?;
    assert!(outcome.plan.is_converged());
    assert_eq!(outcome.plan.retained(), &[feature.clone()]);
    assert!(outcome.plan.action_for(&feature).is_none());
    Ok(())
}

#[tokio::test]
async fn concurrent_applies_create_each_node_once() -> Result<()> {
    let (provisioner, backend) = setup();
    let provisioner = Arc::new(provisioner);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let provisioner = provisioner.clone();
        handles.push(tokio::spawn(async move {
            provisioner.apply(standard_enterprise()).await
        }));
    }
    for handle in handles {
        assert!(handle.await??.is_success());
    }

    assert_eq!(backend.applied_count(), 8);
    Ok(())
}
