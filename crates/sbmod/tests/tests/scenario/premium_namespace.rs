//! Scenario: a partitioned Premium namespace with duplicate detection.

use sbmod_control::Provisioner;
use sbmod_output::keys;
use sbmod_reconcile::InMemoryBackend;
use sbmod_tests::{premium, PREMIUM_NAMESPACE};
use sbmod_types::{ErrorKind, Sku};
use sbmod_validator::Validator;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn premium_document_is_accepted() {
    let config = Validator::default().validate(premium()).unwrap();

    assert_eq!(config.sku, Sku::Premium);
    assert_eq!(config.capacity, 2);
    assert_eq!(config.premium_messaging_partitions, 2);

    let queue = &config.queues[0];
    assert!(queue.requires_duplicate_detection);
    assert_eq!(
        queue
            .duplicate_detection_history_time_window
            .as_ref()
            .map(|w| w.as_duration()),
        Some(Duration::from_secs(15 * 60))
    );
}

#[tokio::test]
async fn premium_outputs_report_tier_and_capacity() {
    let provisioner = Provisioner::builder()
        .with_in_memory(Arc::new(InMemoryBackend::new()))
        .build()
        .unwrap();

    let outcome = provisioner.apply(premium()).await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.outputs.scalar(keys::NAMESPACE_NAME), Some(PREMIUM_NAMESPACE));
    assert_eq!(outcome.outputs.scalar(keys::SKU), Some("Premium"));
    assert_eq!(outcome.outputs.scalar(keys::CAPACITY), Some("2"));
}

#[test]
fn partitions_cannot_exceed_capacity() {
    let mut raw = premium();
    raw.capacity = Some(1);

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("premium_messaging_partitions", ErrorKind::OutOfRange));
}

#[test]
fn sessions_rejected_on_basic() {
    let mut raw = premium();
    raw.sku = "Basic".into();
    raw.capacity = None;
    raw.premium_messaging_partitions = None;
    raw.topics.clear();
    raw.queues[0].requires_duplicate_detection = false;
    raw.queues[0].requires_session = true;

    let errors = Validator::default().validate(raw).unwrap_err();
    assert!(errors.has("queues[0].requires_session", ErrorKind::UnsupportedByTier));
}
