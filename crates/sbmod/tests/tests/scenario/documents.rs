//! Scenario: documents parsed from JSON and YAML text.

use sbmod_control::{parse_document, DocumentFormat, ProvisionError, Provisioner};
use sbmod_reconcile::InMemoryBackend;
use std::sync::Arc;

const MINIMAL_JSON: &str = r#"{"resource_group_name": "test-rg", "location": "West Europe"}"#;

const STANDARD_YAML: &str = r#"
resource_group_name: rg-sb-test
location: East US
location_short: eus
environment: test
custom_name: yamlns
queues:
  - name: test-queue
    lock_duration: PT1M
    authorization_rules:
      - name: test-queue-rule
        listen: true
        send: true
topics:
  - name: test-topic
    subscriptions:
      - name: test-subscription
        rules:
          - name: only-orders
            filter_type: CorrelationFilter
            correlation_filter:
              label: order
"#;

#[tokio::test]
async fn minimal_document_plans() {
    let raw = parse_document(MINIMAL_JSON, DocumentFormat::Json).unwrap();
    let provisioner = Provisioner::builder()
        .with_in_memory(Arc::new(InMemoryBackend::new()))
        .build()
        .unwrap();

    let outcome = provisioner.plan(raw).await.unwrap();
    assert!(outcome.plan.summary().starts_with("Plan:"));
    assert!(outcome.plan.to_string().contains("Plan:"));
    assert_eq!(outcome.plan.creates(), 1);
    assert_eq!(outcome.config.name, "sb-dev-westeurope");
}

#[test]
fn yaml_document_validates() {
    let raw = parse_document(STANDARD_YAML, DocumentFormat::Yaml).unwrap();
    let config = sbmod_validator::Validator::default().validate(raw).unwrap();

    assert_eq!(config.name, "sb-test-yamlns");
    let rule = &config.topics[0].subscriptions[0].rules[0];
    assert_eq!(rule.name, "only-orders");
}

#[test]
fn unknown_keys_are_parse_errors() {
    let err = parse_document(
        r#"{"resource_group_name": "rg", "location": "x", "queues": [{"name": "q", "ttl": "P1D"}]}"#,
        DocumentFormat::Json,
    )
    .unwrap_err();
    assert!(matches!(err, ProvisionError::Parse { format: "JSON", .. }));

    let err = parse_document("resource_group_name: rg\nskew: Premium\n", DocumentFormat::Yaml)
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Parse { format: "YAML", .. }));
}
