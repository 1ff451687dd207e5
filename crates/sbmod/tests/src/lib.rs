//! Shared fixtures for the SBMOD scenario and property suites.
//!
//! Documents here mirror the deployments the module is acceptance-tested
//! with: a fully populated Standard namespace and a partitioned Premium one.

use sbmod_types::{
    RawAuthorizationRule, RawNamespaceConfig, RawQueueConfig, RawRuleConfig, RawSqlFilter,
    RawSubscriptionConfig, RawTopicConfig,
};

/// Name the Standard fixture resolves to
pub const STANDARD_NAMESPACE: &str = "sb-test-enterprise";

/// Name the Premium fixture resolves to
pub const PREMIUM_NAMESPACE: &str = "sb-test-premium";

fn base(resource_group: &str, custom_name: &str) -> RawNamespaceConfig {
    let mut raw = RawNamespaceConfig::new(resource_group, "East US");
    raw.location_short = Some("eus".into());
    raw.environment = Some("test".into());
    raw.custom_name = Some(custom_name.into());
    raw
}

/// Standard namespace with one queue, one topic, one subscription and
/// authorization rules at every level
pub fn standard_enterprise() -> RawNamespaceConfig {
    let mut raw = base("rg-sb-test", "enterprise");
    raw.sku = "Standard".into();
    raw.capacity = Some(1);
    raw.enable_managed_identity = true;

    raw.queues.push(RawQueueConfig {
        authorization_rules: vec![RawAuthorizationRule::new("test-queue-rule", true, true, false)],
        lock_duration: Some("PT5M".into()),
        max_size_in_megabytes: Some(1024),
        duplicate_detection_history_time_window: Some("PT10M".into()),
        default_message_ttl: Some("P14D".into()),
        max_delivery_count: Some(10),
        status: Some("Active".into()),
        ..RawQueueConfig::named("test-queue")
    });

    let mut subscription = RawSubscriptionConfig::named("test-subscription");
    subscription.rules.push(RawRuleConfig {
        name: "test-rule".into(),
        filter_type: "SqlFilter".into(),
        sql_filter: Some(RawSqlFilter {
            sql_expression: "1=1".into(),
        }),
        ..Default::default()
    });
    subscription.max_delivery_count = Some(10);
    subscription.lock_duration = Some("PT5M".into());
    subscription.default_message_ttl = Some("P14D".into());
    subscription.status = Some("Active".into());

    raw.topics.push(RawTopicConfig {
        authorization_rules: vec![RawAuthorizationRule::new("test-topic-rule", true, true, false)],
        subscriptions: vec![subscription],
        status: Some("Active".into()),
        auto_delete_on_idle: Some("P10675199DT2H48M5.477S".into()),
        default_message_ttl: Some("P14D".into()),
        duplicate_detection_history_time_window: Some("PT10M".into()),
        max_size_in_megabytes: Some(1024),
        ..RawTopicConfig::named("test-topic")
    });

    raw.namespace_authorization_rules
        .push(RawAuthorizationRule::new("test-namespace-rule", true, true, false));
    raw
}

/// Premium namespace with two messaging units and two partitions
pub fn premium() -> RawNamespaceConfig {
    let mut raw = base("rg-sb-premium-test", "premium");
    raw.sku = "Premium".into();
    raw.capacity = Some(2);
    raw.premium_messaging_partitions = Some(2);
    raw.enable_managed_identity = true;

    raw.queues.push(RawQueueConfig {
        max_size_in_megabytes: Some(2048),
        requires_duplicate_detection: true,
        duplicate_detection_history_time_window: Some("PT15M".into()),
        max_delivery_count: Some(5),
        ..RawQueueConfig::named("premium-queue")
    });

    let mut subscription = RawSubscriptionConfig::named("premium-subscription");
    subscription.max_delivery_count = Some(5);
    subscription.requires_session = true;

    raw.topics.push(RawTopicConfig {
        max_size_in_megabytes: Some(2048),
        requires_duplicate_detection: true,
        duplicate_detection_history_time_window: Some("PT15M".into()),
        subscriptions: vec![subscription],
        ..RawTopicConfig::named("premium-topic")
    });
    raw
}

/// Smallest accepted document: every optional field at its default
pub fn minimal() -> RawNamespaceConfig {
    RawNamespaceConfig::new("test-rg", "West Europe")
}
