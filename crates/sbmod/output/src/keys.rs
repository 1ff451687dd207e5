//! Output key names

pub const NAMESPACE_ID: &str = "servicebus_namespace_id";
pub const NAMESPACE_NAME: &str = "servicebus_namespace_name";
pub const SKU: &str = "servicebus_sku";
pub const CAPACITY: &str = "servicebus_capacity";
pub const QUEUES: &str = "servicebus_queues";
pub const TOPICS: &str = "servicebus_topics";
/// Keyed `topic/subscription`
pub const SUBSCRIPTIONS: &str = "servicebus_subscriptions";
pub const NAMESPACE_AUTH_RULES: &str = "servicebus_namespace_auth_rules";
/// Keyed by rule name, unique across queues
pub const QUEUE_AUTH_RULES: &str = "servicebus_queue_auth_rules";
/// Keyed by rule name, unique across topics
pub const TOPIC_AUTH_RULES: &str = "servicebus_topic_auth_rules";
pub const IDENTITY: &str = "servicebus_identity";
pub const MANAGED_IDENTITY_ENABLED: &str = "servicebus_managed_identity_enabled";

/// Every key emitted for a graph with a namespace
pub const ALL: [&str; 12] = [
    NAMESPACE_ID,
    NAMESPACE_NAME,
    SKU,
    CAPACITY,
    QUEUES,
    TOPICS,
    SUBSCRIPTIONS,
    NAMESPACE_AUTH_RULES,
    QUEUE_AUTH_RULES,
    TOPIC_AUTH_RULES,
    IDENTITY,
    MANAGED_IDENTITY_ENABLED,
];
