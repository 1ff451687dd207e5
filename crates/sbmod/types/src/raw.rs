//! Raw configuration documents
//!
//! These mirror the module's input variables one-to-one. Unknown keys are
//! rejected at parse time; categorical and duration values stay strings so
//! that a bad value is reported by the validator alongside every other
//! defect instead of aborting deserialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace-level input document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawNamespaceConfig {
    #[serde(default)]
    pub resource_group_name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub location_short: Option<String>,

    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub custom_name: Option<String>,

    #[serde(default = "default_sku")]
    pub sku: String,

    #[serde(default)]
    pub capacity: Option<u32>,

    #[serde(default)]
    pub premium_messaging_partitions: Option<u32>,

    #[serde(default = "default_tls")]
    pub minimum_tls_version: String,

    #[serde(default = "default_true")]
    pub public_network_access_enabled: bool,

    #[serde(default = "default_true")]
    pub local_auth_enabled: bool,

    #[serde(default)]
    pub enable_managed_identity: bool,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub queues: Vec<RawQueueConfig>,

    #[serde(default)]
    pub topics: Vec<RawTopicConfig>,

    #[serde(default)]
    pub namespace_authorization_rules: Vec<RawAuthorizationRule>,

    #[serde(default)]
    pub enable_network_rules: bool,

    #[serde(default)]
    pub enable_private_endpoint: bool,

    #[serde(default)]
    pub enable_diagnostic_settings: bool,

    #[serde(default)]
    pub enable_policy_assignments: bool,

    #[serde(default)]
    pub enable_custom_policies: bool,

    #[serde(default)]
    pub enable_policy_initiative: bool,

    #[serde(default)]
    pub enable_resource_lock: bool,
}

impl RawNamespaceConfig {
    /// A minimal document with every optional field at its default
    pub fn new(resource_group_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            resource_group_name: resource_group_name.into(),
            location: location.into(),
            location_short: None,
            environment: None,
            custom_name: None,
            sku: default_sku(),
            capacity: None,
            premium_messaging_partitions: None,
            minimum_tls_version: default_tls(),
            public_network_access_enabled: true,
            local_auth_enabled: true,
            enable_managed_identity: false,
            tags: BTreeMap::new(),
            queues: Vec::new(),
            topics: Vec::new(),
            namespace_authorization_rules: Vec::new(),
            enable_network_rules: false,
            enable_private_endpoint: false,
            enable_diagnostic_settings: false,
            enable_policy_assignments: false,
            enable_custom_policies: false,
            enable_policy_initiative: false,
            enable_resource_lock: false,
        }
    }
}

/// Queue entry in `queues`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawQueueConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub authorization_rules: Vec<RawAuthorizationRule>,

    #[serde(default)]
    pub lock_duration: Option<String>,

    #[serde(default)]
    pub max_size_in_megabytes: Option<u32>,

    #[serde(default)]
    pub requires_duplicate_detection: bool,

    #[serde(default)]
    pub duplicate_detection_history_time_window: Option<String>,

    #[serde(default)]
    pub requires_session: bool,

    #[serde(default)]
    pub default_message_ttl: Option<String>,

    #[serde(default)]
    pub dead_lettering_on_message_expiration: bool,

    #[serde(default)]
    pub max_delivery_count: Option<u32>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub auto_delete_on_idle: Option<String>,
}

impl RawQueueConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Topic entry in `topics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTopicConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub authorization_rules: Vec<RawAuthorizationRule>,

    #[serde(default)]
    pub subscriptions: Vec<RawSubscriptionConfig>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub auto_delete_on_idle: Option<String>,

    #[serde(default)]
    pub default_message_ttl: Option<String>,

    #[serde(default)]
    pub duplicate_detection_history_time_window: Option<String>,

    #[serde(default)]
    pub max_size_in_megabytes: Option<u32>,

    #[serde(default)]
    pub requires_duplicate_detection: bool,

    #[serde(default)]
    pub support_ordering: bool,
}

impl RawTopicConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Subscription entry in a topic's `subscriptions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSubscriptionConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub rules: Vec<RawRuleConfig>,

    #[serde(default)]
    pub max_delivery_count: Option<u32>,

    #[serde(default)]
    pub lock_duration: Option<String>,

    #[serde(default)]
    pub dead_lettering_on_message_expiration: bool,

    #[serde(default = "default_true")]
    pub dead_lettering_on_filter_evaluation_error: bool,

    #[serde(default)]
    pub default_message_ttl: Option<String>,

    #[serde(default)]
    pub requires_session: bool,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub auto_delete_on_idle: Option<String>,
}

impl RawSubscriptionConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            max_delivery_count: None,
            lock_duration: None,
            dead_lettering_on_message_expiration: false,
            dead_lettering_on_filter_evaluation_error: true,
            default_message_ttl: None,
            requires_session: false,
            status: None,
            auto_delete_on_idle: None,
        }
    }
}

/// Filter rule entry in a subscription's `rules`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRuleConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub filter_type: String,

    #[serde(default)]
    pub sql_filter: Option<RawSqlFilter>,

    #[serde(default)]
    pub correlation_filter: Option<RawCorrelationFilter>,

    /// SQL action applied to matching messages
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSqlFilter {
    #[serde(default)]
    pub sql_expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCorrelationFilter {
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub reply_to_session_id: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Authorization rule entry, at namespace, queue or topic level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAuthorizationRule {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub listen: bool,

    #[serde(default)]
    pub send: bool,

    #[serde(default)]
    pub manage: bool,
}

impl RawAuthorizationRule {
    pub fn new(name: impl Into<String>, listen: bool, send: bool, manage: bool) -> Self {
        Self {
            name: name.into(),
            listen,
            send,
            manage,
        }
    }
}

fn default_sku() -> String {
    "Standard".to_string()
}

fn default_tls() -> String {
    "1.2".to_string()
}

fn default_true() -> bool {
    true
}
