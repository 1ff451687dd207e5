//! Validated configuration model
//!
//! Produced by the validator from a [`RawNamespaceConfig`](crate::RawNamespaceConfig).
//! Every value here is typed, defaulted and checked against the catalog.

use crate::{IsoDuration, TlsVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Service tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sku {
    Basic,
    Standard,
    Premium,
}

impl Sku {
    pub const ALL: [Sku; 3] = [Sku::Basic, Sku::Standard, Sku::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sku::Basic => "Basic",
            Sku::Standard => "Standard",
            Sku::Premium => "Premium",
        }
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sku {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sku::ALL
            .into_iter()
            .find(|sku| sku.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Entity status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityStatus {
    #[default]
    Active,
    Creating,
    Deleting,
    Disabled,
    ReceiveDisabled,
    Renaming,
    SendDisabled,
    Unknown,
}

impl EntityStatus {
    pub const ALL: [EntityStatus; 8] = [
        EntityStatus::Active,
        EntityStatus::Creating,
        EntityStatus::Deleting,
        EntityStatus::Disabled,
        EntityStatus::ReceiveDisabled,
        EntityStatus::Renaming,
        EntityStatus::SendDisabled,
        EntityStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "Active",
            EntityStatus::Creating => "Creating",
            EntityStatus::Deleting => "Deleting",
            EntityStatus::Disabled => "Disabled",
            EntityStatus::ReceiveDisabled => "ReceiveDisabled",
            EntityStatus::Renaming => "Renaming",
            EntityStatus::SendDisabled => "SendDisabled",
            EntityStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Subscription rule filter kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    SqlFilter,
    CorrelationFilter,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::SqlFilter => "SqlFilter",
            FilterType::CorrelationFilter => "CorrelationFilter",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SqlFilter" => Ok(FilterType::SqlFilter),
            "CorrelationFilter" => Ok(FilterType::CorrelationFilter),
            other => Err(other.to_string()),
        }
    }
}

/// Optional namespace add-ons switched on by `enable_*` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    NetworkRules,
    PrivateEndpoint,
    DiagnosticSettings,
    PolicyAssignments,
    CustomPolicies,
    PolicyInitiative,
    ResourceLock,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::NetworkRules => "network_rules",
            Feature::PrivateEndpoint => "private_endpoint",
            Feature::DiagnosticSettings => "diagnostic_settings",
            Feature::PolicyAssignments => "policy_assignments",
            Feature::CustomPolicies => "custom_policies",
            Feature::PolicyInitiative => "policy_initiative",
            Feature::ResourceLock => "resource_lock",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an authorization rule is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthScope {
    Namespace,
    Queue(String),
    Topic(String),
}

impl fmt::Display for AuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScope::Namespace => f.write_str("namespace"),
            AuthScope::Queue(name) => write!(f, "queue {}", name),
            AuthScope::Topic(name) => write!(f, "topic {}", name),
        }
    }
}

/// A named listen/send/manage grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRule {
    pub name: String,
    pub scope: AuthScope,
    pub listen: bool,
    pub send: bool,
    pub manage: bool,
}

impl AuthorizationRule {
    /// Build a rule, applying the provider's rule that `manage` implies
    /// `listen` and `send`.
    pub fn new(name: impl Into<String>, scope: AuthScope, listen: bool, send: bool, manage: bool) -> Self {
        Self {
            name: name.into(),
            scope,
            listen: listen || manage,
            send: send || manage,
            manage,
        }
    }

    /// Granted rights in provider order
    pub fn rights(&self) -> Vec<&'static str> {
        let mut rights = Vec::with_capacity(3);
        if self.listen {
            rights.push("Listen");
        }
        if self.send {
            rights.push("Send");
        }
        if self.manage {
            rights.push("Manage");
        }
        rights
    }
}

/// Validated namespace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub name: String,
    pub resource_group_name: String,
    pub location: String,
    pub sku: Sku,
    /// Zero unless set on a tier that carries capacity
    pub capacity: u32,
    /// Zero on tiers without partitioning
    pub premium_messaging_partitions: u32,
    pub minimum_tls_version: TlsVersion,
    pub public_network_access_enabled: bool,
    pub local_auth_enabled: bool,
    pub managed_identity_enabled: bool,
    pub tags: BTreeMap<String, String>,
    pub authorization_rules: Vec<AuthorizationRule>,
    pub queues: Vec<QueueConfig>,
    pub topics: Vec<TopicConfig>,
    /// Enabled add-ons, in declaration order of their flags
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub name: String,
    pub lock_duration: IsoDuration,
    pub max_size_in_megabytes: u32,
    pub requires_duplicate_detection: bool,
    /// Present only when duplicate detection is enabled
    pub duplicate_detection_history_time_window: Option<IsoDuration>,
    pub requires_session: bool,
    pub default_message_ttl: Option<IsoDuration>,
    pub dead_lettering_on_message_expiration: bool,
    pub max_delivery_count: u32,
    pub status: EntityStatus,
    pub auto_delete_on_idle: Option<IsoDuration>,
    pub authorization_rules: Vec<AuthorizationRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    pub max_size_in_megabytes: u32,
    pub requires_duplicate_detection: bool,
    /// Present only when duplicate detection is enabled
    pub duplicate_detection_history_time_window: Option<IsoDuration>,
    pub default_message_ttl: Option<IsoDuration>,
    pub auto_delete_on_idle: Option<IsoDuration>,
    pub support_ordering: bool,
    pub status: EntityStatus,
    pub authorization_rules: Vec<AuthorizationRule>,
    pub subscriptions: Vec<SubscriptionConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    pub name: String,
    pub max_delivery_count: u32,
    pub lock_duration: IsoDuration,
    pub dead_lettering_on_message_expiration: bool,
    pub dead_lettering_on_filter_evaluation_error: bool,
    pub default_message_ttl: Option<IsoDuration>,
    pub requires_session: bool,
    pub status: EntityStatus,
    pub auto_delete_on_idle: Option<IsoDuration>,
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub filter: RuleFilter,
    /// SQL action applied to matching messages
    pub action: Option<String>,
}

impl RuleConfig {
    pub fn filter_type(&self) -> FilterType {
        match self.filter {
            RuleFilter::Sql { .. } => FilterType::SqlFilter,
            RuleFilter::Correlation(_) => FilterType::CorrelationFilter,
        }
    }
}

/// Type-tagged filter payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleFilter {
    Sql { expression: String },
    Correlation(CorrelationFilter),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationFilter {
    pub correlation_id: Option<String>,
    pub message_id: Option<String>,
    pub to: Option<String>,
    pub reply_to: Option<String>,
    pub label: Option<String>,
    pub session_id: Option<String>,
    pub reply_to_session_id: Option<String>,
    pub content_type: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl CorrelationFilter {
    /// Populated system and user properties as `(key, value)` pairs
    pub fn entries(&self) -> Vec<(String, String)> {
        let system = [
            ("correlation_id", &self.correlation_id),
            ("message_id", &self.message_id),
            ("to", &self.to),
            ("reply_to", &self.reply_to),
            ("label", &self.label),
            ("session_id", &self.session_id),
            ("reply_to_session_id", &self.reply_to_session_id),
            ("content_type", &self.content_type),
        ];

        let mut entries: Vec<(String, String)> = system
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .collect();

        entries.extend(
            self.properties
                .iter()
                .map(|(k, v)| (format!("properties.{}", k), v.clone())),
        );

        entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
