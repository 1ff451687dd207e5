//! Raw document to validated configuration

use crate::collector::ErrorCollector;
use crate::naming::{check_namespace_name, derive_namespace_name};
use crate::validated::ValidatedConfig;
use sbmod_catalog::{ConstraintCatalog, TierProfile};
use sbmod_types::{
    AuthScope, AuthorizationRule, CorrelationFilter, ErrorKind, Feature, FilterType, IsoDuration,
    NamespaceConfig, QueueConfig, RawAuthorizationRule, RawCorrelationFilter, RawNamespaceConfig,
    RawQueueConfig, RawRuleConfig, RawSubscriptionConfig, RawTopicConfig, RuleConfig, RuleFilter,
    Sku, SubscriptionConfig, TlsVersion, TopicConfig, ValidationErrors,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Validates raw namespace documents against a constraint catalog
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    catalog: &'static ConstraintCatalog,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ConstraintCatalog::standard())
    }
}

impl Validator {
    pub fn new(catalog: &'static ConstraintCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static ConstraintCatalog {
        self.catalog
    }

    /// Validate a raw document.
    ///
    /// Every check runs; the result is either a fully consistent
    /// configuration or the complete list of field errors.
    #[instrument(skip(self, raw), fields(resource_group = %raw.resource_group_name, sku = %raw.sku))]
    pub fn validate(&self, raw: RawNamespaceConfig) -> Result<ValidatedConfig, ValidationErrors> {
        let mut pass = Pass::new(self.catalog);
        let config = pass.namespace(raw);

        match (pass.errors.finish(), config) {
            (Ok(()), Some(config)) => {
                info!(
                    namespace = %config.name,
                    queues = config.queues.len(),
                    topics = config.topics.len(),
                    "Configuration validated"
                );
                Ok(ValidatedConfig::new(config))
            }
            (Err(errors), _) => {
                warn!(errors = errors.len(), "Configuration rejected");
                Err(errors)
            }
            // A missing tier or TLS version always records an error first
            (Ok(()), None) => Err(ValidationErrors::new(Vec::new())),
        }
    }
}

/// State for one validation pass
struct Pass {
    catalog: &'static ConstraintCatalog,
    profile: Option<&'static TierProfile>,
    errors: ErrorCollector,
}

impl Pass {
    fn new(catalog: &'static ConstraintCatalog) -> Self {
        Self {
            catalog,
            profile: None,
            errors: ErrorCollector::new(),
        }
    }

    fn namespace(&mut self, raw: RawNamespaceConfig) -> Option<NamespaceConfig> {
        self.errors
            .require("resource_group_name", &raw.resource_group_name);
        self.errors.require("location", &raw.location);

        let sku = match raw.sku.parse::<Sku>() {
            Ok(sku) => Some(sku),
            Err(other) => {
                self.errors.push(
                    "sku",
                    ErrorKind::InvalidEnum,
                    format!(
                        "invalid sku '{}', expected one of {}",
                        other,
                        Sku::ALL.map(|s| s.as_str()).join(", ")
                    ),
                );
                None
            }
        };
        let catalog = self.catalog;
        self.profile = sku.map(|sku| catalog.profile(sku));

        let capacity = self.capacity(raw.capacity);
        let premium_messaging_partitions =
            self.partitions(raw.premium_messaging_partitions, capacity);
        let minimum_tls_version = self.tls(&raw.minimum_tls_version);

        let name = derive_namespace_name(&raw);
        if let Err(message) = check_namespace_name(&name) {
            self.errors
                .push("custom_name", ErrorKind::InvalidName, message);
        }

        let authorization_rules = self.authorization_rules(
            "namespace_authorization_rules",
            &raw.namespace_authorization_rules,
            AuthScope::Namespace,
        );

        self.errors
            .check_names("queues", raw.queues.iter().map(|q| q.name.as_str()));
        let queues = raw
            .queues
            .iter()
            .enumerate()
            .map(|(i, queue)| self.queue(&format!("queues[{}]", i), queue))
            .collect();

        if let Some(profile) = self.profile {
            if !profile.supports_topics && !raw.topics.is_empty() {
                self.errors.push(
                    "topics",
                    ErrorKind::UnsupportedByTier,
                    format!("topics are not available on the {} tier", profile.sku),
                );
            }
        }
        self.errors
            .check_names("topics", raw.topics.iter().map(|t| t.name.as_str()));
        for (i, topic) in raw.topics.iter().enumerate() {
            let taken = !topic.name.trim().is_empty()
                && raw.queues.iter().any(|q| q.name == topic.name);
            if taken {
                self.errors.push(
                    format!("topics[{}].name", i),
                    ErrorKind::DuplicateName,
                    format!("'{}' is already declared as a queue", topic.name),
                );
            }
        }
        self.shared_rule_names(
            "queues",
            raw.queues.iter().map(|q| q.authorization_rules.as_slice()),
        );
        self.shared_rule_names(
            "topics",
            raw.topics.iter().map(|t| t.authorization_rules.as_slice()),
        );
        let topics = raw
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| self.topic(&format!("topics[{}]", i), topic))
            .collect();

        let features = [
            (raw.enable_network_rules, Feature::NetworkRules),
            (raw.enable_private_endpoint, Feature::PrivateEndpoint),
            (raw.enable_diagnostic_settings, Feature::DiagnosticSettings),
            (raw.enable_policy_assignments, Feature::PolicyAssignments),
            (raw.enable_custom_policies, Feature::CustomPolicies),
            (raw.enable_policy_initiative, Feature::PolicyInitiative),
            (raw.enable_resource_lock, Feature::ResourceLock),
        ]
        .into_iter()
        .filter_map(|(enabled, feature)| enabled.then_some(feature))
        .collect();

        Some(NamespaceConfig {
            name,
            resource_group_name: raw.resource_group_name,
            location: raw.location,
            sku: sku?,
            capacity,
            premium_messaging_partitions,
            minimum_tls_version: minimum_tls_version?,
            public_network_access_enabled: raw.public_network_access_enabled,
            local_auth_enabled: raw.local_auth_enabled,
            managed_identity_enabled: raw.enable_managed_identity,
            tags: raw.tags,
            authorization_rules,
            queues,
            topics,
            features,
        })
    }

    fn capacity(&mut self, capacity: Option<u32>) -> u32 {
        let Some(profile) = self.profile else {
            return capacity.unwrap_or(0);
        };

        if !profile.accepts_capacity(capacity) {
            let requested = capacity.unwrap_or(0);
            let message = match profile.allowed_capacities() {
                [] => format!(
                    "invalid capacity {}: the {} tier accepts no capacity above 1",
                    requested, profile.sku
                ),
                allowed => format!(
                    "invalid capacity {}: the {} tier accepts {:?}",
                    requested, profile.sku, allowed
                ),
            };
            self.errors.push("capacity", ErrorKind::OutOfRange, message);
        }

        profile.effective_capacity(capacity)
    }

    fn partitions(&mut self, partitions: Option<u32>, capacity: u32) -> u32 {
        let Some(profile) = self.profile else {
            return 0;
        };
        const FIELD: &str = "premium_messaging_partitions";

        if !profile.supports_partitioning() {
            if let Some(requested) = partitions.filter(|p| *p != 0) {
                self.errors.push(
                    FIELD,
                    ErrorKind::OutOfRange,
                    format!(
                        "invalid partition count {}: partitioning is not available on the {} tier",
                        requested, profile.sku
                    ),
                );
            }
            return 0;
        }

        let Some(requested) = partitions else {
            return profile.default_partitions();
        };

        if !profile.partitions.contains(&requested) {
            self.errors.push(
                FIELD,
                ErrorKind::OutOfRange,
                format!(
                    "invalid partition count {}: expected one of {:?}",
                    requested, profile.partitions
                ),
            );
        } else if requested > profile.max_partitions_for(capacity) {
            self.errors.push(
                FIELD,
                ErrorKind::OutOfRange,
                format!(
                    "invalid partition count {}: capacity {} hosts at most {}",
                    requested,
                    capacity,
                    profile.max_partitions_for(capacity)
                ),
            );
        }

        requested
    }

    fn tls(&mut self, text: &str) -> Option<TlsVersion> {
        const FIELD: &str = "minimum_tls_version";

        let version = match text.parse::<TlsVersion>() {
            Ok(version) => version,
            Err(e) => {
                self.errors.push(FIELD, ErrorKind::InvalidEnum, e.to_string());
                return None;
            }
        };

        if !self.catalog.accepts_tls(version) {
            self.errors.push(
                FIELD,
                ErrorKind::OutOfRange,
                format!(
                    "invalid minimum TLS version {}: must be at least {}",
                    version, self.catalog.tls_floor
                ),
            );
        }

        Some(version)
    }

    fn authorization_rules(
        &mut self,
        field: &str,
        rules: &[RawAuthorizationRule],
        scope: AuthScope,
    ) -> Vec<AuthorizationRule> {
        self.errors
            .check_names(field, rules.iter().map(|r| r.name.as_str()));

        rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                if !(rule.listen || rule.send || rule.manage) {
                    self.errors.push(
                        format!("{}[{}]", field, i),
                        ErrorKind::InvalidRule,
                        format!(
                            "invalid authorization rule '{}': at least one of listen, send or manage must be true",
                            rule.name
                        ),
                    );
                }
                AuthorizationRule::new(
                    rule.name.clone(),
                    scope.clone(),
                    rule.listen,
                    rule.send,
                    rule.manage,
                )
            })
            .collect()
    }

    /// Entity-scoped rules are published keyed by bare name, so a name may
    /// appear under only one owner of each kind.
    fn shared_rule_names<'a>(
        &mut self,
        owners: &str,
        rules: impl IntoIterator<Item = &'a [RawAuthorizationRule]>,
    ) {
        let mut first_owner: HashMap<&str, usize> = HashMap::new();

        for (i, owned) in rules.into_iter().enumerate() {
            for (j, rule) in owned.iter().enumerate() {
                if rule.name.trim().is_empty() {
                    continue;
                }
                match first_owner.entry(rule.name.as_str()) {
                    Entry::Vacant(slot) => {
                        slot.insert(i);
                    }
                    Entry::Occupied(first) if *first.get() != i => self.errors.push(
                        format!("{}[{}].authorization_rules[{}].name", owners, i, j),
                        ErrorKind::DuplicateName,
                        format!(
                            "authorization rule '{}' is already declared on {}[{}]",
                            rule.name,
                            owners,
                            first.get()
                        ),
                    ),
                    Entry::Occupied(_) => {}
                }
            }
        }
    }

    fn queue(&mut self, field: &str, raw: &RawQueueConfig) -> QueueConfig {
        QueueConfig {
            name: raw.name.clone(),
            lock_duration: self.lock_duration(field, raw.lock_duration.as_deref()),
            max_size_in_megabytes: self.entity_size(field, raw.max_size_in_megabytes),
            requires_duplicate_detection: raw.requires_duplicate_detection,
            duplicate_detection_history_time_window: self.duplicate_detection(
                field,
                raw.requires_duplicate_detection,
                raw.duplicate_detection_history_time_window.as_deref(),
            ),
            requires_session: self.session(field, raw.requires_session),
            default_message_ttl: self.errors.duration(
                &format!("{}.default_message_ttl", field),
                raw.default_message_ttl.as_deref(),
            ),
            dead_lettering_on_message_expiration: raw.dead_lettering_on_message_expiration,
            max_delivery_count: self.delivery_count(field, raw.max_delivery_count),
            status: self
                .errors
                .status(&format!("{}.status", field), raw.status.as_deref()),
            auto_delete_on_idle: self.errors.duration(
                &format!("{}.auto_delete_on_idle", field),
                raw.auto_delete_on_idle.as_deref(),
            ),
            authorization_rules: self.authorization_rules(
                &format!("{}.authorization_rules", field),
                &raw.authorization_rules,
                AuthScope::Queue(raw.name.clone()),
            ),
        }
    }

    fn topic(&mut self, field: &str, raw: &RawTopicConfig) -> TopicConfig {
        let subscriptions_field = format!("{}.subscriptions", field);
        self.errors.check_names(
            &subscriptions_field,
            raw.subscriptions.iter().map(|s| s.name.as_str()),
        );

        TopicConfig {
            name: raw.name.clone(),
            max_size_in_megabytes: self.entity_size(field, raw.max_size_in_megabytes),
            requires_duplicate_detection: raw.requires_duplicate_detection,
            duplicate_detection_history_time_window: self.duplicate_detection(
                field,
                raw.requires_duplicate_detection,
                raw.duplicate_detection_history_time_window.as_deref(),
            ),
            default_message_ttl: self.errors.duration(
                &format!("{}.default_message_ttl", field),
                raw.default_message_ttl.as_deref(),
            ),
            auto_delete_on_idle: self.errors.duration(
                &format!("{}.auto_delete_on_idle", field),
                raw.auto_delete_on_idle.as_deref(),
            ),
            support_ordering: raw.support_ordering,
            status: self
                .errors
                .status(&format!("{}.status", field), raw.status.as_deref()),
            authorization_rules: self.authorization_rules(
                &format!("{}.authorization_rules", field),
                &raw.authorization_rules,
                AuthScope::Topic(raw.name.clone()),
            ),
            subscriptions: raw
                .subscriptions
                .iter()
                .enumerate()
                .map(|(i, sub)| self.subscription(&format!("{}[{}]", subscriptions_field, i), sub))
                .collect(),
        }
    }

    fn subscription(&mut self, field: &str, raw: &RawSubscriptionConfig) -> SubscriptionConfig {
        let rules_field = format!("{}.rules", field);
        self.errors
            .check_names(&rules_field, raw.rules.iter().map(|r| r.name.as_str()));

        SubscriptionConfig {
            name: raw.name.clone(),
            max_delivery_count: self.delivery_count(field, raw.max_delivery_count),
            lock_duration: self.lock_duration(field, raw.lock_duration.as_deref()),
            dead_lettering_on_message_expiration: raw.dead_lettering_on_message_expiration,
            dead_lettering_on_filter_evaluation_error: raw
                .dead_lettering_on_filter_evaluation_error,
            default_message_ttl: self.errors.duration(
                &format!("{}.default_message_ttl", field),
                raw.default_message_ttl.as_deref(),
            ),
            requires_session: self.session(field, raw.requires_session),
            status: self
                .errors
                .status(&format!("{}.status", field), raw.status.as_deref()),
            auto_delete_on_idle: self.errors.duration(
                &format!("{}.auto_delete_on_idle", field),
                raw.auto_delete_on_idle.as_deref(),
            ),
            rules: raw
                .rules
                .iter()
                .enumerate()
                .filter_map(|(i, rule)| self.rule(&format!("{}[{}]", rules_field, i), rule))
                .collect(),
        }
    }

    fn rule(&mut self, field: &str, raw: &RawRuleConfig) -> Option<RuleConfig> {
        let filter_type = match raw.filter_type.parse::<FilterType>() {
            Ok(filter_type) => filter_type,
            Err(other) => {
                self.errors.push(
                    format!("{}.filter_type", field),
                    ErrorKind::InvalidEnum,
                    format!(
                        "invalid filter type '{}', expected SqlFilter or CorrelationFilter",
                        other
                    ),
                );
                return None;
            }
        };

        let filter = match filter_type {
            FilterType::SqlFilter => {
                let expression = raw
                    .sql_filter
                    .as_ref()
                    .map(|f| f.sql_expression.trim())
                    .filter(|e| !e.is_empty());
                match expression {
                    Some(expression) => RuleFilter::Sql {
                        expression: expression.to_string(),
                    },
                    None => {
                        self.errors.push(
                            format!("{}.sql_filter.sql_expression", field),
                            ErrorKind::Required,
                            "SqlFilter rules need a non-empty sql_expression",
                        );
                        return None;
                    }
                }
            }
            FilterType::CorrelationFilter => {
                let filter = raw.correlation_filter.as_ref().map(correlation_filter);
                match filter.filter(|f| !f.is_empty()) {
                    Some(filter) => RuleFilter::Correlation(filter),
                    None => {
                        self.errors.push(
                            format!("{}.correlation_filter", field),
                            ErrorKind::Required,
                            "CorrelationFilter rules need at least one populated property",
                        );
                        return None;
                    }
                }
            }
        };

        Some(RuleConfig {
            name: raw.name.clone(),
            filter,
            action: raw
                .action
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        })
    }

    fn lock_duration(&mut self, entity: &str, value: Option<&str>) -> IsoDuration {
        let field = format!("{}.lock_duration", entity);
        let fallback = IsoDuration::from_secs(self.catalog.defaults.lock_duration_secs);
        let Some(lock) = self.errors.duration(&field, value) else {
            return fallback;
        };

        if !self.catalog.accepts_lock_duration(lock.as_duration()) {
            self.errors.push(
                field,
                ErrorKind::OutOfRange,
                format!(
                    "invalid lock duration {}: must be greater than zero and at most {}",
                    lock,
                    IsoDuration::from_secs(self.catalog.limits.max_lock_duration.as_secs())
                ),
            );
        }
        lock
    }

    fn entity_size(&mut self, entity: &str, value: Option<u32>) -> u32 {
        let size = value.unwrap_or(self.catalog.defaults.max_size_in_megabytes);
        if let Some(profile) = self.profile {
            if !self.catalog.accepts_entity_size(profile.sku, size) {
                self.errors.push(
                    format!("{}.max_size_in_megabytes", entity),
                    ErrorKind::OutOfRange,
                    format!(
                        "invalid size {} MB: the {} tier allows {}..={} MB",
                        size,
                        profile.sku,
                        self.catalog.limits.min_entity_size_mb,
                        profile.max_entity_size_mb
                    ),
                );
            }
        }
        size
    }

    fn delivery_count(&mut self, entity: &str, value: Option<u32>) -> u32 {
        let count = value.unwrap_or(self.catalog.defaults.max_delivery_count);
        if !self.catalog.accepts_delivery_count(count) {
            let range = &self.catalog.limits.delivery_count;
            self.errors.push(
                format!("{}.max_delivery_count", entity),
                ErrorKind::OutOfRange,
                format!(
                    "invalid max delivery count {}: must be in {}..={}",
                    count,
                    range.start(),
                    range.end()
                ),
            );
        }
        count
    }

    fn session(&mut self, entity: &str, requested: bool) -> bool {
        if let Some(profile) = self.profile {
            if requested && !profile.supports_sessions {
                self.errors.push(
                    format!("{}.requires_session", entity),
                    ErrorKind::UnsupportedByTier,
                    format!("sessions are not available on the {} tier", profile.sku),
                );
            }
        }
        requested
    }

    /// History window when detection is on; ignored entirely when it is off
    fn duplicate_detection(
        &mut self,
        entity: &str,
        enabled: bool,
        window: Option<&str>,
    ) -> Option<IsoDuration> {
        if !enabled {
            return None;
        }

        if let Some(profile) = self.profile {
            if !profile.supports_duplicate_detection {
                self.errors.push(
                    format!("{}.requires_duplicate_detection", entity),
                    ErrorKind::UnsupportedByTier,
                    format!(
                        "duplicate detection is not available on the {} tier",
                        profile.sku
                    ),
                );
            }
        }

        let field = format!("{}.duplicate_detection_history_time_window", entity);
        let window = match window {
            Some(text) => self.errors.duration(&field, Some(text))?,
            None => IsoDuration::from_secs(self.catalog.defaults.duplicate_detection_window_secs),
        };

        if !self.catalog.accepts_duplicate_window(window.as_duration()) {
            let range = &self.catalog.limits.duplicate_detection_window;
            self.errors.push(
                field,
                ErrorKind::OutOfRange,
                format!(
                    "invalid duplicate detection window {}: must be between {} and {}",
                    window,
                    IsoDuration::from_secs(range.start().as_secs()),
                    IsoDuration::from_secs(range.end().as_secs())
                ),
            );
        }
        Some(window)
    }
}

fn correlation_filter(raw: &RawCorrelationFilter) -> CorrelationFilter {
    let text = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    CorrelationFilter {
        correlation_id: text(&raw.correlation_id),
        message_id: text(&raw.message_id),
        to: text(&raw.to),
        reply_to: text(&raw.reply_to),
        label: text(&raw.label),
        session_id: text(&raw.session_id),
        reply_to_session_id: text(&raw.reply_to_session_id),
        content_type: text(&raw.content_type),
        properties: raw.properties.clone(),
    }
}
