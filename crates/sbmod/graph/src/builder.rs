//! Validated configuration to resource graph

use crate::graph::ResourceGraph;
use crate::node::{EdgeKind, ResourceNode};
use petgraph::graph::NodeIndex;
use sbmod_types::{
    AuthorizationRule, IsoDuration, NamespaceConfig, NodeId, NodeKind, QueueConfig, RuleConfig,
    RuleFilter, SubscriptionConfig, TopicConfig,
};
use sbmod_validator::ValidatedConfig;
use tracing::{debug, instrument};

/// Subscription id used when none is configured
pub const PLACEHOLDER_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

const PROVIDER: &str = "Microsoft.ServiceBus";

/// Expands a validated configuration into a [`ResourceGraph`]
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    subscription_id: String,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(PLACEHOLDER_SUBSCRIPTION_ID)
    }
}

impl GraphBuilder {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Provider id of a namespace
    pub fn namespace_resource_id(&self, resource_group: &str, namespace: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/namespaces/{}",
            self.subscription_id, resource_group, PROVIDER, namespace
        )
    }

    /// Build the graph. Deterministic and total.
    #[instrument(skip(self, config), fields(namespace = %config.name))]
    pub fn build(&self, config: &ValidatedConfig) -> ResourceGraph {
        let config = config.config();
        let mut graph = ResourceGraph::new();

        let ns_id = NodeId::namespace(config.name.clone());
        let ns_rid = self.namespace_resource_id(&config.resource_group_name, &config.name);
        let ns_idx = graph.insert(namespace_node(config, ns_id.clone(), &ns_rid), None, EdgeKind::Contains);

        add_auth_rules(&mut graph, ns_idx, &ns_id, &ns_rid, &config.authorization_rules);

        for (position, feature) in config.features.iter().enumerate() {
            let id = ns_id.child(NodeKind::Feature, feature.as_str());
            let node = ResourceNode::new(id, position, format!("{}/features/{}", ns_rid, feature))
                .with("enabled", true);
            graph.insert(node, Some(ns_idx), EdgeKind::Contains);
        }

        for (position, queue) in config.queues.iter().enumerate() {
            let id = ns_id.child(NodeKind::Queue, queue.name.clone());
            let rid = format!("{}/queues/{}", ns_rid, queue.name);
            let idx = graph.insert(
                queue_node(queue, id.clone(), position, &rid),
                Some(ns_idx),
                EdgeKind::Contains,
            );
            add_auth_rules(&mut graph, idx, &id, &rid, &queue.authorization_rules);
        }

        for (position, topic) in config.topics.iter().enumerate() {
            let id = ns_id.child(NodeKind::Topic, topic.name.clone());
            let rid = format!("{}/topics/{}", ns_rid, topic.name);
            let idx = graph.insert(
                topic_node(topic, id.clone(), position, &rid),
                Some(ns_idx),
                EdgeKind::Contains,
            );
            add_auth_rules(&mut graph, idx, &id, &rid, &topic.authorization_rules);

            for (position, sub) in topic.subscriptions.iter().enumerate() {
                let sub_id = id.child(NodeKind::Subscription, sub.name.clone());
                let sub_rid = format!("{}/subscriptions/{}", rid, sub.name);
                let sub_idx = graph.insert(
                    subscription_node(sub, sub_id.clone(), position, &sub_rid),
                    Some(idx),
                    EdgeKind::Contains,
                );

                for (position, rule) in sub.rules.iter().enumerate() {
                    let rule_id = sub_id.child(NodeKind::Rule, rule.name.clone());
                    let rule_rid = format!("{}/rules/{}", sub_rid, rule.name);
                    graph.insert(
                        rule_node(rule, rule_id, position, &rule_rid),
                        Some(sub_idx),
                        EdgeKind::Contains,
                    );
                }
            }
        }

        debug!(nodes = graph.len(), "Resource graph built");
        graph
    }
}

fn add_auth_rules(
    graph: &mut ResourceGraph,
    owner: NodeIndex,
    owner_id: &NodeId,
    owner_rid: &str,
    rules: &[AuthorizationRule],
) {
    for (position, rule) in rules.iter().enumerate() {
        let id = owner_id.child(NodeKind::AuthorizationRule, rule.name.clone());
        let node = ResourceNode::new(
            id,
            position,
            format!("{}/authorizationRules/{}", owner_rid, rule.name),
        )
        .with("listen", rule.listen)
        .with("send", rule.send)
        .with("manage", rule.manage);
        graph.insert(node, Some(owner), EdgeKind::Attaches);
    }
}

fn namespace_node(config: &NamespaceConfig, id: NodeId, rid: &str) -> ResourceNode {
    ResourceNode::new(id, 0, rid)
        .with("resource_group_name", config.resource_group_name.as_str())
        .with("location", config.location.as_str())
        .with("sku", config.sku.as_str())
        .with("capacity", config.capacity)
        .with("premium_messaging_partitions", config.premium_messaging_partitions)
        .with("minimum_tls_version", config.minimum_tls_version.to_string())
        .with("public_network_access_enabled", config.public_network_access_enabled)
        .with("local_auth_enabled", config.local_auth_enabled)
        .with("managed_identity_enabled", config.managed_identity_enabled)
        .with("tags", config.tags.clone())
}

fn queue_node(queue: &QueueConfig, id: NodeId, position: usize, rid: &str) -> ResourceNode {
    ResourceNode::new(id, position, rid)
        .with("lock_duration", queue.lock_duration.canonical())
        .with("max_size_in_megabytes", queue.max_size_in_megabytes)
        .with("requires_duplicate_detection", queue.requires_duplicate_detection)
        .with_opt(
            "duplicate_detection_history_time_window",
            queue
                .duplicate_detection_history_time_window
                .as_ref()
                .map(IsoDuration::canonical),
        )
        .with("requires_session", queue.requires_session)
        .with_opt(
            "default_message_ttl",
            queue.default_message_ttl.as_ref().map(IsoDuration::canonical),
        )
        .with(
            "dead_lettering_on_message_expiration",
            queue.dead_lettering_on_message_expiration,
        )
        .with("max_delivery_count", queue.max_delivery_count)
        .with("status", queue.status.as_str())
        .with_opt(
            "auto_delete_on_idle",
            queue.auto_delete_on_idle.as_ref().map(IsoDuration::canonical),
        )
}

fn topic_node(topic: &TopicConfig, id: NodeId, position: usize, rid: &str) -> ResourceNode {
    ResourceNode::new(id, position, rid)
        .with("max_size_in_megabytes", topic.max_size_in_megabytes)
        .with("requires_duplicate_detection", topic.requires_duplicate_detection)
        .with_opt(
            "duplicate_detection_history_time_window",
            topic
                .duplicate_detection_history_time_window
                .as_ref()
                .map(IsoDuration::canonical),
        )
        .with_opt(
            "default_message_ttl",
            topic.default_message_ttl.as_ref().map(IsoDuration::canonical),
        )
        .with_opt(
            "auto_delete_on_idle",
            topic.auto_delete_on_idle.as_ref().map(IsoDuration::canonical),
        )
        .with("support_ordering", topic.support_ordering)
        .with("status", topic.status.as_str())
}

fn subscription_node(
    sub: &SubscriptionConfig,
    id: NodeId,
    position: usize,
    rid: &str,
) -> ResourceNode {
    ResourceNode::new(id, position, rid)
        .with("max_delivery_count", sub.max_delivery_count)
        .with("lock_duration", sub.lock_duration.canonical())
        .with(
            "dead_lettering_on_message_expiration",
            sub.dead_lettering_on_message_expiration,
        )
        .with(
            "dead_lettering_on_filter_evaluation_error",
            sub.dead_lettering_on_filter_evaluation_error,
        )
        .with_opt(
            "default_message_ttl",
            sub.default_message_ttl.as_ref().map(IsoDuration::canonical),
        )
        .with("requires_session", sub.requires_session)
        .with("status", sub.status.as_str())
        .with_opt(
            "auto_delete_on_idle",
            sub.auto_delete_on_idle.as_ref().map(IsoDuration::canonical),
        )
}

fn rule_node(rule: &RuleConfig, id: NodeId, position: usize, rid: &str) -> ResourceNode {
    let node = ResourceNode::new(id, position, rid)
        .with("filter_type", rule.filter_type().as_str())
        .with_opt("action", rule.action.clone());

    match &rule.filter {
        RuleFilter::Sql { expression } => node.with("sql_expression", expression.as_str()),
        RuleFilter::Correlation(filter) => node.with(
            "correlation_filter",
            filter
                .entries()
                .into_iter()
                .collect::<std::collections::BTreeMap<_, _>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AttributeValue;
    use sbmod_types::{
        RawAuthorizationRule, RawNamespaceConfig, RawQueueConfig, RawRuleConfig, RawSqlFilter,
        RawSubscriptionConfig, RawTopicConfig,
    };
    use sbmod_validator::Validator;

    fn config() -> ValidatedConfig {
        let mut raw = RawNamespaceConfig::new("rg-test", "East US");
        raw.environment = Some("test".into());
        raw.custom_name = Some("orders".into());
        raw.enable_resource_lock = true;
        raw.namespace_authorization_rules
            .push(RawAuthorizationRule::new("root-admin", false, false, true));

        let mut queue = RawQueueConfig::named("test-queue");
        queue
            .authorization_rules
            .push(RawAuthorizationRule::new("test-queue-rule", true, true, false));
        raw.queues.push(queue);

        let mut topic = RawTopicConfig::named("test-topic");
        let mut sub = RawSubscriptionConfig::named("test-subscription");
        sub.rules.push(RawRuleConfig {
            name: "all".into(),
            filter_type: "SqlFilter".into(),
            sql_filter: Some(RawSqlFilter {
                sql_expression: "1=1".into(),
            }),
            ..Default::default()
        });
        topic.subscriptions.push(sub);
        raw.topics.push(topic);

        Validator::default().validate(raw).unwrap()
    }

    #[test]
    fn test_dependency_preorder() {
        let graph = GraphBuilder::default().build(&config());
        let kinds: Vec<(NodeKind, &str)> = graph
            .nodes()
            .into_iter()
            .map(|n| (n.kind(), n.name()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (NodeKind::Namespace, "sb-test-orders"),
                (NodeKind::AuthorizationRule, "root-admin"),
                (NodeKind::Feature, "resource_lock"),
                (NodeKind::Queue, "test-queue"),
                (NodeKind::AuthorizationRule, "test-queue-rule"),
                (NodeKind::Topic, "test-topic"),
                (NodeKind::Subscription, "test-subscription"),
                (NodeKind::Rule, "all"),
            ]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = config();
        let builder = GraphBuilder::new("sub-1");
        assert_eq!(builder.build(&config), builder.build(&config));
    }

    #[test]
    fn test_resource_ids_and_edges() {
        let graph = GraphBuilder::new("sub-1").build(&config());
        let ns = NodeId::namespace("sb-test-orders");
        let queue_rule = ns
            .child(NodeKind::Queue, "test-queue")
            .child(NodeKind::AuthorizationRule, "test-queue-rule");

        let node = graph.get(&queue_rule).unwrap();
        assert_eq!(
            node.resource_id,
            "/subscriptions/sub-1/resourceGroups/rg-test/providers/Microsoft.ServiceBus\
             /namespaces/sb-test-orders/queues/test-queue/authorizationRules/test-queue-rule"
        );
        assert_eq!(graph.edge_to(&queue_rule), Some(EdgeKind::Attaches));
        assert_eq!(
            graph.edge_to(&ns.child(NodeKind::Topic, "test-topic")),
            Some(EdgeKind::Contains)
        );
    }

    #[test]
    fn test_duration_attributes_are_canonical() {
        let build = |lock: &str, ttl: &str| {
            let mut raw = RawNamespaceConfig::new("rg-test", "East US");
            raw.environment = Some("test".into());
            raw.custom_name = Some("orders".into());
            let mut queue = RawQueueConfig::named("q1");
            queue.lock_duration = Some(lock.into());
            queue.default_message_ttl = Some(ttl.into());
            raw.queues.push(queue);
            GraphBuilder::default().build(&Validator::default().validate(raw).unwrap())
        };

        let short = build("PT1M", "P14D");
        let long = build("PT60S", "P2W");
        assert_eq!(short, long);

        let queue = NodeId::namespace("sb-test-orders").child(NodeKind::Queue, "q1");
        let node = long.get(&queue).unwrap();
        assert_eq!(node.attribute("lock_duration"), Some(&AttributeValue::from("PT1M")));
        assert_eq!(node.attribute("default_message_ttl"), Some(&AttributeValue::from("P14D")));
    }

    #[test]
    fn test_manage_normalized_in_attributes() {
        let graph = GraphBuilder::default().build(&config());
        let admin = NodeId::namespace("sb-test-orders")
            .child(NodeKind::AuthorizationRule, "root-admin");
        let node = graph.get(&admin).unwrap();
        assert_eq!(node.attribute("listen"), Some(&AttributeValue::Bool(true)));
        assert_eq!(node.attribute("send"), Some(&AttributeValue::Bool(true)));
    }
}
