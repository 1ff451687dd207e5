//! Graph × plan → output set

use crate::keys;
use crate::value::{OutputValue, ProjectedResource};
use sbmod_graph::{ResourceGraph, ResourceNode};
use sbmod_reconcile::ReconciliationPlan;
use sbmod_types::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Named outputs of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSet {
    values: BTreeMap<String, OutputValue>,
}

impl OutputSet {
    pub fn get(&self, key: &str) -> Option<&OutputValue> {
        self.values.get(key)
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OutputValue::as_scalar)
    }

    pub fn map(&self, key: &str) -> Option<&BTreeMap<String, ProjectedResource>> {
        self.get(key).and_then(OutputValue::as_map)
    }

    /// Whether the map output `key` holds `name`, by full key or unambiguous bare name
    pub fn contains_resource(&self, key: &str, name: &str) -> bool {
        self.resource(key, name).is_some()
    }

    pub fn resource(&self, key: &str, name: &str) -> Option<&ProjectedResource> {
        self.get(key).and_then(|value| value.resource(name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn insert(&mut self, key: &str, value: impl Into<OutputValue>) {
        self.values.insert(key.to_string(), value.into());
    }
}

/// Project a graph and its plan into flat outputs.
///
/// A graph without a namespace yields an empty set.
pub fn project(graph: &ResourceGraph, plan: &ReconciliationPlan) -> OutputSet {
    let mut outputs = OutputSet::default();
    let Some(namespace) = graph.namespace() else {
        return outputs;
    };

    let attribute = |key: &str| {
        namespace
            .attribute(key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    };
    let managed_identity = attribute("managed_identity_enabled") == "true";

    outputs.insert(keys::NAMESPACE_ID, namespace.resource_id.clone());
    outputs.insert(keys::NAMESPACE_NAME, namespace.name().to_string());
    outputs.insert(keys::SKU, attribute("sku"));
    outputs.insert(keys::CAPACITY, attribute("capacity"));
    outputs.insert(
        keys::IDENTITY,
        if managed_identity { "SystemAssigned" } else { "" }.to_string(),
    );
    outputs.insert(keys::MANAGED_IDENTITY_ENABLED, managed_identity.to_string());

    let mut queues = BTreeMap::new();
    let mut topics = BTreeMap::new();
    let mut subscriptions = BTreeMap::new();
    let mut namespace_rules = BTreeMap::new();
    let mut queue_rules = BTreeMap::new();
    let mut topic_rules = BTreeMap::new();

    for node in graph.nodes() {
        let resource = || projected(node, plan);
        let owner = graph.parent(&node.id);

        match node.kind() {
            NodeKind::Queue => {
                queues.insert(node.name().to_string(), resource());
            }
            NodeKind::Topic => {
                topics.insert(node.name().to_string(), resource());
            }
            NodeKind::Subscription => {
                if let Some(topic) = owner {
                    subscriptions.insert(composite(topic, node), resource());
                }
            }
            // Keyed by rule name; unique per owner kind after validation
            NodeKind::AuthorizationRule => {
                let rules = match owner.map(|o| o.kind()) {
                    Some(NodeKind::Namespace) => &mut namespace_rules,
                    Some(NodeKind::Queue) => &mut queue_rules,
                    Some(NodeKind::Topic) => &mut topic_rules,
                    _ => continue,
                };
                rules.insert(node.name().to_string(), resource());
            }
            NodeKind::Namespace | NodeKind::Rule | NodeKind::Feature => {}
        }
    }

    outputs.insert(keys::QUEUES, OutputValue::Map(queues));
    outputs.insert(keys::TOPICS, OutputValue::Map(topics));
    outputs.insert(keys::SUBSCRIPTIONS, OutputValue::Map(subscriptions));
    outputs.insert(keys::NAMESPACE_AUTH_RULES, OutputValue::Map(namespace_rules));
    outputs.insert(keys::QUEUE_AUTH_RULES, OutputValue::Map(queue_rules));
    outputs.insert(keys::TOPIC_AUTH_RULES, OutputValue::Map(topic_rules));

    debug!(namespace = %namespace.name(), outputs = outputs.len(), "Outputs projected");
    outputs
}

fn projected(node: &ResourceNode, plan: &ReconciliationPlan) -> ProjectedResource {
    ProjectedResource {
        id: node.resource_id.clone(),
        name: node.name().to_string(),
        action: plan.action_for(&node.id).cloned(),
    }
}

fn composite(owner: &ResourceNode, node: &ResourceNode) -> String {
    format!("{}/{}", owner.name(), node.name())
}
