//! Reconciliation plans

use chrono::{DateTime, Utc};
use sbmod_graph::ResourceNode;
use sbmod_types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(Uuid);

impl PlanId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plan:{}", self.0)
    }
}

/// What a plan does to one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update { changed: BTreeSet<String> },
    NoOp,
}

impl PlanAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, PlanAction::NoOp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::Create => "create",
            PlanAction::Update { .. } => "update",
            PlanAction::NoOp => "no-op",
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::Update { changed } => {
                let fields: Vec<&str> = changed.iter().map(String::as_str).collect();
                write!(f, "update ({})", fields.join(", "))
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub action: PlanAction,

    /// Desired state of the node
    pub node: ResourceNode,

    /// Owner in the desired graph
    pub parent: Option<NodeId>,
}

impl Operation {
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }
}

/// Ordered create/update/no-op operations for one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    pub id: PlanId,
    pub created_at: DateTime<Utc>,
    operations: Vec<Operation>,
    retained: Vec<NodeId>,
}

impl ReconciliationPlan {
    pub fn new(operations: Vec<Operation>, retained: Vec<NodeId>) -> Self {
        Self {
            id: PlanId::generate(),
            created_at: Utc::now(),
            operations,
            retained,
        }
    }

    /// Operations in dependency order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Observed nodes absent from the desired graph. They are left in place.
    pub fn retained(&self) -> &[NodeId] {
        &self.retained
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn creates(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::Create))
    }

    pub fn updates(&self) -> usize {
        self.count(|a| matches!(a, PlanAction::Update { .. }))
    }

    pub fn no_ops(&self) -> usize {
        self.count(PlanAction::is_noop)
    }

    /// Nothing to create or update
    pub fn is_converged(&self) -> bool {
        self.operations.iter().all(|op| op.action.is_noop())
    }

    pub fn action_for(&self, id: &NodeId) -> Option<&PlanAction> {
        self.operations
            .iter()
            .find(|op| op.id() == id)
            .map(|op| &op.action)
    }

    /// Operations that change something
    pub fn changes(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| !op.action.is_noop())
    }

    pub fn summary(&self) -> String {
        format!(
            "Plan: {} to add, {} to change, {} unchanged.",
            self.creates(),
            self.updates(),
            self.no_ops()
        )
    }

    fn count(&self, predicate: impl Fn(&PlanAction) -> bool) -> usize {
        self.operations
            .iter()
            .filter(|op| predicate(&op.action))
            .count()
    }
}

impl fmt::Display for ReconciliationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in self.changes() {
            writeln!(f, "  {} {}", op.action, op.id())?;
        }
        for id in &self.retained {
            writeln!(f, "  retain {}", id)?;
        }
        f.write_str(&self.summary())
    }
}
