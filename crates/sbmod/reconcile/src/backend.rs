//! Apply backends and observed-state readers

use crate::error::{BackendError, Result};
use crate::plan::Operation;
use async_trait::async_trait;
use dashmap::DashMap;
use sbmod_graph::{EdgeKind, ResourceGraph};
use sbmod_types::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Accepts create and update operations in plan order
#[async_trait]
pub trait ApplyBackend: Send + Sync {
    /// Backend name for logs and reports
    fn name(&self) -> &str;

    async fn create(&self, operation: &Operation) -> Result<()>;

    async fn update(&self, operation: &Operation) -> Result<()>;
}

/// Reads the state left behind by previous passes
#[async_trait]
pub trait ObservedStateReader: Send + Sync {
    /// The observed graph for a namespace, or `None` if nothing exists yet
    async fn read(&self, namespace: &str) -> Result<Option<ResourceGraph>>;
}

/// In-memory backend and state reader.
///
/// Applied nodes are recorded per namespace so a later pass observes them.
/// Suitable for development and testing.
pub struct InMemoryBackend {
    state: DashMap<String, ResourceGraph>,
    failures: DashMap<NodeId, String>,
    applied: AtomicU64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            state: DashMap::new(),
            failures: DashMap::new(),
            applied: AtomicU64::new(0),
        }
    }

    /// Reject every future operation on `node`
    pub fn fail_on(&self, node: NodeId, reason: impl Into<String>) {
        self.failures.insert(node, reason.into());
    }

    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Replace the recorded state of a namespace
    pub fn seed(&self, namespace: impl Into<String>, graph: ResourceGraph) {
        self.state.insert(namespace.into(), graph);
    }

    /// Copy of the recorded state of a namespace
    pub fn snapshot(&self, namespace: &str) -> Option<ResourceGraph> {
        self.state.get(namespace).map(|g| g.clone())
    }

    /// Number of operations accepted so far
    pub fn applied_count(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    fn check_failure(&self, operation: &Operation) -> Result<()> {
        match self.failures.get(operation.id()) {
            Some(reason) => Err(BackendError::Rejected {
                node: operation.id().clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record(&self, operation: &Operation) -> Result<()> {
        let namespace = operation.id().namespace_name().to_string();
        let mut graph = self.state.entry(namespace).or_default();
        graph.upsert(
            operation.node.clone(),
            operation.parent.as_ref(),
            EdgeKind::for_child(operation.id().kind),
        )?;
        self.applied.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn exists(&self, id: &NodeId) -> bool {
        self.state
            .get(id.namespace_name())
            .map(|g| g.contains(id))
            .unwrap_or(false)
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplyBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn create(&self, operation: &Operation) -> Result<()> {
        self.check_failure(operation)?;
        if self.exists(operation.id()) {
            return Err(BackendError::AlreadyExists(operation.id().clone()));
        }
        debug!(node = %operation.id(), "Creating resource");
        self.record(operation)
    }

    async fn update(&self, operation: &Operation) -> Result<()> {
        self.check_failure(operation)?;
        if !self.exists(operation.id()) {
            return Err(BackendError::NotFound(operation.id().clone()));
        }
        debug!(node = %operation.id(), "Updating resource");
        self.record(operation)
    }
}

#[async_trait]
impl ObservedStateReader for InMemoryBackend {
    async fn read(&self, namespace: &str) -> Result<Option<ResourceGraph>> {
        Ok(self.snapshot(namespace))
    }
}
