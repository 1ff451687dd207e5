//! Plan application

use crate::backend::ApplyBackend;
use crate::error::{ApplyError, BackendError};
use crate::plan::{PlanAction, PlanId, ReconciliationPlan};
use chrono::{DateTime, Utc};
use sbmod_types::NodeId;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// What happened to one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Created or updated
    Applied(PlanAction),
    /// Planned as no-op
    Unchanged,
    Failed(BackendError),
    /// Not attempted because `blocked_by` failed earlier
    Skipped { blocked_by: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResult {
    pub id: NodeId,
    pub outcome: NodeOutcome,
}

/// Per-node outcomes of one application, in plan order
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub plan_id: PlanId,
    pub backend: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<NodeResult>,
}

impl ApplyReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Applied(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Skipped { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    pub fn outcome_for(&self, id: &NodeId) -> Option<&NodeOutcome> {
        self.results
            .iter()
            .find(|r| &r.id == id)
            .map(|r| &r.outcome)
    }

    /// The report itself when every node succeeded, otherwise the first failure
    pub fn into_result(self) -> Result<ApplyReport, ApplyError> {
        let first = self.results.iter().find_map(|r| match &r.outcome {
            NodeOutcome::Failed(cause) => Some((r.id.clone(), cause.clone())),
            _ => None,
        });

        match first {
            None => Ok(self),
            Some((first, cause)) => Err(ApplyError::Rejected {
                failed: self.failed(),
                skipped: self.skipped(),
                first,
                cause,
            }),
        }
    }

    fn count(&self, predicate: impl Fn(&NodeOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|r| predicate(&r.outcome))
            .count()
    }
}

/// Walks a plan against an [`ApplyBackend`].
///
/// A failed node blocks its descendants, which are reported as skipped;
/// siblings continue unless `stop_on_first_failure` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanApplier {
    stop_on_first_failure: bool,
}

impl PlanApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self
    }

    #[instrument(skip_all, fields(plan_id = %plan.id, backend = backend.name()))]
    pub async fn apply(
        &self,
        plan: &ReconciliationPlan,
        backend: &dyn ApplyBackend,
    ) -> ApplyReport {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(plan.len());
        // Blocked node -> the failed node that blocked it
        let mut blocked: HashMap<NodeId, NodeId> = HashMap::new();
        let mut halted_by: Option<NodeId> = None;

        for op in plan.operations() {
            let id = op.id().clone();

            let blocker = halted_by.clone().or_else(|| {
                op.parent
                    .as_ref()
                    .and_then(|parent| blocked.get(parent).cloned())
            });
            if let Some(blocked_by) = blocker {
                blocked.insert(id.clone(), blocked_by.clone());
                results.push(NodeResult {
                    id,
                    outcome: NodeOutcome::Skipped { blocked_by },
                });
                continue;
            }

            let outcome = match &op.action {
                PlanAction::NoOp => NodeOutcome::Unchanged,
                PlanAction::Create => applied(backend.create(op).await, &op.action),
                PlanAction::Update { .. } => applied(backend.update(op).await, &op.action),
            };

            if let NodeOutcome::Failed(error) = &outcome {
                warn!(node = %id, error = %error, "Operation failed");
                blocked.insert(id.clone(), id.clone());
                if self.stop_on_first_failure {
                    halted_by = Some(id.clone());
                }
            }

            results.push(NodeResult { id, outcome });
        }

        let report = ApplyReport {
            plan_id: plan.id,
            backend: backend.name().to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
        };

        info!(
            applied = report.applied(),
            unchanged = report.unchanged(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Plan applied"
        );
        report
    }
}

fn applied(result: crate::error::Result<()>, action: &PlanAction) -> NodeOutcome {
    match result {
        Ok(()) => NodeOutcome::Applied(action.clone()),
        Err(error) => NodeOutcome::Failed(error),
    }
}
