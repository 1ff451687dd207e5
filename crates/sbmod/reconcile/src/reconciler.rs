//! Desired × observed → plan

use crate::plan::{Operation, PlanAction, ReconciliationPlan};
use sbmod_graph::{Attributes, ResourceGraph};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Computes additive reconciliation plans.
///
/// Every desired node gets exactly one operation, in dependency order.
/// Observed-only nodes are reported as retained and never deleted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler;

impl Reconciler {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(desired = desired.len(), observed = ?observed.map(|g| g.len())))]
    pub fn reconcile(
        &self,
        desired: &ResourceGraph,
        observed: Option<&ResourceGraph>,
    ) -> ReconciliationPlan {
        let operations: Vec<Operation> = desired
            .nodes()
            .into_iter()
            .map(|node| {
                let action = match observed.and_then(|o| o.get(&node.id)) {
                    None => PlanAction::Create,
                    Some(current) => {
                        let changed = changed_fields(&node.attributes, &current.attributes);
                        if changed.is_empty() {
                            PlanAction::NoOp
                        } else {
                            debug!(node = %node.id, changed = ?changed, "Drift detected");
                            PlanAction::Update { changed }
                        }
                    }
                };

                Operation {
                    action,
                    node: node.clone(),
                    parent: desired.parent(&node.id).map(|p| p.id.clone()),
                }
            })
            .collect();

        let retained = observed
            .map(|o| {
                o.nodes()
                    .into_iter()
                    .filter(|node| !desired.contains(&node.id))
                    .map(|node| node.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        let plan = ReconciliationPlan::new(operations, retained);
        info!(
            plan_id = %plan.id,
            creates = plan.creates(),
            updates = plan.updates(),
            no_ops = plan.no_ops(),
            retained = plan.retained().len(),
            "Plan computed"
        );
        plan
    }
}

/// Reconcile with the default reconciler
pub fn reconcile(desired: &ResourceGraph, observed: Option<&ResourceGraph>) -> ReconciliationPlan {
    Reconciler::new().reconcile(desired, observed)
}

/// Keys whose values differ, including keys present on only one side
fn changed_fields(desired: &Attributes, observed: &Attributes) -> BTreeSet<String> {
    desired
        .keys()
        .chain(observed.keys())
        .filter(|key| desired.get(*key) != observed.get(*key))
        .cloned()
        .collect()
}
