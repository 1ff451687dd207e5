//! SBMOD Reconcile - Reconciliation plans and their application
//!
//! Compares a desired [`ResourceGraph`](sbmod_graph::ResourceGraph) with the
//! observed one and emits an ordered, additive plan: create what is missing,
//! update what drifted, leave the rest. Nothing is ever deleted.
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-reconcile** owns: diffing, plan ordering, walking a plan against a backend
//! - **Backends** own: the remote side, behind [`ApplyBackend`] and [`ObservedStateReader`]
//!
//! ## Key Concepts
//!
//! - **ReconciliationPlan**: Create/Update/NoOp per desired node, in dependency order
//! - **Retained**: Observed-only nodes, reported but untouched
//! - **PlanApplier**: Failure blocks descendants, siblings continue

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod apply;
pub mod backend;
pub mod error;
pub mod plan;
pub mod reconciler;

pub use apply::{ApplyReport, NodeOutcome, NodeResult, PlanApplier};
pub use backend::{ApplyBackend, InMemoryBackend, ObservedStateReader};
pub use error::{ApplyError, BackendError, Result};
pub use plan::{Operation, PlanAction, PlanId, ReconciliationPlan};
pub use reconciler::{reconcile, Reconciler};
