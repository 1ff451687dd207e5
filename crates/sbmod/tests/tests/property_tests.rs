//! Property tests over validation and reconciliation.

#[path = "property/tier_constraints.rs"]
mod tier_constraints;

#[path = "property/convergence.rs"]
mod convergence;

#[path = "property/durations.rs"]
mod durations;
