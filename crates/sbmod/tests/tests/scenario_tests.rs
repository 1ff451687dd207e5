//! Scenario tests across the whole provisioning pipeline.

#[path = "scenario/standard_namespace.rs"]
mod standard_namespace;

#[path = "scenario/premium_namespace.rs"]
mod premium_namespace;

#[path = "scenario/rejected_inputs.rs"]
mod rejected_inputs;

#[path = "scenario/convergence.rs"]
mod convergence;

#[path = "scenario/documents.rs"]
mod documents;
