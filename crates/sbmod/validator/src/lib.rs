//! SBMOD Validator - Configuration validation for Service Bus namespaces
//!
//! Turns a [`RawNamespaceConfig`](sbmod_types::RawNamespaceConfig) into a
//! [`ValidatedConfig`] or the complete set of field errors. No remote call is
//! made and nothing is short-circuited: a rejected document reports every
//! defect at once.
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-validator** owns: field checks, defaults, namespace naming
//! - **sbmod-catalog** owns: every tier-dependent limit consulted here
//! - **sbmod-graph** consumes: [`ValidatedConfig`] only
//!
//! ## Key Concepts
//!
//! - **Validator**: Stateless checker bound to a constraint catalog
//! - **ValidatedConfig**: Proof that a configuration passed validation
//! - **Field path**: Index-based address of a defect, e.g. `queues[0].lock_duration`

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

mod collector;
pub mod naming;
pub mod validated;
pub mod validator;

pub use naming::{check_namespace_name, derive_namespace_name};
pub use validated::ValidatedConfig;
pub use validator::Validator;
