//! SBMOD Output - Flat named outputs
//!
//! Projects a resource graph and the plan that produced it into the flat
//! key/value outputs a provisioning tool prints after apply.
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-output** owns: output keys, value formatting, resource lookup
//! - Inputs are read-only; projection never fails
//!
//! ## Key Concepts
//!
//! - **OutputValue**: A scalar string or a map of projected resources
//! - **ProjectedResource**: Resource id, name and the action applied this pass

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod keys;
pub mod projector;
pub mod value;

pub use projector::{project, OutputSet};
pub use value::{OutputValue, ProjectedResource};
