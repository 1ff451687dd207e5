//! SBMOD Graph - Resource dependency graph
//!
//! Expands a [`ValidatedConfig`](sbmod_validator::ValidatedConfig) into a
//! directed graph: the namespace owns its queues, topics, features and
//! authorization rules; topics own subscriptions; subscriptions own rules.
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-graph** owns: node payloads, ownership edges, provider resource ids
//! - **sbmod-reconcile** consumes: graphs as desired and observed state
//!
//! ## Key Concepts
//!
//! - **ResourceNode**: Identity, declaration position, resource id and owned attributes
//! - **EdgeKind**: `Contains` for structure, `Attaches` for authorization rules
//! - **Pre-order**: Every node is listed after its owner

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod builder;
pub mod error;
pub mod graph;
pub mod node;

pub use builder::{GraphBuilder, PLACEHOLDER_SUBSCRIPTION_ID};
pub use error::{GraphError, Result};
pub use graph::ResourceGraph;
pub use node::{AttributeValue, Attributes, EdgeKind, ResourceNode};
