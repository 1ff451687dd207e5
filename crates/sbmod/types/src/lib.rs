//! SBMOD Types - Core types for Service Bus namespace provisioning
//!
//! SBMOD turns a declarative namespace configuration into an ordered set of
//! create/update operations for a messaging namespace and its queues, topics,
//! subscriptions, filter rules and authorization rules.
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-types** owns: the raw and validated configuration model, node
//!   identities, value types (durations, TLS versions) and the error taxonomy
//! - **sbmod-catalog** owns: tier-dependent limits
//! - **sbmod-validator** owns: turning a raw document into a validated config
//! - **sbmod-graph** / **sbmod-reconcile** / **sbmod-output** own the
//!   downstream pipeline
//!
//! ## Key Concepts
//!
//! - **RawNamespaceConfig**: The document as supplied by the caller
//! - **NamespaceConfig**: The typed tree produced by validation
//! - **NodeId**: Identity of a resource, `(kind, scope, name)`
//! - **FieldError**: One addressable validation defect

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod duration;
pub mod error;
pub mod ids;
pub mod model;
pub mod raw;
pub mod tls;

pub use duration::{DurationParseError, IsoDuration};
pub use error::{ErrorKind, FieldError, ValidationErrors};
pub use ids::{NodeId, NodeKind, ScopePath, ScopeSegment};
pub use model::{
    AuthScope, AuthorizationRule, CorrelationFilter, EntityStatus, Feature, FilterType,
    NamespaceConfig, QueueConfig, RuleConfig, RuleFilter, Sku, SubscriptionConfig, TopicConfig,
};
pub use raw::{
    RawAuthorizationRule, RawCorrelationFilter, RawNamespaceConfig, RawQueueConfig,
    RawRuleConfig, RawSqlFilter, RawSubscriptionConfig, RawTopicConfig,
};
pub use tls::{TlsVersion, TlsVersionParseError};
