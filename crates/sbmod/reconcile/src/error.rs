//! Reconciliation error types

use sbmod_graph::GraphError;
use sbmod_types::NodeId;
use thiserror::Error;

/// Errors raised by apply backends and observed-state readers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend rejected {node}: {reason}")]
    Rejected { node: NodeId, reason: String },

    #[error("Resource already exists: {0}")]
    AlreadyExists(NodeId),

    #[error("Resource not found: {0}")]
    NotFound(NodeId),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced after applying a plan
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Plan application rejected: {failed} failed, {skipped} skipped (first failure at {first}: {cause})")]
    Rejected {
        failed: usize,
        skipped: usize,
        first: NodeId,
        cause: BackendError,
    },
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;
