//! Graph errors

use sbmod_types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Parent node not found: {0}")]
    MissingParent(NodeId),

    #[error("Node {node} is already owned by {existing}, not {requested}")]
    ParentMismatch {
        node: NodeId,
        existing: NodeId,
        requested: NodeId,
    },
}
