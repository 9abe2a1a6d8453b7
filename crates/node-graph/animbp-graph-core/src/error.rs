//! Error types for graph editing and persistence.

use crate::types::{NodeHandle, NodeId, PinCategory, PinDirection};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    /// Handle refers to a removed node or was never issued by this graph.
    #[error("node handle {0:?} does not resolve")]
    StaleNode(NodeHandle),

    #[error("node {node:?} has no pin at index {pin}")]
    UnknownPin { node: NodeHandle, pin: usize },

    #[error("cannot link two pins of the same node")]
    SelfLink,

    #[error("cannot link two {0:?} pins")]
    SameDirection(PinDirection),

    #[error("cannot link a {from:?} pin to a {to:?} pin")]
    CategoryMismatch { from: PinCategory, to: PinCategory },

    #[error("node id {0} is already in use")]
    DuplicateNodeId(NodeId),

    #[error("no node with id {0}")]
    UnknownNodeId(NodeId),

    #[error("node {node} has no {direction:?} pin named '{pin}'")]
    UnknownPinName {
        node: NodeId,
        pin: String,
        direction: PinDirection,
    },

    #[error("failed to parse graph document: {reason}")]
    Parse { reason: String },
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Parse {
            reason: err.to_string(),
        }
    }
}
