//! Error type shared by the editing engine.
//!
//! Only structural misuse is an error. Expected negative outcomes, such as
//! dropping a connection on an incompatible socket or looking up an
//! unregistered node type, are reported through `Option`/`bool` instead.

use crate::connection::ConnectionId;
use crate::model::NodeId;
use crate::socket::SocketRef;

/// Errors produced by [`GraphController`](crate::GraphController) and the graph model.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A connection was created without an input and without an output.
    #[error("connection needs at least one endpoint")]
    MissingEndpoints,

    /// Referenced node is not part of the editor.
    #[error("node {0} not found")]
    UnknownNode(NodeId),

    /// Referenced socket does not exist on its node.
    #[error("socket {0} not found")]
    UnknownSocket(SocketRef),

    /// Referenced connection is not live.
    #[error("connection {0} not found")]
    UnknownConnection(ConnectionId),

    /// Endpoints passed as (input, output) do not have those directions.
    #[error("cannot connect {output} into {input}: must connect an output to an input")]
    DirectionMismatch {
        /// Socket passed as the input side.
        input: SocketRef,
        /// Socket passed as the output side.
        output: SocketRef,
    },

    /// Every connection id up to [`ConnectionId::MAX`] has been handed out;
    /// re-importing the graph renumbers from zero.
    #[error("connection ids exhausted")]
    ConnectionIdsExhausted,

    /// Serialized graph or configuration could not be parsed.
    #[error("invalid graph data: {0}")]
    InvalidGraph(#[from] serde_json::Error),
}
