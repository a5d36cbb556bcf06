//! Active selection.
//!
//! The editor highlights at most one thing at a time: a node or a
//! connection. A single enum slot makes "both selected" unrepresentable.

use crate::connection::ConnectionId;
use crate::model::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveSelection {
    #[default]
    None,
    Node(NodeId),
    Connection(ConnectionId),
}

impl ActiveSelection {
    pub fn is_empty(&self) -> bool {
        matches!(self, ActiveSelection::None)
    }

    pub fn node(&self) -> Option<NodeId> {
        match *self {
            ActiveSelection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        match *self {
            ActiveSelection::Connection(id) => Some(id),
            _ => None,
        }
    }

    /// Empty the slot, returning what was selected.
    pub fn take(&mut self) -> ActiveSelection {
        std::mem::take(self)
    }
}
