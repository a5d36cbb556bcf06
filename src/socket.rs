//! Sockets and ports.
//!
//! A [`Socket`] is one attachment point on a node. It only knows its owner,
//! its direction, its value type and the ids of the connections attached to
//! it; it never talks to the graph model.
//!
//! Sockets are addressed from outside through [`SocketRef`], a plain `Copy`
//! value (node id + slot), so connections and the controller's hover state
//! never hold references into the node tree.

use crate::connection::ConnectionId;
use crate::model::{IoDirection, NodeId};
use slint::Color;
use std::fmt;

/// Which slot of a node a socket occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SocketKind {
    /// Data input at the given declaration index.
    Input(usize),
    /// Output at the given declaration index.
    Output(usize),
    /// The node's control-flow entry.
    FlowInput,
}

impl SocketKind {
    pub fn direction(self) -> IoDirection {
        match self {
            SocketKind::Input(_) | SocketKind::FlowInput => IoDirection::Input,
            SocketKind::Output(_) => IoDirection::Output,
        }
    }
}

/// Kind code of a data input in renderer callbacks.
pub const INPUT_SOCKET: i32 = 0;
/// Kind code of an output in renderer callbacks.
pub const OUTPUT_SOCKET: i32 = 1;
/// Kind code of a flow input in renderer callbacks; the index is ignored.
pub const FLOW_INPUT_SOCKET: i32 = 2;

/// Address of a socket: owning node plus slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SocketRef {
    pub node: NodeId,
    pub kind: SocketKind,
}

impl SocketRef {
    pub fn new(node: NodeId, kind: SocketKind) -> Self {
        Self { node, kind }
    }

    pub fn input(node: NodeId, index: usize) -> Self {
        Self::new(node, SocketKind::Input(index))
    }

    pub fn output(node: NodeId, index: usize) -> Self {
        Self::new(node, SocketKind::Output(index))
    }

    pub fn flow_input(node: NodeId) -> Self {
        Self::new(node, SocketKind::FlowInput)
    }

    pub fn direction(&self) -> IoDirection {
        self.kind.direction()
    }

    /// Decode the `(node, kind, index)` triple a renderer reports.
    ///
    /// Returns `None` for an unknown kind code or a negative index.
    pub fn from_parts(node: i32, kind: i32, index: i32) -> Option<Self> {
        let node = NodeId(node);
        match kind {
            INPUT_SOCKET => usize::try_from(index).ok().map(|i| Self::input(node, i)),
            OUTPUT_SOCKET => usize::try_from(index).ok().map(|i| Self::output(node, i)),
            FLOW_INPUT_SOCKET => Some(Self::flow_input(node)),
            _ => None,
        }
    }

    /// Encode as the `(node, kind, index)` triple used by renderer callbacks.
    pub fn to_parts(&self) -> (i32, i32, i32) {
        let index = |i: usize| i32::try_from(i).unwrap_or(i32::MAX);
        match self.kind {
            SocketKind::Input(i) => (self.node.0, INPUT_SOCKET, index(i)),
            SocketKind::Output(i) => (self.node.0, OUTPUT_SOCKET, index(i)),
            SocketKind::FlowInput => (self.node.0, FLOW_INPUT_SOCKET, 0),
        }
    }

    /// Two sockets can be connected iff their directions differ.
    ///
    /// Value types are not compared: they only drive colors.
    /// Type checking, if any, belongs to node-type hooks.
    pub fn is_compatible(&self, other: &SocketRef) -> bool {
        self.direction() != other.direction()
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SocketKind::Input(i) => write!(f, "{}:in{}", self.node, i),
            SocketKind::Output(i) => write!(f, "{}:out{}", self.node, i),
            SocketKind::FlowInput => write!(f, "{}:flow", self.node),
        }
    }
}

/// A connection endpoint on a node.
#[derive(Clone, Debug)]
pub struct Socket {
    owner: NodeId,
    direction: IoDirection,
    value_type: String,
    color: Color,
    connections: Vec<ConnectionId>,
}

impl Socket {
    pub fn new(owner: NodeId, direction: IoDirection, value_type: impl Into<String>, color: Color) -> Self {
        Self {
            owner,
            direction,
            value_type: value_type.into(),
            color,
            connections: Vec::new(),
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn direction(&self) -> IoDirection {
        self.direction
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_compatible(&self, other: &Socket) -> bool {
        self.direction != other.direction
    }

    /// Attached connection ids, in attach order.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.connections.contains(&id)
    }

    /// Add a connection; attaching twice keeps a single entry.
    pub fn attach(&mut self, id: ConnectionId) {
        if !self.is_attached(id) {
            self.connections.push(id);
        }
    }

    /// Remove a connection. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: ConnectionId) -> bool {
        match self.connections.iter().position(|c| *c == id) {
            Some(index) => {
                self.connections.remove(index);
                true
            }
            None => false,
        }
    }
}

/// A node input or output: the logical declaration name plus its socket.
#[derive(Clone, Debug)]
pub struct Port {
    name: String,
    socket: Socket,
}

impl Port {
    pub fn new(name: impl Into<String>, socket: Socket) -> Self {
        Self { name: name.into(), socket }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn socket(&self) -> &Socket {
        &self.socket
    }

    pub fn socket_mut(&mut self) -> &mut Socket {
        &mut self.socket
    }

    pub fn direction(&self) -> IoDirection {
        self.socket.direction()
    }

    pub fn is_compatible(&self, other: &Port) -> bool {
        self.socket.is_compatible(&other.socket)
    }
}
