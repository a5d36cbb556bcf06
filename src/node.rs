//! Visual nodes.
//!
//! A [`Node`] mirrors one logical node: its position and a fixed set of
//! ports built from the node's declared inputs and outputs. Port order is
//! declaration order and is used for layout. Only the connection lists inside
//! the sockets change after construction.

use crate::connection::ConnectionId;
use crate::model::{IoDirection, NodeData, NodeId};
use crate::registry::NodeTypeRegistry;
use crate::socket::{Port, Socket, SocketKind, SocketRef};
use slint::{Color, SharedString};

/// Value type reported by flow-input sockets.
pub const FLOW_IO_TYPE: &str = "flow";

/// Color of the flow-input socket (#00ffff).
pub fn flow_socket_color() -> Color {
    Color::from_rgb_u8(0, 255, 255)
}

/// A node's control-flow entry.
#[derive(Clone, Debug)]
pub struct FlowInputPort {
    socket: Socket,
}

impl FlowInputPort {
    fn new(owner: NodeId) -> Self {
        Self {
            socket: Socket::new(owner, IoDirection::Input, FLOW_IO_TYPE, flow_socket_color()),
        }
    }

    pub fn socket(&self) -> &Socket {
        &self.socket
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    node_type: String,
    name: String,
    x: f32,
    y: f32,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    flow_input: Option<FlowInputPort>,
    color: Option<Color>,
    active: bool,
    body: Option<SharedString>,
}

impl Node {
    /// Build the visual node for `data`, one port per declared input/output.
    ///
    /// Socket colors come from the registry's IO types, the header color from
    /// the node type. The flow-input port is present when the node type
    /// enables it.
    pub fn new(data: &NodeData, registry: &NodeTypeRegistry) -> Self {
        let mut node = Self {
            id: data.id,
            node_type: data.node_type.clone(),
            name: data.name.clone(),
            x: data.x,
            y: data.y,
            inputs: Vec::with_capacity(data.inputs.len()),
            outputs: Vec::with_capacity(data.outputs.len()),
            flow_input: None,
            color: registry.node_color(&data.node_type),
            active: false,
            body: None,
        };
        if registry.has_flow_input(&data.node_type) {
            node.flow_input = Some(FlowInputPort::new(data.id));
        }
        for input in &data.inputs {
            node.add_port(IoDirection::Input, &input.name, &input.value_type, registry.io_color(&input.value_type));
        }
        for output in &data.outputs {
            node.add_port(IoDirection::Output, &output.name, &output.value_type, registry.io_color(&output.value_type));
        }
        node
    }

    /// Append a port; returns its socket address.
    pub(crate) fn add_port(&mut self, direction: IoDirection, name: &str, value_type: &str, color: Color) -> SocketRef {
        let port = Port::new(name, Socket::new(self.id, direction, value_type, color));
        match direction {
            IoDirection::Input => {
                self.inputs.push(port);
                SocketRef::input(self.id, self.inputs.len() - 1)
            }
            IoDirection::Output => {
                self.outputs.push(port);
                SocketRef::output(self.id, self.outputs.len() - 1)
            }
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Header color of the node's type; `None` leaves the renderer's default.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn flow_input(&self) -> Option<&FlowInputPort> {
        self.flow_input.as_ref()
    }

    pub fn port(&self, kind: SocketKind) -> Option<&Port> {
        match kind {
            SocketKind::Input(i) => self.inputs.get(i),
            SocketKind::Output(i) => self.outputs.get(i),
            SocketKind::FlowInput => None,
        }
    }

    pub fn socket(&self, kind: SocketKind) -> Option<&Socket> {
        match kind {
            SocketKind::Input(i) => self.inputs.get(i).map(Port::socket),
            SocketKind::Output(i) => self.outputs.get(i).map(Port::socket),
            SocketKind::FlowInput => self.flow_input.as_ref().map(|f| &f.socket),
        }
    }

    pub(crate) fn socket_mut(&mut self, kind: SocketKind) -> Option<&mut Socket> {
        match kind {
            SocketKind::Input(i) => self.inputs.get_mut(i).map(Port::socket_mut),
            SocketKind::Output(i) => self.outputs.get_mut(i).map(Port::socket_mut),
            SocketKind::FlowInput => self.flow_input.as_mut().map(|f| &mut f.socket),
        }
    }

    /// Addresses of every socket on this node: flow-input, inputs, outputs.
    pub fn socket_refs(&self) -> Vec<SocketRef> {
        let flow = self.flow_input.as_ref().map(|_| SocketRef::flow_input(self.id));
        flow.into_iter()
            .chain((0..self.inputs.len()).map(|i| SocketRef::input(self.id, i)))
            .chain((0..self.outputs.len()).map(|i| SocketRef::output(self.id, i)))
            .collect()
    }

    /// Every connection attached to any socket of this node, once each.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self
            .flow_input
            .iter()
            .map(|f| &f.socket)
            .chain(self.inputs.iter().map(Port::socket))
            .chain(self.outputs.iter().map(Port::socket))
            .flat_map(|s| s.connections().iter().copied())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Body content produced by the type's `render_body` hook.
    pub fn body(&self) -> Option<&SharedString> {
        self.body.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.body.is_some()
    }

    pub(crate) fn set_body(&mut self, body: Option<SharedString>) {
        self.body = body;
    }
}
