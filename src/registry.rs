//! Node type registry.
//!
//! Maps node type names and IO value-type names to display metadata and
//! optional lifecycle hooks. The registry is filled once at startup and read
//! by the controller afterwards; it never mutates the graph itself.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = NodeTypeRegistry::new();
//! registry.register_node_io([
//!     NodeIoTypeData::new("number", Color::from_rgb_u8(100, 150, 255)),
//!     NodeIoTypeData::flow("flow", Color::from_rgb_u8(0, 255, 255)),
//! ]);
//! registry.register_node([NodeTypeData::new("print")
//!     .with_flow_input()
//!     .on_connection_added(|ctx| log::info!("input {:?} connected", ctx.input_name))]);
//! ```

use crate::connection::{default_color, ConnectionId};
use crate::model::{NodeData, NodeId};
use crate::socket::SocketRef;
use slint::{Color, SharedString};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Context passed to `created`, `deleted` and `render_body` hooks.
#[derive(Clone, Copy, Debug)]
pub struct NodeHookContext<'a> {
    pub node: NodeId,
    pub data: &'a NodeData,
}

/// Context passed to connection hooks.
///
/// `node` is the node whose type hook is running; the same connection is
/// reported once per side.
#[derive(Clone, Copy, Debug)]
pub struct ConnectionHookContext<'a> {
    pub node: NodeId,
    pub connection: ConnectionId,
    pub input: SocketRef,
    pub output: SocketRef,
    /// Name of the logical input, `None` when the input is a flow-input port.
    pub input_name: Option<&'a str>,
    pub output_name: &'a str,
}

pub type NodeHook = Rc<dyn Fn(&NodeHookContext<'_>)>;
pub type ConnectionHook = Rc<dyn Fn(&ConnectionHookContext<'_>)>;
pub type RenderBodyHook = Rc<dyn Fn(&NodeHookContext<'_>) -> SharedString>;

/// Optional per-type behavior.
#[derive(Clone, Default)]
pub struct NodeHooks {
    pub created: Option<NodeHook>,
    pub deleted: Option<NodeHook>,
    pub connection_added: Option<ConnectionHook>,
    pub connection_removed: Option<ConnectionHook>,
    pub flow_connection_added: Option<ConnectionHook>,
    pub flow_connection_removed: Option<ConnectionHook>,
    pub render_body: Option<RenderBodyHook>,
}

impl fmt::Debug for NodeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHooks")
            .field("created", &self.created.is_some())
            .field("deleted", &self.deleted.is_some())
            .field("connection_added", &self.connection_added.is_some())
            .field("connection_removed", &self.connection_removed.is_some())
            .field("flow_connection_added", &self.flow_connection_added.is_some())
            .field("flow_connection_removed", &self.flow_connection_removed.is_some())
            .field("render_body", &self.render_body.is_some())
            .finish()
    }
}

/// Registry entry for a node type.
#[derive(Clone, Debug)]
pub struct NodeTypeData {
    pub node_type: String,
    pub color: Option<Color>,
    /// Whether nodes of this type get a flow-input port.
    pub flow_input: bool,
    pub hooks: NodeHooks,
}

impl NodeTypeData {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            color: None,
            flow_input: false,
            hooks: NodeHooks::default(),
        }
    }

    pub fn with_flow_input(mut self) -> Self {
        self.flow_input = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn on_created(mut self, hook: impl Fn(&NodeHookContext<'_>) + 'static) -> Self {
        self.hooks.created = Some(Rc::new(hook));
        self
    }

    pub fn on_deleted(mut self, hook: impl Fn(&NodeHookContext<'_>) + 'static) -> Self {
        self.hooks.deleted = Some(Rc::new(hook));
        self
    }

    pub fn on_connection_added(mut self, hook: impl Fn(&ConnectionHookContext<'_>) + 'static) -> Self {
        self.hooks.connection_added = Some(Rc::new(hook));
        self
    }

    pub fn on_connection_removed(mut self, hook: impl Fn(&ConnectionHookContext<'_>) + 'static) -> Self {
        self.hooks.connection_removed = Some(Rc::new(hook));
        self
    }

    pub fn on_flow_connection_added(mut self, hook: impl Fn(&ConnectionHookContext<'_>) + 'static) -> Self {
        self.hooks.flow_connection_added = Some(Rc::new(hook));
        self
    }

    pub fn on_flow_connection_removed(mut self, hook: impl Fn(&ConnectionHookContext<'_>) + 'static) -> Self {
        self.hooks.flow_connection_removed = Some(Rc::new(hook));
        self
    }

    pub fn on_render_body(mut self, hook: impl Fn(&NodeHookContext<'_>) -> SharedString + 'static) -> Self {
        self.hooks.render_body = Some(Rc::new(hook));
        self
    }
}

/// Registry entry for an IO value type.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeIoTypeData {
    pub io_type: String,
    pub color: Color,
    /// Outputs of this type carry control flow: their value is the id of the
    /// node they point at.
    pub flow: bool,
}

impl NodeIoTypeData {
    pub fn new(io_type: impl Into<String>, color: Color) -> Self {
        Self { io_type: io_type.into(), color, flow: false }
    }

    pub fn flow(io_type: impl Into<String>, color: Color) -> Self {
        Self { io_type: io_type.into(), color, flow: true }
    }
}

/// Lookup table of node and IO types.
///
/// Registering a name twice replaces the earlier entry without complaint, so
/// hosts can override built-in types by registering after them.
#[derive(Clone, Debug, Default)]
pub struct NodeTypeRegistry {
    nodes: HashMap<String, NodeTypeData>,
    io: HashMap<String, NodeIoTypeData>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_node<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = NodeTypeData>,
    {
        for entry in entries {
            log::debug!("registering node type `{}`", entry.node_type);
            self.nodes.insert(entry.node_type.clone(), entry);
        }
    }

    pub fn register_node_io<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = NodeIoTypeData>,
    {
        for entry in entries {
            log::debug!("registering io type `{}`", entry.io_type);
            self.io.insert(entry.io_type.clone(), entry);
        }
    }

    pub fn get_node(&self, node_type: &str) -> Option<&NodeTypeData> {
        self.nodes.get(node_type)
    }

    pub fn get_node_io(&self, io_type: &str) -> Option<&NodeIoTypeData> {
        self.io.get(io_type)
    }

    pub fn hooks(&self, node_type: &str) -> Option<&NodeHooks> {
        self.get_node(node_type).map(|n| &n.hooks)
    }

    /// Registered color of an IO type, white when unknown.
    pub fn io_color(&self, io_type: &str) -> Color {
        self.get_node_io(io_type).map_or_else(default_color, |io| io.color)
    }

    /// Header color registered for a node type, if any.
    pub fn node_color(&self, node_type: &str) -> Option<Color> {
        self.get_node(node_type).and_then(|n| n.color)
    }

    /// Whether outputs of this IO type carry control flow.
    pub fn is_flow_io(&self, io_type: &str) -> bool {
        self.get_node_io(io_type).is_some_and(|io| io.flow)
    }

    pub fn has_flow_input(&self, node_type: &str) -> bool {
        self.get_node(node_type).is_some_and(|n| n.flow_input)
    }
}
