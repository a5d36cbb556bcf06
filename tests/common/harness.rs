//! Headless editor harness.
//!
//! Builds a registry with a small set of node and IO types, wraps the
//! controller in an [`EditorHandle`] bound to a `VecModel` of path rows, and
//! offers helpers that simulate what a renderer would send.

#![allow(dead_code)]

use super::{init_logging, EventTracker, HookTracker};
use flow_graph_editor::{
    ConnectionId, EditorConfig, EditorHandle, NodeData, NodeId, NodeIoTypeData, NodeTypeData, NodeTypeRegistry,
    PathSync, SocketRef,
};
use slint::platform::Key;
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

pub fn number_color() -> Color {
    Color::from_rgb_u8(100, 150, 255)
}

pub fn text_color() -> Color {
    Color::from_rgb_u8(255, 200, 100)
}

pub fn flow_color() -> Color {
    Color::from_rgb_u8(0, 255, 255)
}

/// Row type the harness renders connections into.
#[derive(Clone, Debug, PartialEq)]
pub struct PathRow {
    pub id: i32,
    pub path: SharedString,
    pub color: Color,
    pub dashed: bool,
}

/// `const`: one number output, no flow input.
pub fn const_node(name: &str) -> NodeData {
    NodeData::new("const", name).with_output("value", "number")
}

/// `step`: flow input, a number input, a number output and a flow output.
///
/// Default layout puts its sockets at flow-in (0, 20), `value` (0, 52),
/// `result` (150, 52) and `next` (150, 76) relative to the node.
pub fn step_node(name: &str) -> NodeData {
    NodeData::new("step", name)
        .with_input("value", "number")
        .with_output("result", "number")
        .with_output("next", "flow")
}

/// `label`: a text input and a text output, no flow input.
pub fn label_node(name: &str) -> NodeData {
    NodeData::new("label", name).with_input("text", "text").with_output("text", "text")
}

fn node_type(name: &str, hooks: &HookTracker) -> NodeTypeData {
    let (created, deleted) = (hooks.clone(), hooks.clone());
    let (added, removed) = (hooks.clone(), hooks.clone());
    let (flow_added, flow_removed) = (hooks.clone(), hooks.clone());
    NodeTypeData::new(name)
        .on_created(move |ctx| created.record("created", ctx.node))
        .on_deleted(move |ctx| deleted.record("deleted", ctx.node))
        .on_connection_added(move |ctx| added.record("connection_added", ctx.node))
        .on_connection_removed(move |ctx| removed.record("connection_removed", ctx.node))
        .on_flow_connection_added(move |ctx| flow_added.record("flow_connection_added", ctx.node))
        .on_flow_connection_removed(move |ctx| flow_removed.record("flow_connection_removed", ctx.node))
}

/// Registry used by every harness, recording all hooks into `hooks`.
pub fn registry(hooks: &HookTracker) -> NodeTypeRegistry {
    let mut registry = NodeTypeRegistry::new();
    registry.register_node_io([
        NodeIoTypeData::new("number", number_color()),
        NodeIoTypeData::new("text", text_color()),
        NodeIoTypeData::flow("flow", flow_color()),
    ]);
    registry.register_node([
        node_type("const", hooks).on_render_body(|ctx| SharedString::from(format!("= {}", ctx.data.name))),
        node_type("step", hooks).with_flow_input(),
        node_type("label", hooks),
    ]);
    registry
}

pub struct EditorHarness {
    pub editor: EditorHandle,
    pub paths: Rc<VecModel<PathRow>>,
    pub events: EventTracker,
    pub hooks: HookTracker,
}

impl EditorHarness {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        init_logging();
        let hooks = HookTracker::new();
        let editor = EditorHandle::with_config(registry(&hooks), config);

        let events = EventTracker::new();
        events.attach(editor.borrow_mut().events_mut());

        let paths = Rc::new(VecModel::default());
        editor.bind_paths(PathSync::new(paths.clone(), |id, path, color, dashed| PathRow {
            id,
            path,
            color,
            dashed,
        }));

        Self { editor, paths, events, hooks }
    }

    // === Building the graph ===

    pub fn add(&self, x: f32, y: f32, data: NodeData) -> NodeId {
        let id = self.editor.borrow_mut().add_node(x, y, data);
        self.editor.refresh();
        id
    }

    pub fn add_const(&self, x: f32, y: f32) -> NodeId {
        self.add(x, y, const_node("Const"))
    }

    pub fn add_step(&self, x: f32, y: f32) -> NodeId {
        self.add(x, y, step_node("Step"))
    }

    /// Connect through the API, bypassing the pointer protocol.
    pub fn connect(&self, input: SocketRef, output: SocketRef) -> ConnectionId {
        let id = self
            .editor
            .borrow_mut()
            .add_connection(input, output)
            .expect("connection should be accepted");
        self.editor.refresh();
        id
    }

    // === Pointer simulation ===

    pub fn pointer_down(&self, x: f32, y: f32) {
        (self.editor.pointer_down_callback())(x, y);
    }

    pub fn pointer_move(&self, x: f32, y: f32) {
        (self.editor.pointer_move_callback())(x, y);
    }

    pub fn pointer_up(&self, x: f32, y: f32) {
        (self.editor.pointer_up_callback())(x, y);
    }

    pub fn key_tap(&self, key: Key) -> bool {
        (self.editor.key_pressed_callback())(SharedString::from(key))
    }

    /// Screen position of a socket center.
    pub fn socket_screen(&self, socket: SocketRef) -> (f32, f32) {
        let ctrl = self.editor.borrow();
        let (x, y) = ctrl.geometry().socket_center(socket).expect("socket has geometry");
        ctrl.camera().graph_to_screen(x, y)
    }

    /// Screen position of the middle of a node.
    pub fn node_screen(&self, node: NodeId) -> (f32, f32) {
        let ctrl = self.editor.borrow();
        let rect = ctrl.geometry().node_rect(node).expect("node has geometry");
        ctrl.camera().graph_to_screen(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    /// Highest live connection id.
    pub fn newest_connection(&self) -> Option<ConnectionId> {
        self.editor.borrow().connections().map(|c| c.id()).max()
    }

    /// Drag from `from` and release over socket `to`, the way a renderer
    /// reports it: pointer-enter on the target before the release.
    ///
    /// Returns the connection created by the release, if any.
    pub fn drag_connection(&self, from: SocketRef, to: SocketRef) -> Option<ConnectionId> {
        let before = self.newest_connection();
        let (sx, sy) = self.socket_screen(from);
        let (tx, ty) = self.socket_screen(to);

        let (node, kind, index) = to.to_parts();

        self.pointer_down(sx, sy);
        self.pointer_move((sx + tx) / 2.0, (sy + ty) / 2.0);
        (self.editor.socket_enter_callback())(node, kind, index);
        self.pointer_move(tx, ty);
        self.pointer_up(tx, ty);
        (self.editor.socket_leave_callback())(node, kind, index);

        let after = self.newest_connection();
        (after != before).then_some(after).flatten()
    }

    /// Drag from `from` and release over the body of `node`.
    pub fn drag_to_node(&self, from: SocketRef, node: NodeId) -> Option<ConnectionId> {
        let before = self.newest_connection();
        let (sx, sy) = self.socket_screen(from);
        let (tx, ty) = self.node_screen(node);

        self.pointer_down(sx, sy);
        (self.editor.node_enter_callback())(node.0);
        self.pointer_move(tx, ty);
        self.pointer_up(tx, ty);
        (self.editor.node_leave_callback())(node.0);

        let after = self.newest_connection();
        (after != before).then_some(after).flatten()
    }

    /// Drag a node by its body by `(dx, dy)` screen pixels.
    pub fn drag_node(&self, node: NodeId, dx: f32, dy: f32) {
        let (x, y) = self.node_screen(node);
        self.pointer_down(x, y);
        self.pointer_move(x + dx / 2.0, y + dy / 2.0);
        self.pointer_move(x + dx, y + dy);
        self.pointer_up(x + dx, y + dy);
    }

    // === Inspection ===

    pub fn rows(&self) -> Vec<PathRow> {
        self.paths.iter().collect()
    }

    pub fn node_count(&self) -> usize {
        self.editor.borrow().node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.editor.borrow().connection_count()
    }
}
