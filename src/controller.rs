//! Graph controller: the interactive editing engine.
//!
//! [`GraphController`] owns the visual graph (nodes, persisted connections,
//! selection, hover state, the active gesture) and keeps it consistent with a
//! [`GraphModel`]. It runs the connection-creation protocol, cascade deletes,
//! and registry hooks, and reports changes through its [`EventBus`].
//!
//! All pointer coordinates passed in are screen-space; everything stored is
//! graph-space.
//!
//! # Example
//!
//! ```ignore
//! use flow_graph_editor::{GraphController, NodeData, NodeTypeRegistry, SocketRef};
//!
//! let mut ctrl = GraphController::new(NodeTypeRegistry::new());
//! let a = ctrl.add_node(0.0, 0.0, NodeData::new("const", "A").with_output("x", "number"));
//! let b = ctrl.add_node(300.0, 0.0, NodeData::new("print", "B").with_input("y", "number"));
//!
//! // drag from A.x and release over B.y
//! ctrl.begin_connection_drag(SocketRef::output(a, 0), 150.0, 52.0)?;
//! ctrl.socket_pointer_enter(SocketRef::input(b, 0));
//! let created = ctrl.pointer_up(300.0, 52.0)?;
//! assert!(created.is_some());
//! ```

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::connection::{Connection, ConnectionId, ConnectionInfo};
use crate::error::EditorError;
use crate::events::{EventBus, GraphEvent};
use crate::geometry::GeometryCache;
use crate::gesture::{CameraPan, ConnectionDrag, Gesture, NodeDrag};
use crate::hit_test::{find_connection_at, find_node_at, find_socket_at, CurveParams, SimpleConnectionGeometry};
use crate::import::ImportSession;
use crate::model::{FlowGraph, GraphModel, IoDirection, NodeData, NodeId, TargetRef};
use crate::node::Node;
use crate::registry::{ConnectionHook, ConnectionHookContext, NodeHookContext, NodeHooks, NodeTypeRegistry};
use crate::selection::ActiveSelection;
use crate::socket::{Port, Socket, SocketKind, SocketRef};
use slint::platform::Key;
use slint::SharedString;
use std::collections::BTreeMap;

/// Keys the editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
    Delete,
    Escape,
    Other,
}

impl EditorKey {
    /// Map the text of a Slint key event.
    pub fn from_text(text: &str) -> Self {
        if text == SharedString::from(Key::Delete).as_str() {
            EditorKey::Delete
        } else if text == SharedString::from(Key::Escape).as_str() {
            EditorKey::Escape
        } else {
            EditorKey::Other
        }
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Socket(SocketRef),
    Node(NodeId),
    Connection(ConnectionId),
    Canvas,
}

#[derive(Clone, Copy, Debug)]
enum ConnectionHookSlot {
    Added,
    Removed,
    FlowAdded,
    FlowRemoved,
}

impl ConnectionHookSlot {
    fn pick(self, hooks: &NodeHooks) -> Option<&ConnectionHook> {
        match self {
            ConnectionHookSlot::Added => hooks.connection_added.as_ref(),
            ConnectionHookSlot::Removed => hooks.connection_removed.as_ref(),
            ConnectionHookSlot::FlowAdded => hooks.flow_connection_added.as_ref(),
            ConnectionHookSlot::FlowRemoved => hooks.flow_connection_removed.as_ref(),
        }
    }
}

/// Move both ends of a connection onto its sockets' current centers.
fn place_connection(geometry: &GeometryCache, connection: &mut Connection) {
    if let Some((x, y)) = connection.output().and_then(|s| geometry.socket_center(s)) {
        connection.update_start(x, y);
    }
    if let Some((x, y)) = connection.input().and_then(|s| geometry.socket_center(s)) {
        connection.update_end(x, y);
    }
}

pub struct GraphController<M: GraphModel = FlowGraph> {
    pub(crate) model: M,
    pub(crate) registry: NodeTypeRegistry,
    pub(crate) config: EditorConfig,
    pub(crate) geometry: GeometryCache,
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) connections: BTreeMap<ConnectionId, Connection>,
    pub(crate) next_connection_id: u32,
    pub(crate) selection: ActiveSelection,
    pub(crate) active_io: Option<SocketRef>,
    pub(crate) hovered_node: Option<NodeId>,
    pub(crate) gesture: Gesture,
    pub(crate) events: EventBus,
}

impl GraphController<FlowGraph> {
    /// Create a controller over an empty [`FlowGraph`] with default settings.
    pub fn new(registry: NodeTypeRegistry) -> Self {
        Self::with_config(registry, EditorConfig::default())
    }

    pub fn with_config(registry: NodeTypeRegistry, config: EditorConfig) -> Self {
        Self::with_model(FlowGraph::new(), registry, config)
    }
}

impl<M: GraphModel> GraphController<M> {
    /// Create a controller over an existing model.
    ///
    /// The model's nodes are not shown until [`import_graph`](Self::import_graph)
    /// or [`import_json`](Self::import_json) rebuilds the visual graph.
    pub fn with_model(model: M, registry: NodeTypeRegistry, config: EditorConfig) -> Self {
        Self {
            model,
            registry,
            config,
            geometry: GeometryCache::new(),
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            next_connection_id: 0,
            selection: ActiveSelection::None,
            active_io: None,
            hovered_node: None,
            gesture: Gesture::Idle,
            events: EventBus::new(),
        }
    }

    // === Accessors ===

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Registry changes affect nodes created afterwards.
    pub fn registry_mut(&mut self) -> &mut NodeTypeRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// Persisted connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn socket(&self, socket: SocketRef) -> Option<&Socket> {
        self.nodes.get(&socket.node)?.socket(socket.kind)
    }

    fn socket_mut(&mut self, socket: SocketRef) -> Option<&mut Socket> {
        self.nodes.get_mut(&socket.node)?.socket_mut(socket.kind)
    }

    fn port_name(&self, socket: SocketRef) -> Option<&str> {
        self.nodes.get(&socket.node)?.port(socket.kind).map(Port::name)
    }

    pub fn selection(&self) -> ActiveSelection {
        self.selection
    }

    pub fn active_io(&self) -> Option<SocketRef> {
        self.active_io
    }

    pub fn hovered_node(&self) -> Option<NodeId> {
        self.hovered_node
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// The drag preview, while a connection drag is running.
    pub fn preview(&self) -> Option<&Connection> {
        self.gesture.connection_drag().map(|drag| &drag.preview)
    }

    pub fn camera(&self) -> Camera {
        Camera::from(self.model.editor_data())
    }

    fn curve_params(&self) -> CurveParams {
        CurveParams {
            min_offset: self.config.min_curve_offset,
            factor: self.config.curve_factor,
            samples: self.config.hit_samples,
        }
    }

    // === Nodes ===

    /// Add a node at graph position `(x, y)`.
    ///
    /// The model assigns the id. Runs the type's `created` hook, then
    /// dispatches `node-added`.
    pub fn add_node(&mut self, x: f32, y: f32, mut data: NodeData) -> NodeId {
        data.x = x;
        data.y = y;
        let id = self.model.add_node(data);
        self.spawn_node(id);

        let hook = self
            .nodes
            .get(&id)
            .and_then(|node| self.registry.hooks(node.node_type()))
            .and_then(|hooks| hooks.created.as_ref());
        if let (Some(hook), Some(data)) = (hook, self.model.node(id)) {
            hook(&NodeHookContext { node: id, data });
        }

        log::info!("added node {}", id);
        self.events.dispatch(&GraphEvent::NodeAdded(id));
        id
    }

    /// Build the visual node for a model node and lay it out.
    pub(crate) fn spawn_node(&mut self, id: NodeId) -> bool {
        let Some(data) = self.model.node(id) else {
            return false;
        };
        let mut node = Node::new(data, &self.registry);
        let body = self
            .registry
            .hooks(data.node_type.as_str())
            .and_then(|hooks| hooks.render_body.as_ref())
            .map(|render| render(&NodeHookContext { node: id, data }));
        node.set_body(body);
        self.geometry.layout_node(&node, &self.config);
        self.nodes.insert(id, node);
        true
    }

    /// Move a node and write the position to the model.
    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), EditorError> {
        self.set_node_position(id, x, y)?;
        if let Some(data) = self.model.node_mut(id) {
            data.x = x;
            data.y = y;
        }
        Ok(())
    }

    /// Move the visual node only and re-route its connections.
    fn set_node_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), EditorError> {
        let node = self.nodes.get_mut(&id).ok_or(EditorError::UnknownNode(id))?;
        node.set_position(x, y);
        self.geometry.move_node(id, x, y);
        self.reroute_node(id);
        Ok(())
    }

    /// Refresh the paths of connections touching one node.
    fn reroute_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for connection_id in node.connection_ids() {
            if let Some(connection) = self.connections.get_mut(&connection_id) {
                place_connection(&self.geometry, connection);
            }
        }
    }

    /// Renderer report of a node rectangle in graph space.
    ///
    /// Reports for nodes that are not in the editor (a late frame after a
    /// delete) are dropped.
    pub fn handle_node_rect(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        if !self.nodes.contains_key(&id) {
            log::debug!("ignoring rect of unknown node {}", id);
            return;
        }
        self.geometry.handle_node_rect_report(id, x, y, width, height);
        self.reroute_node(id);
    }

    /// Renderer report of a socket center relative to its node.
    ///
    /// Reports for sockets the editor does not know are dropped.
    pub fn handle_socket_position(&mut self, socket: SocketRef, rel_x: f32, rel_y: f32) {
        if self.socket(socket).is_none() {
            log::debug!("ignoring position of unknown socket {}", socket);
            return;
        }
        self.geometry.handle_socket_report(socket, rel_x, rel_y);
        self.reroute_node(socket.node);
    }

    /// Delete a node and everything attached to it.
    ///
    /// Every touching connection goes through [`delete_connection`](Self::delete_connection)
    /// first, so their hooks and events fire while both endpoints still exist.
    /// Then the type's `deleted` hook runs, the node leaves the model and the
    /// editor, and `node-deleted` is dispatched.
    pub fn delete_node(&mut self, id: NodeId) -> Result<(), EditorError> {
        let node = self.nodes.get(&id).ok_or(EditorError::UnknownNode(id))?;
        let attached = node.connection_ids();
        let node_type = node.node_type().to_owned();

        for connection_id in attached {
            if self.connections.contains_key(&connection_id) {
                self.delete_connection(connection_id)?;
            }
        }

        let hook = self.registry.hooks(&node_type).and_then(|hooks| hooks.deleted.as_ref());
        if let (Some(hook), Some(data)) = (hook, self.model.node(id)) {
            hook(&NodeHookContext { node: id, data });
        }

        self.model.remove_node(id);
        self.nodes.remove(&id);
        self.geometry.remove_node(id);

        if self.selection == ActiveSelection::Node(id) {
            self.selection = ActiveSelection::None;
        }
        if self.active_io.is_some_and(|s| s.node == id) {
            self.active_io = None;
        }
        if self.hovered_node == Some(id) {
            self.hovered_node = None;
        }
        let gesture_on_node = match &self.gesture {
            Gesture::ConnectionDrag(drag) => drag.origin.node == id,
            Gesture::NodeDrag(drag) => drag.node == id,
            _ => false,
        };
        if gesture_on_node {
            self.gesture = Gesture::Idle;
        }

        log::info!("deleted node {}", id);
        self.events.dispatch(&GraphEvent::NodeDeleted(id));
        Ok(())
    }

    // === Connections ===

    /// Connect an output to an input.
    ///
    /// Only direction is checked; value types only pick the color.
    pub fn add_connection(&mut self, input: SocketRef, output: SocketRef) -> Result<ConnectionId, EditorError> {
        self.commit_connection(input, output, None)
    }

    /// Persist a connection between `input` and `output`.
    ///
    /// With an import session the hooks, model writes and the
    /// `connection-added` event are skipped.
    pub(crate) fn commit_connection(
        &mut self,
        input: SocketRef,
        output: SocketRef,
        session: Option<&mut ImportSession>,
    ) -> Result<ConnectionId, EditorError> {
        if input.direction() != IoDirection::Input || output.direction() != IoDirection::Output {
            return Err(EditorError::DirectionMismatch { input, output });
        }
        self.socket(input).ok_or(EditorError::UnknownSocket(input))?;
        let output_socket = self.socket(output).ok_or(EditorError::UnknownSocket(output))?;
        let value_type = output_socket.value_type().to_owned();
        // a flow output dropped on a data input is a data edge: the input's
        // target reference is what gets stored
        let flow = input.kind == SocketKind::FlowInput && self.registry.is_flow_io(&value_type);
        let importing = session.is_some();

        // a flow output stores a single target
        if flow && !importing {
            let replaced: Vec<ConnectionId> = output_socket
                .connections()
                .iter()
                .copied()
                .filter(|id| self.connections.get(id).is_some_and(Connection::is_flow))
                .collect();
            for id in replaced {
                log::debug!("replacing flow connection {} from {}", id, output);
                self.delete_connection(id)?;
            }
        }

        let id = self.allocate_connection_id()?;
        let mut connection = Connection::new(id, Some(input), Some(output), false, self.registry.io_color(&value_type))?
            .with_curve(self.config.min_curve_offset, self.config.curve_factor);
        connection.set_flow(flow);
        place_connection(&self.geometry, &mut connection);
        let info = connection.info();

        if !importing {
            if flow {
                self.run_connection_hook(input.node, ConnectionHookSlot::FlowAdded, &info);
                self.run_connection_hook(output.node, ConnectionHookSlot::FlowRemoved, &info);
                self.write_flow_target(output, Some(input.node));
            } else {
                self.run_connection_hook(input.node, ConnectionHookSlot::Added, &info);
                self.run_connection_hook(output.node, ConnectionHookSlot::Added, &info);
                self.write_input_target(input, output);
            }
        }

        for endpoint in [input, output] {
            if let Some(socket) = self.socket_mut(endpoint) {
                socket.attach(id);
            }
        }
        self.connections.insert(id, connection);

        match session {
            Some(session) => session.record_connection(),
            None => {
                log::debug!("connected {} -> {} as {}{}", output, input, id, if flow { " (flow)" } else { "" });
                self.events.dispatch(&GraphEvent::ConnectionAdded(info));
            }
        }
        Ok(id)
    }

    /// Hand out the next connection id.
    ///
    /// Ids stay within `0..=ConnectionId::MAX` so renderers can hold them as
    /// `i32`; ids are not reused until the next import.
    fn allocate_connection_id(&mut self) -> Result<ConnectionId, EditorError> {
        let id = ConnectionId(self.next_connection_id);
        if id > ConnectionId::MAX {
            return Err(EditorError::ConnectionIdsExhausted);
        }
        self.next_connection_id = self.next_connection_id.saturating_add(1);
        Ok(id)
    }

    /// Remove a persisted connection.
    ///
    /// Detaches from both sockets first, then undoes the model write and runs
    /// the removal hooks on both sides. `connection-deleted` is always
    /// dispatched.
    pub fn delete_connection(&mut self, id: ConnectionId) -> Result<ConnectionInfo, EditorError> {
        let connection = self.connections.remove(&id).ok_or(EditorError::UnknownConnection(id))?;
        for endpoint in connection.endpoints() {
            if let Some(socket) = self.socket_mut(endpoint) {
                socket.detach(id);
            }
        }
        if self.selection == ActiveSelection::Connection(id) {
            self.selection = ActiveSelection::None;
        }

        let info = connection.info();
        if !connection.is_transient() {
            if let (Some(input), Some(output)) = (info.input, info.output) {
                if info.flow {
                    self.write_flow_target(output, None);
                    self.run_connection_hook(input.node, ConnectionHookSlot::FlowRemoved, &info);
                    self.run_connection_hook(output.node, ConnectionHookSlot::FlowRemoved, &info);
                } else {
                    self.clear_input_target(input, output);
                    self.run_connection_hook(input.node, ConnectionHookSlot::Removed, &info);
                    self.run_connection_hook(output.node, ConnectionHookSlot::Removed, &info);
                }
            }
        }

        log::debug!("deleted connection {}", id);
        self.events.dispatch(&GraphEvent::ConnectionDeleted(info));
        Ok(info)
    }

    fn run_connection_hook(&self, node: NodeId, slot: ConnectionHookSlot, info: &ConnectionInfo) {
        let Some(hook) = self
            .nodes
            .get(&node)
            .and_then(|n| self.registry.hooks(n.node_type()))
            .and_then(|hooks| slot.pick(hooks))
        else {
            return;
        };
        let (Some(input), Some(output)) = (info.input, info.output) else {
            return;
        };
        hook(&ConnectionHookContext {
            node,
            connection: info.id,
            input,
            output,
            input_name: self.port_name(input),
            output_name: self.port_name(output).unwrap_or_default(),
        });
    }

    fn write_flow_target(&mut self, output: SocketRef, target: Option<NodeId>) {
        let SocketKind::Output(index) = output.kind else {
            return;
        };
        match self.model.node_mut(output.node).and_then(|n| n.outputs.get_mut(index)) {
            Some(data) => data.set_flow_target(target),
            None => log::warn!("flow output {} missing from the graph model", output),
        }
    }

    fn write_input_target(&mut self, input: SocketRef, output: SocketRef) {
        let SocketKind::Input(index) = input.kind else {
            return;
        };
        let Some(output_name) = self.port_name(output).map(str::to_owned) else {
            return;
        };
        match self.model.node_mut(input.node).and_then(|n| n.inputs.get_mut(index)) {
            Some(data) => data.target = Some(TargetRef::new(output.node, output_name)),
            None => log::warn!("input {} missing from the graph model", input),
        }
    }

    /// Clear an input's target if it still points at `output`.
    fn clear_input_target(&mut self, input: SocketRef, output: SocketRef) {
        let SocketKind::Input(index) = input.kind else {
            return;
        };
        let Some(output_name) = self.port_name(output).map(str::to_owned) else {
            return;
        };
        let expected = TargetRef::new(output.node, output_name);
        if let Some(data) = self.model.node_mut(input.node).and_then(|n| n.inputs.get_mut(index)) {
            if data.target.as_ref() == Some(&expected) {
                data.target = None;
            } else {
                log::debug!("input {} was retargeted, keeping its target", input);
            }
        }
    }

    // === Selection ===

    fn set_selection(&mut self, selection: ActiveSelection) {
        match self.selection.take() {
            ActiveSelection::Node(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_active(false);
                }
            }
            ActiveSelection::Connection(id) => {
                if let Some(connection) = self.connections.get_mut(&id) {
                    connection.set_active(false);
                }
            }
            ActiveSelection::None => {}
        }
        match selection {
            ActiveSelection::Node(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_active(true);
                }
            }
            ActiveSelection::Connection(id) => {
                if let Some(connection) = self.connections.get_mut(&id) {
                    connection.set_active(true);
                }
            }
            ActiveSelection::None => {}
        }
        self.selection = selection;
    }

    /// Clear the selection and dispatch `graph-clicked`.
    pub fn click_canvas(&mut self) {
        self.set_selection(ActiveSelection::None);
        self.events.dispatch(&GraphEvent::GraphClicked);
    }

    pub fn click_node(&mut self, id: NodeId) -> Result<(), EditorError> {
        if !self.nodes.contains_key(&id) {
            return Err(EditorError::UnknownNode(id));
        }
        self.set_selection(ActiveSelection::Node(id));
        self.events.dispatch(&GraphEvent::NodeClicked(id));
        Ok(())
    }

    pub fn click_connection(&mut self, id: ConnectionId) -> Result<(), EditorError> {
        if !self.connections.contains_key(&id) {
            return Err(EditorError::UnknownConnection(id));
        }
        self.set_selection(ActiveSelection::Connection(id));
        self.events.dispatch(&GraphEvent::ConnectionClicked(id));
        Ok(())
    }

    /// Delete whatever is selected. Returns `false` when nothing was.
    pub fn delete_selection(&mut self) -> Result<bool, EditorError> {
        let deleted = match self.selection {
            ActiveSelection::Node(id) => {
                self.delete_node(id)?;
                true
            }
            ActiveSelection::Connection(id) => {
                self.delete_connection(id)?;
                true
            }
            ActiveSelection::None => false,
        };
        self.set_selection(ActiveSelection::None);
        Ok(deleted)
    }

    /// Delete removes the selection, Escape cancels the running gesture.
    ///
    /// Returns whether the key was handled.
    pub fn key_pressed(&mut self, key: EditorKey) -> Result<bool, EditorError> {
        match key {
            EditorKey::Delete => self.delete_selection(),
            EditorKey::Escape => Ok(self.pointer_cancel()),
            EditorKey::Other => Ok(false),
        }
    }

    // === Hover ===

    /// The pointer entered a socket; it becomes the drop candidate.
    pub fn socket_pointer_enter(&mut self, socket: SocketRef) {
        self.active_io = Some(socket);
    }

    pub fn socket_pointer_leave(&mut self, socket: SocketRef) {
        if self.active_io == Some(socket) {
            self.active_io = None;
        }
    }

    pub fn node_pointer_enter(&mut self, id: NodeId) {
        self.hovered_node = Some(id);
    }

    pub fn node_pointer_leave(&mut self, id: NodeId) {
        if self.hovered_node == Some(id) {
            self.hovered_node = None;
        }
    }

    /// Hit-test the pointer and update the hovered socket and node.
    pub fn hover_at(&mut self, screen_x: f32, screen_y: f32) -> Option<SocketRef> {
        let (x, y) = self.camera().screen_to_graph(screen_x, screen_y);
        self.active_io = find_socket_at(x, y, self.geometry.absolute_sockets(), self.config.socket_hit_radius);
        self.hovered_node = find_node_at(x, y, self.geometry.node_rects.values().copied());
        self.active_io
    }

    // === Gestures ===

    /// Route a pointer-down: sockets first, then nodes, then connections,
    /// then the canvas.
    pub fn pointer_down_at(&mut self, screen_x: f32, screen_y: f32) -> Result<PointerTarget, EditorError> {
        let (x, y) = self.camera().screen_to_graph(screen_x, screen_y);

        if let Some(socket) = find_socket_at(x, y, self.geometry.absolute_sockets(), self.config.socket_hit_radius) {
            self.begin_connection_drag(socket, screen_x, screen_y)?;
            return Ok(PointerTarget::Socket(socket));
        }

        if let Some(id) = find_node_at(x, y, self.geometry.node_rects.values().copied()) {
            self.click_node(id)?;
            self.begin_node_drag(id, screen_x, screen_y)?;
            return Ok(PointerTarget::Node(id));
        }

        let segments = self.connections.values().map(|c| SimpleConnectionGeometry {
            id: c.id(),
            start: c.start(),
            end: c.end(),
        });
        let hit = find_connection_at(x, y, segments, self.config.connection_hover_distance, self.curve_params());
        if let Some(id) = hit {
            self.click_connection(id)?;
            return Ok(PointerTarget::Connection(id));
        }

        self.click_canvas();
        self.begin_camera_pan(screen_x, screen_y);
        Ok(PointerTarget::Canvas)
    }

    /// Start dragging a new connection out of `socket`.
    ///
    /// The preview is anchored at the socket center and both of its ends
    /// start there. Any running gesture is cancelled first.
    pub fn begin_connection_drag(&mut self, socket: SocketRef, screen_x: f32, screen_y: f32) -> Result<(), EditorError> {
        let value_type = self.socket(socket).ok_or(EditorError::UnknownSocket(socket))?.value_type().to_owned();
        self.pointer_cancel();

        let camera = self.camera();
        let anchor = self
            .geometry
            .socket_center(socket)
            .unwrap_or_else(|| camera.screen_to_graph(screen_x, screen_y));
        let (input, output) = match socket.direction() {
            IoDirection::Input => (Some(socket), None),
            IoDirection::Output => (None, Some(socket)),
        };
        let mut preview = Connection::new(ConnectionId::PREVIEW, input, output, true, self.registry.io_color(&value_type))?;
        preview.update_start(anchor.0, anchor.1);
        preview.update_end(anchor.0, anchor.1);

        log::debug!("connection drag from {}", socket);
        self.gesture = Gesture::ConnectionDrag(ConnectionDrag {
            preview,
            origin: socket,
            anchor,
            pointer_start: (screen_x, screen_y),
        });
        Ok(())
    }

    pub fn begin_node_drag(&mut self, id: NodeId, screen_x: f32, screen_y: f32) -> Result<(), EditorError> {
        let start = self.nodes.get(&id).ok_or(EditorError::UnknownNode(id))?.position();
        self.pointer_cancel();
        self.gesture = Gesture::NodeDrag(NodeDrag { node: id, start, pointer_start: (screen_x, screen_y) });
        Ok(())
    }

    pub fn begin_camera_pan(&mut self, screen_x: f32, screen_y: f32) {
        self.pointer_cancel();
        self.gesture = Gesture::CameraPan(CameraPan {
            camera_start: self.camera(),
            pointer_start: (screen_x, screen_y),
        });
    }

    /// Track the pointer for the running gesture.
    ///
    /// Never touches the model during a connection drag.
    pub fn pointer_move(&mut self, screen_x: f32, screen_y: f32) {
        if self.config.auto_hover {
            self.hover_at(screen_x, screen_y);
        }
        let camera = self.camera();
        let pointer = (screen_x, screen_y);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::ConnectionDrag(drag) => drag.track(pointer, &camera),
            Gesture::NodeDrag(drag) => {
                let node = drag.node;
                let (x, y) = drag.position(pointer, &camera);
                if let Err(err) = self.set_node_position(node, x, y) {
                    log::warn!("dropping node drag: {}", err);
                    self.gesture = Gesture::Idle;
                }
            }
            Gesture::CameraPan(pan) => {
                let moved = pan.camera(pointer);
                self.model.set_editor_data(moved.into());
            }
        }
    }

    /// Finish the running gesture.
    ///
    /// For a connection drag the preview is always dropped; a connection is
    /// committed when the hovered socket is compatible with the origin, or when
    /// a flow output is released over a node with a flow input. Returns the
    /// new connection, if any.
    pub fn pointer_up(&mut self, screen_x: f32, screen_y: f32) -> Result<Option<ConnectionId>, EditorError> {
        match self.gesture.take() {
            Gesture::Idle => Ok(None),
            Gesture::ConnectionDrag(drag) => {
                let origin = drag.origin;
                drop(drag);
                self.finish_connection_drag(origin)
            }
            Gesture::NodeDrag(drag) => {
                let camera = self.camera();
                let (x, y) = drag.position((screen_x, screen_y), &camera);
                self.move_node(drag.node, x, y)?;
                Ok(None)
            }
            Gesture::CameraPan(pan) => {
                self.model.set_editor_data(pan.camera((screen_x, screen_y)).into());
                Ok(None)
            }
        }
    }

    fn finish_connection_drag(&mut self, origin: SocketRef) -> Result<Option<ConnectionId>, EditorError> {
        if let Some(target) = self.active_io {
            if target.is_compatible(&origin) && self.socket(target).is_some() {
                let (input, output) = match origin.direction() {
                    IoDirection::Input => (origin, target),
                    IoDirection::Output => (target, origin),
                };
                return self.commit_connection(input, output, None).map(Some);
            }
            log::debug!("dropped {} on incompatible {}", origin, target);
            return Ok(None);
        }

        // flow outputs may be dropped anywhere on a node with a flow input
        if origin.direction() == IoDirection::Output {
            let is_flow = self.socket(origin).is_some_and(|s| self.registry.is_flow_io(s.value_type()));
            let target = self
                .hovered_node
                .filter(|id| self.nodes.get(id).is_some_and(|n| n.flow_input().is_some()));
            if let (true, Some(node)) = (is_flow, target) {
                return self.commit_connection(SocketRef::flow_input(node), origin, None).map(Some);
            }
        }
        Ok(None)
    }

    /// Abort the running gesture without committing anything.
    ///
    /// A node drag puts the node back where it started, a pan restores the
    /// camera. Returns `false` when no gesture was running.
    pub fn pointer_cancel(&mut self) -> bool {
        match self.gesture.take() {
            Gesture::Idle => false,
            Gesture::ConnectionDrag(_) => true,
            Gesture::NodeDrag(drag) => {
                if let Err(err) = self.set_node_position(drag.node, drag.start.0, drag.start.1) {
                    log::warn!("cannot restore dragged node: {}", err);
                }
                true
            }
            Gesture::CameraPan(pan) => {
                self.model.set_editor_data(pan.camera_start.into());
                true
            }
        }
    }

    // === Camera ===

    pub fn update_camera(&mut self, x: f32, y: f32, zoom: f32) {
        self.model.set_editor_data(Camera::new(x, y, zoom).into());
    }

    /// Center the canvas in a viewport of the given size at zoom 1.
    pub fn center_camera(&mut self, viewport_width: f32, viewport_height: f32) {
        let camera = Camera::centered(viewport_width, viewport_height, &self.config);
        self.model.set_editor_data(camera.into());
    }

    /// Zoom one step per wheel event. Returns whether the zoom changed.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        let camera = self.camera();
        match camera.wheel_zoom(delta_y, &self.config) {
            Some(zoom) => {
                self.update_camera(camera.x, camera.y, zoom);
                true
            }
            None => false,
        }
    }
}
