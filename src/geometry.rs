//! Graph-space geometry of nodes and sockets.
//!
//! The renderer owns real layout; it reports node rectangles and socket
//! offsets here and the editor reads socket centers back when it needs a
//! drag anchor or a connection endpoint. Until a renderer reports anything,
//! [`GeometryCache::layout_node`] places sockets in declaration order so the
//! editor is usable headless.

use crate::config::EditorConfig;
use crate::hit_test::{NodeGeometry, SocketPoint};
use crate::model::NodeId;
use crate::node::Node;
use crate::socket::{SocketKind, SocketRef};
use std::collections::HashMap;

/// Node rectangle in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRect {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeGeometry for NodeRect {
    fn id(&self) -> NodeId {
        self.id
    }

    fn rect(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Node rectangles and socket offsets, both in graph space.
///
/// Socket offsets are relative to the owning node's top-left corner, so moving
/// a node only touches its rectangle.
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    pub node_rects: HashMap<NodeId, NodeRect>,
    pub socket_offsets: HashMap<SocketRef, (f32, f32)>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a node and its sockets using the configured default metrics.
    ///
    /// Inputs sit on the left edge and outputs on the right edge, one row per
    /// port below the header; the flow-input socket is centered in the header.
    pub fn layout_node(&mut self, node: &Node, config: &EditorConfig) {
        let (x, y) = node.position();
        let rows = node.inputs().len().max(node.outputs().len()) as f32;
        let height = config.header_height + rows.max(1.0) * config.row_height;
        self.handle_node_rect_report(node.id(), x, y, config.node_width, height);

        for socket in node.socket_refs() {
            let offset = match socket.kind {
                SocketKind::FlowInput => (0.0, config.header_height / 2.0),
                SocketKind::Input(i) => (0.0, config.header_height + (i as f32 + 0.5) * config.row_height),
                SocketKind::Output(i) => (
                    config.node_width,
                    config.header_height + (i as f32 + 0.5) * config.row_height,
                ),
            };
            self.socket_offsets.insert(socket, offset);
        }
    }

    /// Standard handler for node rect reports from the renderer
    pub fn handle_node_rect_report(&mut self, id: NodeId, x: f32, y: f32, width: f32, height: f32) {
        self.node_rects.insert(id, NodeRect { id, x, y, width, height });
    }

    /// Standard handler for socket position reports from the renderer
    pub fn handle_socket_report(&mut self, socket: SocketRef, rel_x: f32, rel_y: f32) {
        self.socket_offsets.insert(socket, (rel_x, rel_y));
    }

    /// Move a node's rectangle, keeping its size.
    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) {
        if let Some(rect) = self.node_rects.get_mut(&id) {
            rect.x = x;
            rect.y = y;
        }
    }

    /// Forget a node and all of its sockets.
    pub fn remove_node(&mut self, id: NodeId) {
        self.node_rects.remove(&id);
        self.socket_offsets.retain(|socket, _| socket.node != id);
    }

    pub fn clear(&mut self) {
        self.node_rects.clear();
        self.socket_offsets.clear();
    }

    pub fn node_rect(&self, id: NodeId) -> Option<&NodeRect> {
        self.node_rects.get(&id)
    }

    /// Graph-space center of a socket.
    pub fn socket_center(&self, socket: SocketRef) -> Option<(f32, f32)> {
        let (rel_x, rel_y) = self.socket_offsets.get(&socket)?;
        let rect = self.node_rects.get(&socket.node)?;
        Some((rect.x + rel_x, rect.y + rel_y))
    }

    /// Iterator over absolute socket positions for hit testing
    pub fn absolute_sockets(&self) -> impl Iterator<Item = SocketPoint> + '_ {
        self.socket_offsets.keys().filter_map(move |&socket| {
            let (x, y) = self.socket_center(socket)?;
            Some(SocketPoint { socket, x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeData;
    use crate::registry::{NodeTypeData, NodeTypeRegistry};

    fn node() -> Node {
        let mut registry = NodeTypeRegistry::new();
        registry.register_node([NodeTypeData::new("print").with_flow_input()]);
        let mut data = NodeData::new("print", "P")
            .with_input("a", "number")
            .with_input("b", "number")
            .with_output("out", "number");
        data.id = NodeId(1);
        data.x = 100.0;
        data.y = 50.0;
        Node::new(&data, &registry)
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = GeometryCache::new();
        assert!(cache.node_rects.is_empty());
        assert!(cache.socket_offsets.is_empty());
    }

    #[test]
    fn test_layout_node_places_sockets_by_declaration_order() {
        let mut cache = GeometryCache::new();
        let config = EditorConfig::default();
        cache.layout_node(&node(), &config);

        let rect = cache.node_rect(NodeId(1)).unwrap();
        assert_eq!((rect.x, rect.y, rect.width), (100.0, 50.0, 150.0));
        assert_eq!(rect.height, 40.0 + 2.0 * 24.0);

        assert_eq!(cache.socket_center(SocketRef::flow_input(NodeId(1))), Some((100.0, 70.0)));
        assert_eq!(cache.socket_center(SocketRef::input(NodeId(1), 0)), Some((100.0, 102.0)));
        assert_eq!(cache.socket_center(SocketRef::input(NodeId(1), 1)), Some((100.0, 126.0)));
        assert_eq!(cache.socket_center(SocketRef::output(NodeId(1), 0)), Some((250.0, 102.0)));
    }

    #[test]
    fn test_socket_center_follows_node_move() {
        let mut cache = GeometryCache::new();
        cache.layout_node(&node(), &EditorConfig::default());
        cache.move_node(NodeId(1), 0.0, 0.0);
        assert_eq!(cache.socket_center(SocketRef::output(NodeId(1), 0)), Some((150.0, 52.0)));
    }

    #[test]
    fn test_socket_report_overrides_layout() {
        let mut cache = GeometryCache::new();
        cache.layout_node(&node(), &EditorConfig::default());
        cache.handle_socket_report(SocketRef::output(NodeId(1), 0), 160.0, 30.0);
        assert_eq!(cache.socket_center(SocketRef::output(NodeId(1), 0)), Some((260.0, 80.0)));
    }

    #[test]
    fn test_socket_center_missing_node() {
        let mut cache = GeometryCache::new();
        cache.handle_socket_report(SocketRef::input(NodeId(9), 0), 0.0, 10.0);
        assert_eq!(cache.socket_center(SocketRef::input(NodeId(9), 0)), None);
    }

    #[test]
    fn test_remove_node_drops_sockets() {
        let mut cache = GeometryCache::new();
        cache.layout_node(&node(), &EditorConfig::default());
        cache.remove_node(NodeId(1));
        assert!(cache.node_rects.is_empty());
        assert!(cache.socket_offsets.is_empty());
        assert_eq!(cache.absolute_sockets().count(), 0);
    }
}
