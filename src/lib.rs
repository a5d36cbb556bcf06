//! # Flow Graph Editor
//!
//! The interactive editing engine behind a node-graph flow editor: typed
//! sockets, drag-to-connect, control-flow edges, selection with cascade
//! delete, and whole-graph import. Rendering is left to the application; the
//! engine produces SVG path strings and render flags and consumes pointer,
//! keyboard and geometry reports.
//!
//! ## Features
//!
//! - **Graph model seam** - The editor mutates any [`GraphModel`]; [`FlowGraph`] is the JSON-backed default
//! - **Node type registry** - Per-type flow inputs, IO colors and lifecycle hooks
//! - **Connection protocol** - Transient previews that are never persisted, committed on compatible drops
//! - **Flow edges** - A flow output mirrors its single target node id in the model
//! - **Cascade delete** - Deleting a node removes every attached connection first
//! - **Two-pass import** - Nodes, then connections, with hooks and events suppressed
//!
//! ## Quick Start
//!
//! ```ignore
//! use flow_graph_editor::{GraphController, NodeData, NodeTypeRegistry, SocketRef};
//!
//! let mut ctrl = GraphController::new(NodeTypeRegistry::new());
//! let a = ctrl.add_node(0.0, 0.0, NodeData::new("const", "A").with_output("x", "number"));
//! let b = ctrl.add_node(300.0, 0.0, NodeData::new("print", "B").with_input("y", "number"));
//! ctrl.add_connection(SocketRef::input(b, 0), SocketRef::output(a, 0))?;
//! ```
//!
//! ## Modules
//!
//! - [`controller`] - [`GraphController`], the editing engine
//! - [`handle`] - [`EditorHandle`], shared controller with Slint callback factories
//! - [`import`] - JSON import and export
//! - [`sync`] - Pushing connection paths into a Slint `VecModel`
//! - [`hit_test`] - Socket, node and connection hit-testing
//! - [`path`] - SVG path generation for connections

pub mod camera;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod handle;
pub mod import;
pub mod model;
pub mod node;
pub mod path;
pub mod registry;
pub mod selection;
pub mod socket;
pub mod sync;

pub use camera::Camera;
pub use config::EditorConfig;
pub use connection::{Connection, ConnectionId, ConnectionInfo};
pub use controller::{EditorKey, GraphController, PointerTarget};
pub use error::EditorError;
pub use events::{EventBus, GraphEvent, GraphEventKind, ListenerId};
pub use geometry::{GeometryCache, NodeRect};
pub use gesture::Gesture;
pub use handle::EditorHandle;
pub use hit_test::{find_connection_at, find_node_at, find_socket_at, SocketPoint};
pub use import::{ImportSession, ImportSummary};
pub use model::{EditorData, FlowGraph, GraphModel, InputData, IoDirection, NodeData, NodeId, OutputData, TargetRef};
pub use node::Node;
pub use path::{bezier_path, connection_path, straight_path};
pub use registry::{
    ConnectionHookContext, NodeHookContext, NodeHooks, NodeIoTypeData, NodeTypeData, NodeTypeRegistry,
};
pub use selection::ActiveSelection;
pub use socket::{Port, Socket, SocketKind, SocketRef, FLOW_INPUT_SOCKET, INPUT_SOCKET, OUTPUT_SOCKET};
pub use sync::{ConnectionPath, PathSink, PathSync};
