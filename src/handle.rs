//! Shared controller handle with ready-to-use Slint callbacks.
//!
//! Slint callbacks are `Fn` closures that outlive the setup code, so the
//! controller has to be shared. [`EditorHandle`] wraps it in
//! `Rc<RefCell<_>>` and hands out closures matching the callback signatures a
//! node-editor window typically declares. After every callback that can
//! change paths, the bound [`PathSink`] is refreshed.
//!
//! # Example
//!
//! ```ignore
//! use flow_graph_editor::{EditorHandle, NodeTypeRegistry, PathSync};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let editor = EditorHandle::new(NodeTypeRegistry::new());
//!
//!     let rows = Rc::new(VecModel::<ConnectionRow>::default());
//!     editor.bind_paths(PathSync::new(rows.clone(), |id, path, color, dashed| ConnectionRow {
//!         id, path, color: color.into(), dashed,
//!     }));
//!     window.set_connections(ModelRc::from(rows));
//!
//!     window.on_pointer_down(editor.pointer_down_callback());
//!     window.on_pointer_move(editor.pointer_move_callback());
//!     window.on_pointer_up(editor.pointer_up_callback());
//!     window.on_key_pressed(editor.key_pressed_callback());
//!     window.on_wheel(editor.wheel_callback());
//!     window.on_node_rect_changed(editor.node_rect_callback());
//!     window.on_socket_position_changed(editor.socket_position_callback());
//!     window.on_socket_pointer_enter(editor.socket_enter_callback());
//!     window.on_socket_pointer_leave(editor.socket_leave_callback());
//!     window.on_node_pointer_enter(editor.node_enter_callback());
//!     window.on_node_pointer_leave(editor.node_leave_callback());
//!
//!     window.run().unwrap();
//! }
//! ```
//!
//! Event listeners and registry hooks run while the controller is borrowed;
//! they must not call back into the handle.

use crate::config::EditorConfig;
use crate::controller::{EditorKey, GraphController};
use crate::model::{FlowGraph, GraphModel, NodeId};
use crate::registry::NodeTypeRegistry;
use crate::socket::SocketRef;
use crate::sync::{ConnectionPath, PathSink};
use slint::SharedString;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Clone this handle to share the controller across callbacks.
pub struct EditorHandle<M: GraphModel = FlowGraph> {
    controller: Rc<RefCell<GraphController<M>>>,
    paths: Rc<RefCell<Option<Box<dyn PathSink>>>>,
}

impl<M: GraphModel> Clone for EditorHandle<M> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            paths: self.paths.clone(),
        }
    }
}

impl EditorHandle<FlowGraph> {
    pub fn new(registry: NodeTypeRegistry) -> Self {
        Self::from_controller(GraphController::new(registry))
    }

    pub fn with_config(registry: NodeTypeRegistry, config: EditorConfig) -> Self {
        Self::from_controller(GraphController::with_config(registry, config))
    }
}

impl<M: GraphModel + 'static> EditorHandle<M> {
    pub fn from_controller(controller: GraphController<M>) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            paths: Rc::new(RefCell::new(None)),
        }
    }

    /// Get a clone of the shared controller.
    pub fn controller(&self) -> Rc<RefCell<GraphController<M>>> {
        self.controller.clone()
    }

    pub fn borrow(&self) -> Ref<'_, GraphController<M>> {
        self.controller.borrow()
    }

    /// Mutable access for direct calls. Call [`refresh`](Self::refresh)
    /// afterwards if paths may have changed.
    pub fn borrow_mut(&self) -> RefMut<'_, GraphController<M>> {
        self.controller.borrow_mut()
    }

    /// Bind a sink that receives connection paths after every change.
    pub fn bind_paths(&self, sink: impl PathSink + 'static) {
        *self.paths.borrow_mut() = Some(Box::new(sink));
        self.refresh();
    }

    pub fn connection_paths(&self) -> Vec<ConnectionPath> {
        self.controller.borrow().connection_paths()
    }

    /// Push the current paths to the bound sink.
    pub fn refresh(&self) {
        refresh(&self.controller, &self.paths);
    }

    // === Callback factories ===

    /// Callback for `pointer-down(x, y)` in screen coordinates.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |x, y| {
            if let Err(err) = controller.borrow_mut().pointer_down_at(x, y) {
                log::warn!("pointer down failed: {}", err);
            }
            refresh(&controller, &paths);
        }
    }

    /// Callback for `pointer-move(x, y)` in screen coordinates.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |x, y| {
            let busy = {
                let mut ctrl = controller.borrow_mut();
                ctrl.pointer_move(x, y);
                !ctrl.gesture().is_idle()
            };
            if busy {
                refresh(&controller, &paths);
            }
        }
    }

    /// Callback for `pointer-up(x, y)` in screen coordinates.
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32) + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |x, y| {
            if let Err(err) = controller.borrow_mut().pointer_up(x, y) {
                log::warn!("pointer up failed: {}", err);
            }
            refresh(&controller, &paths);
        }
    }

    /// Callback for `key-pressed(text) -> bool`.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |text| {
            let key = EditorKey::from_text(text.as_str());
            let handled = match controller.borrow_mut().key_pressed(key) {
                Ok(handled) => handled,
                Err(err) => {
                    log::warn!("key {:?} failed: {}", key, err);
                    false
                }
            };
            if handled {
                refresh(&controller, &paths);
            }
            handled
        }
    }

    /// Callback for `wheel(delta-y) -> bool`; returns whether the zoom changed.
    pub fn wheel_callback(&self) -> impl Fn(f32) -> bool + Clone {
        let controller = self.controller.clone();
        move |delta_y| controller.borrow_mut().wheel(delta_y)
    }

    /// Callback for `node-rect-changed(id, x, y, width, height)` in graph space.
    pub fn node_rect_callback(&self) -> impl Fn(i32, f32, f32, f32, f32) + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |id, x, y, width, height| {
            controller.borrow_mut().handle_node_rect(NodeId(id), x, y, width, height);
            refresh(&controller, &paths);
        }
    }

    /// Callback for `socket-position-changed(node, kind, index, rel-x, rel-y)`.
    ///
    /// `kind` is one of the codes in [`crate::socket`]; the position is
    /// relative to the node's top-left corner.
    pub fn socket_position_callback(&self) -> impl Fn(i32, i32, i32, f32, f32) + Clone {
        let controller = self.controller.clone();
        let paths = self.paths.clone();
        move |node, kind, index, rel_x, rel_y| {
            let Some(socket) = SocketRef::from_parts(node, kind, index) else {
                log::warn!("ignoring position of socket ({}, {}, {})", node, kind, index);
                return;
            };
            controller.borrow_mut().handle_socket_position(socket, rel_x, rel_y);
            refresh(&controller, &paths);
        }
    }

    /// Callback for `socket-pointer-enter(node, kind, index)`.
    pub fn socket_enter_callback(&self) -> impl Fn(i32, i32, i32) + Clone {
        let controller = self.controller.clone();
        move |node, kind, index| match SocketRef::from_parts(node, kind, index) {
            Some(socket) => controller.borrow_mut().socket_pointer_enter(socket),
            None => log::warn!("ignoring hover on socket ({}, {}, {})", node, kind, index),
        }
    }

    /// Callback for `socket-pointer-leave(node, kind, index)`.
    pub fn socket_leave_callback(&self) -> impl Fn(i32, i32, i32) + Clone {
        let controller = self.controller.clone();
        move |node, kind, index| {
            if let Some(socket) = SocketRef::from_parts(node, kind, index) {
                controller.borrow_mut().socket_pointer_leave(socket);
            }
        }
    }

    /// Callback for `node-pointer-enter(id)`.
    pub fn node_enter_callback(&self) -> impl Fn(i32) + Clone {
        let controller = self.controller.clone();
        move |id| controller.borrow_mut().node_pointer_enter(NodeId(id))
    }

    /// Callback for `node-pointer-leave(id)`.
    pub fn node_leave_callback(&self) -> impl Fn(i32) + Clone {
        let controller = self.controller.clone();
        move |id| controller.borrow_mut().node_pointer_leave(NodeId(id))
    }
}

fn refresh<M: GraphModel>(controller: &RefCell<GraphController<M>>, paths: &RefCell<Option<Box<dyn PathSink>>>) {
    if let Some(sink) = paths.borrow().as_ref() {
        sink.sync(&controller.borrow().connection_paths());
    }
}
