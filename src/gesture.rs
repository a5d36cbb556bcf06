//! Pointer gestures.
//!
//! Only one gesture runs at a time. Each variant owns everything the gesture
//! needs, so ending or cancelling it is just replacing the slot with
//! [`Gesture::Idle`]: a connection preview is dropped with its gesture.

use crate::camera::Camera;
use crate::connection::Connection;
use crate::model::NodeId;
use crate::socket::SocketRef;

/// Dragging a new connection out of a socket.
#[derive(Clone, Debug)]
pub struct ConnectionDrag {
    /// Transient preview; never attached to sockets.
    pub preview: Connection,
    /// Socket the drag started from.
    pub origin: SocketRef,
    /// Graph-space center of `origin` at drag start.
    pub anchor: (f32, f32),
    /// Screen-space pointer at drag start.
    pub pointer_start: (f32, f32),
}

impl ConnectionDrag {
    /// Move the free end of the preview to follow the pointer.
    ///
    /// The origin end stays at the anchor. An input origin drags the start
    /// (output side) of the path, any other origin drags the end.
    pub fn track(&mut self, pointer: (f32, f32), camera: &Camera) {
        let (dx, dy) = camera.scale_delta(pointer.0 - self.pointer_start.0, pointer.1 - self.pointer_start.1);
        let free = (self.anchor.0 + dx, self.anchor.1 + dy);
        if self.preview.input() == Some(self.origin) {
            self.preview.update_start(free.0, free.1);
        } else {
            self.preview.update_end(free.0, free.1);
        }
    }
}

/// Moving a node with the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDrag {
    pub node: NodeId,
    /// Graph-space node position at drag start.
    pub start: (f32, f32),
    pub pointer_start: (f32, f32),
}

impl NodeDrag {
    pub fn position(&self, pointer: (f32, f32), camera: &Camera) -> (f32, f32) {
        let (dx, dy) = camera.scale_delta(pointer.0 - self.pointer_start.0, pointer.1 - self.pointer_start.1);
        (self.start.0 + dx, self.start.1 + dy)
    }
}

/// Panning the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPan {
    pub camera_start: Camera,
    pub pointer_start: (f32, f32),
}

impl CameraPan {
    pub fn camera(&self, pointer: (f32, f32)) -> Camera {
        let (dx, dy) = self.camera_start.scale_delta(pointer.0 - self.pointer_start.0, pointer.1 - self.pointer_start.1);
        Camera {
            x: self.camera_start.x + dx,
            y: self.camera_start.y + dy,
            zoom: self.camera_start.zoom,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum Gesture {
    #[default]
    Idle,
    ConnectionDrag(ConnectionDrag),
    NodeDrag(NodeDrag),
    CameraPan(CameraPan),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn connection_drag(&self) -> Option<&ConnectionDrag> {
        match self {
            Gesture::ConnectionDrag(drag) => Some(drag),
            _ => None,
        }
    }

    /// End the gesture, returning it.
    pub fn take(&mut self) -> Gesture {
        std::mem::take(self)
    }
}
