//! Connections between sockets.
//!
//! A [`Connection`] is either a *transient* preview that follows the pointer
//! during a drag, or a *persisted* edge between an output and an input.
//! Transient connections never enter a socket's connection list and are never
//! written to the graph model.

use crate::error::EditorError;
use crate::model::NodeId;
use crate::path::connection_path;
use crate::socket::SocketRef;
use slint::{Color, SharedString};
use std::fmt;

/// Identifier of a connection, assigned by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    /// Id carried by the drag preview; never assigned to a persisted connection.
    pub const PREVIEW: ConnectionId = ConnectionId(u32::MAX);

    /// Largest id handed to a persisted connection; fits an `i32`.
    pub const MAX: ConnectionId = ConnectionId(i32::MAX as u32);

    /// The id as rendered: `-1` for the preview and anything above [`MAX`](Self::MAX).
    pub fn to_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(-1)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Color used for a connection whose value type has no registered color.
pub fn default_color() -> Color {
    Color::from_rgb_u8(255, 255, 255)
}

/// Snapshot of a connection carried by events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub input: Option<SocketRef>,
    pub output: Option<SocketRef>,
    pub flow: bool,
}

#[derive(Clone, Debug)]
pub struct Connection {
    id: ConnectionId,
    input: Option<SocketRef>,
    output: Option<SocketRef>,
    transient: bool,
    flow: bool,
    color: Color,
    active: bool,
    start: (f32, f32),
    end: (f32, f32),
    path: SharedString,
    min_offset: f32,
    curve_factor: f32,
}

impl Connection {
    /// Create a connection with at least one endpoint.
    ///
    /// The output side is the path start, the input side is the path end.
    pub fn new(
        id: ConnectionId,
        input: Option<SocketRef>,
        output: Option<SocketRef>,
        transient: bool,
        color: Color,
    ) -> Result<Self, EditorError> {
        if input.is_none() && output.is_none() {
            return Err(EditorError::MissingEndpoints);
        }
        Ok(Self {
            id,
            input,
            output,
            transient,
            flow: false,
            color,
            active: false,
            start: (0.0, 0.0),
            end: (0.0, 0.0),
            path: SharedString::default(),
            min_offset: 100.0,
            curve_factor: 0.5,
        })
    }

    /// Override the curve shape of persisted paths (defaults 100.0 / 0.5).
    pub fn with_curve(mut self, min_offset: f32, curve_factor: f32) -> Self {
        self.min_offset = min_offset;
        self.curve_factor = curve_factor;
        self
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn input(&self) -> Option<SocketRef> {
        self.input
    }

    pub fn output(&self) -> Option<SocketRef> {
        self.output
    }

    /// Both endpoints that are present.
    pub fn endpoints(&self) -> impl Iterator<Item = SocketRef> {
        self.input.into_iter().chain(self.output)
    }

    pub fn touches_node(&self, node: NodeId) -> bool {
        self.endpoints().any(|s| s.node == node)
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }

    pub fn is_flow(&self) -> bool {
        self.flow
    }

    pub(crate) fn set_flow(&mut self, flow: bool) {
        self.flow = flow;
    }

    /// Color derived from the governing value type.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Stroke color to render with: white while highlighted.
    pub fn display_color(&self) -> Color {
        if self.active {
            default_color()
        } else {
            self.color
        }
    }

    /// Previews and highlighted connections render dashed.
    pub fn is_dashed(&self) -> bool {
        self.transient || self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn start(&self) -> (f32, f32) {
        self.start
    }

    pub fn end(&self) -> (f32, f32) {
        self.end
    }

    /// Current SVG path commands in graph space.
    pub fn path(&self) -> &SharedString {
        &self.path
    }

    pub fn update_start(&mut self, x: f32, y: f32) {
        self.start = (x, y);
        self.update_path();
    }

    pub fn update_end(&mut self, x: f32, y: f32) {
        self.end = (x, y);
        self.update_path();
    }

    fn update_path(&mut self) {
        self.path = connection_path(self.start, self.end, self.transient, self.min_offset, self.curve_factor).into();
    }

    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            input: self.input,
            output: self.output,
            flow: self.flow,
        }
    }
}
