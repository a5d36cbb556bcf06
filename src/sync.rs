//! Pushing connection paths into a Slint model.
//!
//! The editor keeps paths as strings on each [`Connection`]; a renderer
//! usually wants them as rows of a `VecModel` of its own struct type.
//! [`PathSync`] converts and writes them, updating rows in place so Slint
//! only re-renders what changed.
//!
//! # Example
//!
//! ```ignore
//! let rows = Rc::new(VecModel::<ConnectionRow>::default());
//! let sync = PathSync::new(rows.clone(), |id, path, color, dashed| ConnectionRow {
//!     id,
//!     path,
//!     color: color.into(),
//!     dashed,
//! });
//! window.set_connections(ModelRc::from(rows));
//!
//! sync.sync(&ctrl.connection_paths());
//! ```

use crate::connection::Connection;
use crate::controller::GraphController;
use crate::model::GraphModel;
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

/// Render data of one connection.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionPath {
    /// Connection id; `-1` for the drag preview.
    pub id: i32,
    pub path: SharedString,
    pub color: Color,
    pub dashed: bool,
}

impl ConnectionPath {
    pub fn from_connection(connection: &Connection) -> Self {
        Self {
            id: connection.id().to_i32(),
            path: connection.path().clone(),
            color: connection.display_color(),
            dashed: connection.is_dashed(),
        }
    }
}

/// Anything that can take a fresh list of connection paths.
pub trait PathSink {
    fn sync(&self, paths: &[ConnectionPath]);
}

/// [`PathSink`] writing into a `VecModel` through a row constructor.
pub struct PathSync<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> PathSync<P, F>
where
    P: Clone + 'static,
    F: Fn(i32, SharedString, Color, bool) -> P,
{
    pub fn new(model: Rc<VecModel<P>>, constructor: F) -> Self {
        Self { model, constructor }
    }

    pub fn model(&self) -> Rc<VecModel<P>> {
        self.model.clone()
    }
}

impl<P, F> PathSink for PathSync<P, F>
where
    P: Clone + 'static,
    F: Fn(i32, SharedString, Color, bool) -> P,
{
    fn sync(&self, paths: &[ConnectionPath]) {
        // Update existing rows or add new ones
        for (i, path) in paths.iter().enumerate() {
            let item = (self.constructor)(path.id, path.path.clone(), path.color, path.dashed);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > paths.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

impl<M: GraphModel> GraphController<M> {
    /// Paths to draw: persisted connections in creation order, then the drag
    /// preview if one is active.
    pub fn connection_paths(&self) -> Vec<ConnectionPath> {
        self.connections()
            .chain(self.preview())
            .map(ConnectionPath::from_connection)
            .collect()
    }
}
