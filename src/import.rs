//! Loading and saving whole graphs.
//!
//! Import replaces the visual graph in two passes: first every node, then
//! every connection stored in the model (input target references and flow
//! output values). Both passes run under an [`ImportSession`] handed to the
//! commit path, which skips hooks, model writes and events: the loaded model
//! is taken as already consistent. Node-type `created` hooks do not run for
//! imported nodes either; whether they should is still open.

use crate::controller::GraphController;
use crate::error::EditorError;
use crate::gesture::Gesture;
use crate::model::{GraphModel, NodeId};
use crate::selection::ActiveSelection;
use crate::socket::SocketRef;

/// Marker for an import in progress.
///
/// Only this module creates sessions; holding one is what lets the commit path
/// skip side effects.
#[derive(Debug)]
pub struct ImportSession {
    nodes: usize,
    connections: usize,
    skipped: usize,
}

impl ImportSession {
    fn new() -> Self {
        Self { nodes: 0, connections: 0, skipped: 0 }
    }

    pub(crate) fn record_connection(&mut self) {
        self.connections += 1;
    }

    fn finish(self) -> ImportSummary {
        ImportSummary {
            nodes: self.nodes,
            connections: self.connections,
            skipped: self.skipped,
        }
    }
}

/// Counts reported by a finished import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub nodes: usize,
    pub connections: usize,
    /// References that could not be resolved and were left out.
    pub skipped: usize,
}

impl<M: GraphModel> GraphController<M> {
    /// Parse `json` into the model and rebuild the editor from it.
    ///
    /// On a parse error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary, EditorError> {
        self.model.import_json(json)?;
        self.rebuild()
    }

    /// Replace the model and rebuild the editor from it.
    pub fn import_graph(&mut self, model: M) -> Result<ImportSummary, EditorError> {
        self.model = model;
        self.rebuild()
    }

    /// Serialize the model, camera included.
    pub fn export_json(&self) -> Result<String, EditorError> {
        self.model.export_json()
    }

    fn rebuild(&mut self) -> Result<ImportSummary, EditorError> {
        self.gesture = Gesture::Idle;
        self.selection = ActiveSelection::None;
        self.active_io = None;
        self.hovered_node = None;
        self.nodes.clear();
        self.connections.clear();
        self.geometry.clear();
        self.next_connection_id = 0;

        let mut session = ImportSession::new();

        for id in self.model.node_ids() {
            if self.spawn_node(id) {
                session.nodes += 1;
            }
        }

        let (links, skipped) = self.stored_links();
        session.skipped = skipped;
        for (input, output) in links {
            self.commit_connection(input, output, Some(&mut session))?;
        }

        let summary = session.finish();
        log::info!(
            "imported {} nodes and {} connections ({} skipped)",
            summary.nodes,
            summary.connections,
            summary.skipped
        );
        Ok(summary)
    }

    /// Resolve the connections stored in the model as `(input, output)` pairs.
    ///
    /// Returns the pairs and the number of references that did not resolve.
    fn stored_links(&self) -> (Vec<(SocketRef, SocketRef)>, usize) {
        let mut links = Vec::new();
        let mut skipped = 0;

        for id in self.model.node_ids() {
            let Some(data) = self.model.node(id) else {
                continue;
            };

            for (index, input) in data.inputs.iter().enumerate() {
                let Some(target) = &input.target else {
                    continue;
                };
                let output = self
                    .model
                    .node(target.node)
                    .filter(|_| self.nodes.contains_key(&target.node))
                    .and_then(|source| source.output_index(&target.output));
                match output {
                    Some(output) => links.push((SocketRef::input(id, index), SocketRef::output(target.node, output))),
                    None => {
                        log::warn!(
                            "skipping input `{}` of node {}: no output `{}` on node {}",
                            input.name,
                            id,
                            target.output,
                            target.node
                        );
                        skipped += 1;
                    }
                }
            }

            for (index, output) in data.outputs.iter().enumerate() {
                if !self.registry.is_flow_io(&output.value_type) {
                    continue;
                }
                let Some(target) = output.flow_target() else {
                    continue;
                };
                if self.has_flow_input(target) {
                    links.push((SocketRef::flow_input(target), SocketRef::output(id, index)));
                } else {
                    log::warn!(
                        "skipping flow output `{}` of node {}: node {} has no flow input",
                        output.name,
                        id,
                        target
                    );
                    skipped += 1;
                }
            }
        }

        (links, skipped)
    }

    fn has_flow_input(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.flow_input().is_some())
    }
}
