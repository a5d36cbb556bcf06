//! Logical graph model.
//!
//! The editor keeps its visual state (sockets, connections, selection) apart
//! from the logical graph it edits. [`GraphModel`] is the seam between the
//! two: the controller only needs node CRUD, camera storage and JSON
//! import/export. [`FlowGraph`] is the in-crate implementation backed by
//! `serde`.

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value stored in a flow output that is not connected.
pub const UNCONNECTED: i64 = -1;

/// Identifier of a logical node, assigned by the graph model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoDirection {
    Input,
    Output,
}

/// Reference stored on a logical input: which output feeds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub node: NodeId,
    pub output: String,
}

impl TargetRef {
    pub fn new(node: NodeId, output: impl Into<String>) -> Self {
        Self { node, output: output.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputData {
    pub name: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputData {
    pub name: String,
    pub value_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl OutputData {
    /// Node id stored in a flow output, if it holds a non-negative integer.
    pub fn flow_target(&self) -> Option<NodeId> {
        self.value
            .as_i64()
            .filter(|v| *v >= 0)
            .and_then(|v| i32::try_from(v).ok())
            .map(NodeId)
    }

    /// Store a flow target, or the unconnected sentinel for `None`.
    pub fn set_flow_target(&mut self, target: Option<NodeId>) {
        self.value = match target {
            Some(id) => serde_json::Value::from(id.0),
            None => serde_json::Value::from(UNCONNECTED),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub inputs: Vec<InputData>,
    #[serde(default)]
    pub outputs: Vec<OutputData>,
}

impl NodeData {
    pub fn new(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::default(),
            name: name.into(),
            node_type: node_type.into(),
            x: 0.0,
            y: 0.0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.inputs.push(InputData {
            name: name.into(),
            value_type: value_type.into(),
            target: None,
        });
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.outputs.push(OutputData {
            name: name.into(),
            value_type: value_type.into(),
            value: serde_json::Value::Null,
        });
        self
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|o| o.name == name)
    }
}

/// Camera state persisted alongside the graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorData {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for EditorData {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

/// Storage the editor mutates when connections and nodes change.
pub trait GraphModel {
    /// Insert a node, assigning it a fresh id.
    fn add_node(&mut self, data: NodeData) -> NodeId;
    fn remove_node(&mut self, id: NodeId) -> Option<NodeData>;
    fn node(&self, id: NodeId) -> Option<&NodeData>;
    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData>;
    /// All node ids in ascending order.
    fn node_ids(&self) -> Vec<NodeId>;
    fn editor_data(&self) -> EditorData;
    fn set_editor_data(&mut self, data: EditorData);
    /// Replace the whole graph with the serialized one.
    fn import_json(&mut self, json: &str) -> Result<(), EditorError>;
    fn export_json(&self) -> Result<String, EditorError>;
}

/// Wire shape of a serialized graph.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SerializedGraph {
    #[serde(default)]
    editor: EditorData,
    #[serde(default)]
    nodes: Vec<NodeData>,
}

/// Default [`GraphModel`] keeping nodes in id order.
#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
    nodes: BTreeMap<NodeId, NodeData>,
    next_id: i32,
    editor: EditorData,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let mut graph = Self::new();
        graph.import_json(json)?;
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.values()
    }
}

impl GraphModel for FlowGraph {
    fn add_node(&mut self, mut data: NodeData) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        data.id = id;
        self.nodes.insert(id, data);
        id
    }

    fn remove_node(&mut self, id: NodeId) -> Option<NodeData> {
        self.nodes.remove(&id)
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(&id)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn editor_data(&self) -> EditorData {
        self.editor
    }

    fn set_editor_data(&mut self, data: EditorData) {
        self.editor = data;
    }

    fn import_json(&mut self, json: &str) -> Result<(), EditorError> {
        let graph: SerializedGraph = serde_json::from_str(json)?;
        self.nodes.clear();
        for node in graph.nodes {
            if self.nodes.insert(node.id, node).is_some() {
                log::warn!("duplicate node id in serialized graph, keeping the last one");
            }
        }
        self.next_id = self.nodes.keys().next_back().map_or(0, |id| id.0 + 1);
        self.editor = graph.editor;
        Ok(())
    }

    fn export_json(&self) -> Result<String, EditorError> {
        let graph = SerializedGraph {
            editor: self.editor,
            nodes: self.nodes.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&graph)?)
    }
}
