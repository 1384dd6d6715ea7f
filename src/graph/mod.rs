//! The node/link arena every other component reads and the simulation mutates.

mod encoding;
mod normalize;

use std::collections::HashMap;

use eframe::egui::{Color32, Vec2};
use serde_json::{Map, Value};

pub use encoding::{DefaultEncoder, EncodingError, VisualEncoder};
pub use normalize::{Diagnostic, NormalizeError, Normalized, normalize};

/// Stable position of a node inside a [`Graph`]. Valid until the graph is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Clone, Debug)]
pub struct Node {
    id: String,
    pub group: String,
    pub name: Option<String>,
    pub value: Option<f64>,
    pub transaction_count: Option<u64>,
    pub party: Option<String>,
    pub attributes: Map<String, Value>,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position. While set, forces never move the node.
    pub pinned: Option<Vec2>,
    pub radius: f32,
    pub color: Color32,
    pub is_aggregate: bool,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Link {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub kind: Option<String>,
    pub weight: Option<f64>,
    pub color: Color32,
}

impl Link {
    pub fn stroke_width(&self) -> f32 {
        match self.weight {
            Some(weight) if weight > 0.0 => (1.0 + (weight as f32).sqrt() * 0.5).clamp(1.0, 6.0),
            _ => 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    index_by_id: HashMap<String, NodeIndex>,
    degree: Vec<usize>,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), NodeIndex(index)))
            .collect();
        let mut degree = vec![0; nodes.len()];
        for link in &links {
            degree[link.source.0] += 1;
            degree[link.target.0] += 1;
        }

        Self {
            nodes,
            links,
            index_by_id,
            degree,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.0)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    pub fn degree(&self, index: NodeIndex) -> usize {
        self.degree.get(index.0).copied().unwrap_or(0)
    }

    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.links.iter().filter_map(move |link| {
            if link.source == index {
                Some(link.target)
            } else if link.target == index {
                Some(link.source)
            } else {
                None
            }
        })
    }

    /// Distinct groups in first-seen order, with the color of their first node.
    pub fn groups(&self) -> Vec<(String, Color32)> {
        let mut groups: Vec<(String, Color32)> = Vec::new();
        for node in &self.nodes {
            if !groups.iter().any(|(group, _)| group == &node.group) {
                groups.push((node.group.clone(), node.color));
            }
        }
        groups
    }
}
