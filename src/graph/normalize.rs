use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;
use thiserror::Error;

use crate::config::{GroupConfig, LayoutConfig};
use crate::data::RawGraph;

use super::encoding::{DefaultEncoder, EncodingError, LINK_COLOR, NEUTRAL_COLOR, VisualEncoder};
use super::{Graph, Link, Node, NodeIndex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("graph has no nodes")]
    EmptyGraph,
}

/// Non-fatal problems found while normalizing. The offending record is
/// dropped or repaired; the rest of the graph is kept.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Diagnostic {
    #[error("link {from} -> {to} dropped: node {missing} does not exist")]
    DanglingLink {
        from: String,
        to: String,
        missing: String,
    },
    #[error("self link on {id} dropped")]
    SelfLink { id: String },
    #[error("duplicate node {id}: keeping the first record")]
    DuplicateNode { id: String },
    #[error("node {id} has invalid {field}; ignoring it")]
    InvalidValue { id: String, field: &'static str },
    #[error("encoder failed for {target}: {reason}; using default {property}")]
    EncodingFallback {
        target: String,
        property: &'static str,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct Normalized {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds a fresh arena from raw records.
///
/// Nodes start on a jittered circle around `center`; the jitter is the only
/// input drawn from `rng`, so a seeded generator makes the output reproducible.
pub fn normalize<R: Rng + ?Sized>(
    raw: &RawGraph,
    encoder: &dyn VisualEncoder,
    groups: &GroupConfig,
    layout: &LayoutConfig,
    center: Vec2,
    rng: &mut R,
) -> Result<Normalized, NormalizeError> {
    if raw.nodes.is_empty() {
        return Err(NormalizeError::EmptyGraph);
    }

    let mut diagnostics = Vec::new();
    let mut seen: HashMap<&str, NodeIndex> = HashMap::with_capacity(raw.nodes.len());
    let mut nodes = Vec::with_capacity(raw.nodes.len());

    for record in &raw.nodes {
        if seen.contains_key(record.id.as_str()) {
            diagnostics.push(Diagnostic::DuplicateNode {
                id: record.id.clone(),
            });
            continue;
        }
        seen.insert(record.id.as_str(), NodeIndex(nodes.len()));

        let value = match record.value {
            Some(value) if !value.is_finite() => {
                diagnostics.push(Diagnostic::InvalidValue {
                    id: record.id.clone(),
                    field: "value",
                });
                None
            }
            other => other,
        };
        let transaction_count = match record.transaction_count {
            Some(count) if count.is_finite() && count >= 0.0 => Some(count.round() as u64),
            Some(_) => {
                diagnostics.push(Diagnostic::InvalidValue {
                    id: record.id.clone(),
                    field: "transactionCount",
                });
                None
            }
            None => None,
        };

        nodes.push(Node {
            id: record.id.clone(),
            group: record.group.clone(),
            name: record.name.clone(),
            value,
            transaction_count,
            party: record.party.clone(),
            attributes: record.attributes.clone(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pinned: None,
            radius: 0.0,
            color: NEUTRAL_COLOR,
            is_aggregate: groups.is_aggregate(&record.group),
        });
    }

    let count = nodes.len();
    let ring = layout.base_radius + (count as f32).sqrt() * layout.radius_growth;
    for (index, node) in nodes.iter_mut().enumerate() {
        let angle = index as f32 / count as f32 * TAU;
        let jitter = if layout.jitter > 0.0 {
            rng.random_range(-layout.jitter..=layout.jitter)
        } else {
            0.0
        };
        node.position = center + vec2(angle.cos(), angle.sin()) * (ring + jitter);

        node.radius = match encoder.size(node).and_then(|radius| validate_radius(node, radius)) {
            Ok(radius) => radius,
            Err(error) => {
                diagnostics.push(fallback(node.id(), "size", &error));
                DefaultEncoder::radius_for(node)
            }
        };
        node.color = match encoder.color(node) {
            Ok(color) => color,
            Err(error) => {
                diagnostics.push(fallback(node.id(), "color", &error));
                DefaultEncoder::color_for(node)
            }
        };
    }

    let mut links = Vec::with_capacity(raw.links.len());
    for record in &raw.links {
        let source_id = record.source.id();
        let target_id = record.target.id();
        let (source, target) = match (seen.get(source_id), seen.get(target_id)) {
            (Some(&source), Some(&target)) => (source, target),
            (source, _) => {
                let missing = if source.is_none() { source_id } else { target_id };
                diagnostics.push(Diagnostic::DanglingLink {
                    from: source_id.to_owned(),
                    to: target_id.to_owned(),
                    missing: missing.to_owned(),
                });
                continue;
            }
        };

        if source == target {
            diagnostics.push(Diagnostic::SelfLink {
                id: source_id.to_owned(),
            });
            continue;
        }

        let mut link = Link {
            source,
            target,
            kind: record.kind.clone(),
            weight: record.weight(),
            color: LINK_COLOR,
        };
        link.color = match encoder.link_color(&link) {
            Ok(color) => color,
            Err(error) => {
                diagnostics.push(fallback(
                    &format!("{source_id} -> {target_id}"),
                    "link color",
                    &error,
                ));
                LINK_COLOR
            }
        };
        links.push(link);
    }

    for diagnostic in &diagnostics {
        tracing::warn!(%diagnostic, "graph input");
    }
    tracing::debug!(
        nodes = nodes.len(),
        links = links.len(),
        diagnostics = diagnostics.len(),
        "normalized graph"
    );

    Ok(Normalized {
        graph: Graph::from_parts(nodes, links),
        diagnostics,
    })
}

fn validate_radius(node: &Node, radius: f32) -> Result<f32, EncodingError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(EncodingError::InvalidRadius {
            id: node.id().to_owned(),
            radius,
        })
    }
}

fn fallback(target: &str, property: &'static str, error: &EncodingError) -> Diagnostic {
    Diagnostic::EncodingFallback {
        target: target.to_owned(),
        property,
        reason: error.to_string(),
    }
}
