use eframe::egui::Color32;
use thiserror::Error;

use super::{Link, Node};

pub const NEUTRAL_COLOR: Color32 = Color32::from_rgb(148, 163, 184);
pub const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(86, 94, 104, 150);

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("node {id} has no usable {attribute}")]
    MissingAttribute { id: String, attribute: &'static str },
    #[error("encoder produced invalid radius {radius} for node {id}")]
    InvalidRadius { id: String, radius: f32 },
    #[error("{0}")]
    Custom(String),
}

/// Maps domain attributes to visual properties.
///
/// Implementations report failures instead of panicking; callers substitute the
/// [`DefaultEncoder`] result for the affected node and keep going.
pub trait VisualEncoder {
    fn size(&self, node: &Node) -> Result<f32, EncodingError>;

    fn color(&self, node: &Node) -> Result<Color32, EncodingError>;

    fn link_color(&self, _link: &Link) -> Result<Color32, EncodingError> {
        Ok(LINK_COLOR)
    }
}

/// Square-root value scaling per group and a party/group color lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEncoder;

impl DefaultEncoder {
    const LEAF_BASE: f32 = 5.0;
    const AGGREGATE_BASE: f32 = 9.0;

    pub fn radius_for(node: &Node) -> f32 {
        let root = node
            .value
            .filter(|value| value.is_finite() && *value > 0.0)
            .map(|value| value.sqrt() as f32)
            .unwrap_or(0.0);

        if node.is_aggregate {
            (Self::AGGREGATE_BASE + root / 60.0).clamp(8.0, 48.0)
        } else {
            (Self::LEAF_BASE + root / 200.0).clamp(4.0, 22.0)
        }
    }

    pub fn color_for(node: &Node) -> Color32 {
        party_color(node.party.as_deref())
            .or_else(|| group_color(&node.group))
            .unwrap_or(NEUTRAL_COLOR)
    }
}

impl VisualEncoder for DefaultEncoder {
    fn size(&self, node: &Node) -> Result<f32, EncodingError> {
        Ok(Self::radius_for(node))
    }

    fn color(&self, node: &Node) -> Result<Color32, EncodingError> {
        Ok(Self::color_for(node))
    }

    fn link_color(&self, link: &Link) -> Result<Color32, EncodingError> {
        let color = match link.kind.as_deref() {
            Some("owns" | "holds" | "traded") => Color32::from_rgba_unmultiplied(52, 211, 153, 140),
            Some("sponsored" | "cosponsored") => Color32::from_rgba_unmultiplied(251, 191, 36, 140),
            Some("member_of") => Color32::from_rgba_unmultiplied(244, 114, 182, 120),
            _ => LINK_COLOR,
        };
        Ok(color)
    }
}

fn party_color(party: Option<&str>) -> Option<Color32> {
    let party = party?.trim();
    let first = party.chars().next()?.to_ascii_uppercase();
    match first {
        'D' => Some(Color32::from_rgb(59, 130, 246)),
        'R' => Some(Color32::from_rgb(239, 68, 68)),
        'I' => Some(Color32::from_rgb(168, 85, 247)),
        _ => None,
    }
}

fn group_color(group: &str) -> Option<Color32> {
    match group {
        "member" => Some(Color32::from_rgb(96, 165, 250)),
        "asset" => Some(Color32::from_rgb(52, 211, 153)),
        "bill" => Some(Color32::from_rgb(251, 191, 36)),
        "aggregate" => Some(Color32::from_rgb(244, 114, 182)),
        "committee" => Some(Color32::from_rgb(45, 212, 191)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::graph::test_support::node;

    #[test]
    fn aggregates_scale_faster_than_leaves() {
        let mut leaf = node("leaf", vec2(0.0, 0.0), 0.0);
        leaf.value = Some(1_000_000.0);
        let mut aggregate = leaf.clone();
        aggregate.is_aggregate = true;

        let leaf_radius = DefaultEncoder::radius_for(&leaf);
        let aggregate_radius = DefaultEncoder::radius_for(&aggregate);
        assert!(aggregate_radius > leaf_radius);
        assert!((leaf_radius - 10.0).abs() < 1e-3);
    }

    #[test]
    fn missing_or_invalid_value_uses_base_radius() {
        let mut leaf = node("leaf", vec2(0.0, 0.0), 0.0);
        assert_eq!(DefaultEncoder::radius_for(&leaf), 5.0);
        leaf.value = Some(f64::NAN);
        assert_eq!(DefaultEncoder::radius_for(&leaf), 5.0);
        leaf.value = Some(-20.0);
        assert_eq!(DefaultEncoder::radius_for(&leaf), 5.0);
    }

    #[test]
    fn party_wins_over_group_and_unknown_is_neutral() {
        let mut member = node("m", vec2(0.0, 0.0), 0.0);
        member.party = Some("Republican".to_owned());
        assert_eq!(DefaultEncoder::color_for(&member), Color32::from_rgb(239, 68, 68));

        let mut unknown = node("u", vec2(0.0, 0.0), 0.0);
        unknown.group = "mystery".to_owned();
        assert_eq!(DefaultEncoder::color_for(&unknown), NEUTRAL_COLOR);
    }
}
