use eframe::egui::Pos2;

use crate::graph::{Graph, NodeIndex};
use crate::interaction::GraphViewState;

/// Screen-space disc a node occupies this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickRegion {
    pub node: NodeIndex,
    pub center: Pos2,
    pub radius: f32,
}

/// Hit-test targets recomputed every frame from live positions and radii.
#[derive(Clone, Debug, Default)]
pub struct PickRegions {
    regions: Vec<PickRegion>,
}

impl PickRegions {
    pub fn compute(graph: &Graph, state: &GraphViewState, pulse_scale: f32) -> Self {
        let transform = state.transform();
        let regions = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let index = NodeIndex(index);
                PickRegion {
                    node: index,
                    center: transform.world_to_screen(node.position),
                    radius: displayed_radius(
                        node.radius,
                        transform.scale,
                        state.pulse_for(index),
                        pulse_scale,
                    ),
                }
            })
            .collect();
        Self { regions }
    }

    pub fn regions(&self) -> &[PickRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Closest node whose disc contains `point`.
    pub fn hit_test(&self, point: Pos2) -> Option<NodeIndex> {
        self.regions
            .iter()
            .filter_map(|region| {
                let distance = region.center.distance(point);
                (distance <= region.radius).then_some((region.node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node)
    }
}

/// On-screen radius including the hover pulse.
pub(crate) fn displayed_radius(radius: f32, scale: f32, pulse: f32, pulse_scale: f32) -> f32 {
    radius * scale * (1.0 + (pulse_scale - 1.0) * pulse.clamp(0.0, 1.0))
}
