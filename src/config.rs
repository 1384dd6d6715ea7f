use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Engine settings. Every section falls back to its defaults when omitted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub view: ViewConfig,
    pub layout: LayoutConfig,
    pub groups: GroupConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid engine config in {}", path.display()))
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// `alpha_target` while a node is being dragged.
    pub drag_alpha_target: f32,
    /// Upper bound on synchronous ticks run right after mount.
    pub pretick_limit: usize,
    pub link_distance: f32,
    /// Extra link distance per `sqrt(node_count)`.
    pub link_distance_growth: f32,
    pub link_distance_max: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub aggregate_charge_multiplier: f32,
    pub charge_distance_min: f32,
    pub charge_distance_max: f32,
    pub barnes_hut_theta: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub collision_iterations: usize,
    pub center_strength: f32,
    pub axis_strength: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            pretick_limit: 120,
            link_distance: 40.0,
            link_distance_growth: 4.0,
            link_distance_max: 220.0,
            link_strength: 0.7,
            charge_strength: -60.0,
            aggregate_charge_multiplier: 3.0,
            charge_distance_min: 1.0,
            charge_distance_max: 600.0,
            barnes_hut_theta: 0.9,
            collision_padding: 2.0,
            collision_strength: 0.8,
            collision_iterations: 3,
            center_strength: 0.05,
            axis_strength: 0.03,
        }
    }
}

impl SimulationConfig {
    pub fn link_distance_for(&self, node_count: usize) -> f32 {
        (self.link_distance + (node_count as f32).sqrt() * self.link_distance_growth)
            .min(self.link_distance_max)
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub show_labels: bool,
    /// Screen-space distance a press may travel and still count as a click.
    pub click_slop: f32,
    /// Radius multiplier reached by a fully hovered node.
    pub hover_pulse_scale: f32,
    /// Seconds for the hover pulse to settle.
    pub hover_pulse_secs: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.1,
            zoom_max: 8.0,
            show_labels: true,
            click_slop: 4.0,
            hover_pulse_scale: 1.35,
            hover_pulse_secs: 0.18,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_radius: f32,
    /// Extra placement radius per `sqrt(node_count)`.
    pub radius_growth: f32,
    pub jitter: f32,
    pub fade_duration_secs: f32,
    pub fade_stagger_secs: f32,
    pub fade_max_stagger_secs: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 60.0,
            radius_growth: 18.0,
            jitter: 24.0,
            fade_duration_secs: 0.35,
            fade_stagger_secs: 0.006,
            fade_max_stagger_secs: 0.6,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub aggregate: Vec<String>,
    /// Leaf groups with a profile page the host can navigate to.
    pub navigable: Vec<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            aggregate: vec!["aggregate".to_owned()],
            navigable: vec!["member".to_owned()],
        }
    }
}

impl GroupConfig {
    pub fn is_aggregate(&self, group: &str) -> bool {
        self.aggregate.iter().any(|candidate| candidate == group)
    }

    pub fn is_navigable(&self, group: &str) -> bool {
        !self.is_aggregate(group) && self.navigable.iter().any(|candidate| candidate == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"view": {"zoom_max": 4.0}}"#).expect("config parses");
        assert_eq!(config.view.zoom_max, 4.0);
        assert_eq!(config.view.zoom_min, 0.1);
        assert_eq!(config.simulation.pretick_limit, 120);
        assert!(config.groups.is_aggregate("aggregate"));
    }

    #[test]
    fn link_distance_grows_with_node_count_and_caps() {
        let config = SimulationConfig::default();
        let small = config.link_distance_for(4);
        let large = config.link_distance_for(400);
        assert!(large > small);
        assert!(config.link_distance_for(1_000_000) <= config.link_distance_max);
    }

    #[test]
    fn aggregate_groups_are_never_navigable() {
        let groups = GroupConfig {
            aggregate: vec!["committee".to_owned()],
            navigable: vec!["committee".to_owned(), "member".to_owned()],
        };
        assert!(!groups.is_navigable("committee"));
        assert!(groups.is_navigable("member"));
        assert!(!groups.is_navigable("asset"));
    }
}
