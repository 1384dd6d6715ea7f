//! Force-directed layout with an `alpha` energy schedule.
//!
//! Each tick cools `alpha` toward `alpha_target`, accumulates link, charge,
//! collision and anchoring forces into node velocities, then integrates.
//! Pinned nodes snap to their pin and ignore forces.

mod forces;
mod quadtree;

use eframe::egui::Vec2;

use crate::config::SimulationConfig;
use crate::graph::Graph;
use forces::{
    ChargeParams, CollisionParams, accumulate_charge, accumulate_collision_pairs,
    apply_axis_anchors, apply_centering, apply_links,
};
use quadtree::QuadNode;

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    impulses: Vec<Vec2>,
}

pub struct Simulation {
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    tick_count: u64,
    center: Vec2,
    link_distance: f32,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub fn new(config: SimulationConfig, graph: &Graph, center: Vec2) -> Self {
        Self {
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            tick_count: 0,
            center,
            link_distance: config.link_distance_for(graph.node_count()),
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn set_config(&mut self, config: SimulationConfig, graph: &Graph) {
        self.config = config;
        self.link_distance = config.link_distance_for(graph.node_count());
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Keeps the system warm until [`Simulation::cool`] is called.
    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn is_active(&self, graph: &Graph) -> bool {
        !graph.is_empty() && (self.alpha >= self.config.alpha_min || self.alpha_target > 0.0)
    }

    /// Runs up to `limit` ticks synchronously, stopping once the layout has
    /// cooled. Returns how many ticks ran.
    pub fn pretick(&mut self, graph: &mut Graph, limit: usize) -> usize {
        let mut ticks = 0;
        while ticks < limit && self.is_active(graph) {
            self.step(graph);
            ticks += 1;
        }
        ticks
    }

    /// One simulation tick, regardless of the current energy.
    pub fn step(&mut self, graph: &mut Graph) {
        if graph.is_empty() {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.tick_count += 1;
        let alpha = self.alpha;

        apply_links(graph, self.link_distance, self.config.link_strength, alpha);
        self.apply_charge(graph, alpha);
        apply_axis_anchors(graph, self.center, self.config.axis_strength, alpha);
        self.apply_collisions(graph);

        let friction = 1.0 - self.config.velocity_decay;
        for node in graph.nodes_mut() {
            match node.pinned {
                Some(pin) => {
                    node.position = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= friction;
                    node.position += node.velocity;
                }
            }
        }

        apply_centering(graph, self.center, self.config.center_strength);
        for node in graph.nodes_mut() {
            if let Some(pin) = node.pinned {
                node.position = pin;
            }
        }
    }

    fn apply_charge(&mut self, graph: &mut Graph, alpha: f32) {
        let config = self.config;
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.charges.clear();
        scratch.radii.clear();
        for node in graph.nodes() {
            scratch.positions.push(node.position);
            scratch.radii.push(node.radius);
            let multiplier = if node.is_aggregate {
                config.aggregate_charge_multiplier
            } else {
                1.0
            };
            scratch.charges.push(config.charge_strength * multiplier);
        }

        let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii)
        else {
            return;
        };

        let params = ChargeParams {
            alpha,
            theta_sq: config.barnes_hut_theta * config.barnes_hut_theta,
            distance_min_sq: config.charge_distance_min * config.charge_distance_min,
            distance_max_sq: config.charge_distance_max * config.charge_distance_max,
        };
        for (index, node) in graph.nodes_mut().iter_mut().enumerate() {
            let mut impulse = Vec2::ZERO;
            accumulate_charge(
                &tree,
                index,
                &scratch.positions,
                &scratch.charges,
                params,
                &mut impulse,
            );
            node.velocity += impulse;
        }
    }

    fn apply_collisions(&mut self, graph: &mut Graph) {
        let config = self.config;
        let scratch = &mut self.scratch;
        let params = CollisionParams {
            strength: config.collision_strength,
        };

        scratch.radii.clear();
        scratch.charges.clear();
        for node in graph.nodes() {
            scratch.radii.push(node.radius + config.collision_padding);
            scratch.charges.push(1.0);
        }

        for _ in 0..config.collision_iterations {
            scratch.positions.clear();
            for node in graph.nodes() {
                scratch.positions.push(node.position + node.velocity);
            }

            let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii)
            else {
                return;
            };

            scratch.impulses.clear();
            scratch.impulses.resize(graph.node_count(), Vec2::ZERO);
            accumulate_collision_pairs(
                &tree,
                &tree,
                true,
                &scratch.positions,
                &scratch.radii,
                params,
                &mut scratch.impulses,
            );

            for (node, impulse) in graph.nodes_mut().iter_mut().zip(&scratch.impulses) {
                node.velocity += *impulse;
            }
        }
    }
}
