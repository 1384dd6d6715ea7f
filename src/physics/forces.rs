use eframe::egui::{Vec2, vec2};

use crate::graph::Graph;

use super::quadtree::QuadNode;

/// Deterministic unit direction for coincident points.
fn jiggle(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
    pub(super) distance_max_sq: f32,
}

fn charge_impulse(delta: Vec2, distance_sq: f32, charge: f32, params: ChargeParams) -> Vec2 {
    let distance_sq = if distance_sq < params.distance_min_sq {
        (params.distance_min_sq * distance_sq).sqrt()
    } else {
        distance_sq
    };
    delta * (charge * params.alpha / distance_sq)
}

/// Velocity change on `index` from every other charge, Barnes-Hut style.
/// Negative charges repel.
pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ChargeParams,
    impulse: &mut Vec2,
) {
    if node.charge == 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            let mut distance_sq = delta.length_sq();
            if distance_sq >= params.distance_max_sq {
                continue;
            }
            if distance_sq < 1e-12 {
                delta = jiggle(index, other) * 1e-3;
                distance_sq = delta.length_sq();
            }
            *impulse += charge_impulse(delta, distance_sq, charges[other], params);
        }
        return;
    }

    let delta = node.center - point;
    let distance_sq = delta.length_sq();
    let side = node.bounds.side_length();
    if !node.bounds.contains(point) && side * side < params.theta_sq * distance_sq {
        if distance_sq < params.distance_max_sq {
            *impulse += charge_impulse(delta, distance_sq, node.charge, params);
        }
        return;
    }

    for child in node.children() {
        accumulate_charge(child, index, positions, charges, params, impulse);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
}

fn resolve_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    corrections: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = positions[from] - positions[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq < 1e-12 {
        delta = jiggle(from, to) * 1e-3;
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = (reach - distance) / distance * params.strength;
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = to_sq / (from_sq + to_sq);

    corrections[from] += delta * push * share;
    corrections[to] -= delta * push * (1.0 - share);
}

/// Dual-tree traversal over overlapping cells; only pairs whose cells are
/// within reach of each other are tested.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    corrections: &mut [Vec2],
) {
    let reach = node_a.max_radius + node_b.max_radius;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_pair(from, to, positions, radii, params, corrections);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_pair(from, to, positions, radii, params, corrections);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(
                child_a,
                child_a,
                true,
                positions,
                radii,
                params,
                corrections,
            );
            for child_b in &children[first + 1..] {
                accumulate_collision_pairs(
                    child_a,
                    child_b,
                    false,
                    positions,
                    radii,
                    params,
                    corrections,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(
                child,
                node_b,
                false,
                positions,
                radii,
                params,
                corrections,
            );
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(
                node_a,
                child,
                false,
                positions,
                radii,
                params,
                corrections,
            );
        }
    }
}

/// Springs along links toward `distance`, looking one step ahead with the
/// current velocities. Better-connected endpoints move less.
pub(super) fn apply_links(graph: &mut Graph, distance: f32, strength: f32, alpha: f32) {
    for link_index in 0..graph.link_count() {
        let link = &graph.links()[link_index];
        let (source, target) = (link.source, link.target);
        let source_degree = graph.degree(source).max(1) as f32;
        let target_degree = graph.degree(target).max(1) as f32;
        let link_strength = strength / source_degree.min(target_degree);
        let bias = source_degree / (source_degree + target_degree);

        let nodes = graph.nodes();
        let (source_node, target_node) = (&nodes[source.0], &nodes[target.0]);
        let mut delta = (target_node.position + target_node.velocity)
            - (source_node.position + source_node.velocity);
        if delta.length_sq() < 1e-12 {
            delta = jiggle(source.0, target.0) * 1e-3;
        }
        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * link_strength);

        let nodes = graph.nodes_mut();
        nodes[target.0].velocity -= correction * bias;
        nodes[source.0].velocity += correction * (1.0 - bias);
    }
}

/// Moves the whole layout so its centroid drifts toward `center`.
pub(super) fn apply_centering(graph: &mut Graph, center: Vec2, strength: f32) {
    let count = graph.node_count();
    if count == 0 {
        return;
    }

    let centroid = graph
        .nodes()
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / count as f32;
    let shift = (centroid - center) * strength;
    if shift.length_sq() <= 1e-12 {
        return;
    }
    for node in graph.nodes_mut() {
        node.position -= shift;
    }
}

/// Independent weak pulls toward `center` on each axis.
pub(super) fn apply_axis_anchors(graph: &mut Graph, center: Vec2, strength: f32, alpha: f32) {
    let scale = strength * alpha;
    for node in graph.nodes_mut() {
        node.velocity += (center - node.position) * scale;
    }
}
