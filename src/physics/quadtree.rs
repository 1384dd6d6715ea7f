use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let span = (max.x - min.x).max(max.y - min.y).max(1.0);

        Some(Self {
            center,
            half_extent: (span * 0.5) + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let lower = point.y >= self.center.y;
        match (right, lower) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    pub(super) fn distance_sq_to(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        (dx * dx) + (dy * dy)
    }
}

/// Region quadtree over node positions. Each cell aggregates the charge of
/// the points below it (for Barnes-Hut) and the largest disc radius (for the
/// collision broad phase).
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    /// Charge-weighted centroid.
    pub(super) center: Vec2,
    pub(super) charge: f32,
    pub(super) max_radius: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], charges: &[f32], radii: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, charges, radii, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let mut weighted = Vec2::ZERO;
        let mut weight = 0.0_f32;
        let mut charge = 0.0_f32;
        let mut max_radius = 0.0_f32;
        for &index in &indices {
            let magnitude = charges[index].abs();
            weighted += positions[index] * magnitude;
            weight += magnitude;
            charge += charges[index];
            max_radius = max_radius.max(radii[index]);
        }

        let center = if weight > 0.0 {
            weighted / weight
        } else {
            bounds.center
        };

        let mut node = Self {
            bounds,
            center,
            charge,
            max_radius,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }

        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                positions,
                charges,
                radii,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}
