//! Reference navigation provider: a walled rectangle with box obstacles.
//!
//! # Layout
//!
//! The walkable area is the rectangle `[min_x, max_x] × [min_z, max_z]` at
//! a constant ground height, minus a set of axis-aligned boxes.  Obstacles
//! are bulk-loaded into an R-tree (via `rstar`) keyed by their XZ
//! footprint, so segment tests only look at boxes whose envelope overlaps
//! the segment's bounding box.
//!
//! # Paths
//!
//! Straight segments are returned directly.  Otherwise a visibility graph
//! over obstacle corners (pushed outward by `clearance`) is searched with
//! Dijkstra.  Edge costs are integer centimetres so heap ordering is total
//! and tie-breaking deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f32::consts::TAU;

use rstar::{RTree, RTreeObject, AABB};

use npc_core::Vec3;

use crate::query::{NavPath, NavQuery};
use crate::{SpatialError, SpatialResult};

/// Ring count and samples per ring for `nearest_navigable`.
const SNAP_RINGS: u32 = 4;
const SNAP_SAMPLES: u32 = 16;

// ── R-tree obstacle entry ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Obstacle {
    min: [f32; 2], // [x, z]
    max: [f32; 2],
}

impl Obstacle {
    #[inline]
    fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && z >= self.min[1] && z <= self.max[1]
    }

    /// Slab test of the segment `a → b` against this box.
    fn intersects_segment(&self, a: [f32; 2], b: [f32; 2]) -> bool {
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;
        for axis in 0..2 {
            let d = b[axis] - a[axis];
            if d.abs() <= f32::EPSILON {
                if a[axis] < self.min[axis] || a[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - a[axis]) * inv;
            let mut t1 = (self.max[axis] - a[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }
}

impl RTreeObject for Obstacle {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

// ── NavField ──────────────────────────────────────────────────────────────────

/// Walled rectangular field with box obstacles.  Build with
/// [`NavFieldBuilder`].
pub struct NavField {
    min: [f32; 2],
    max: [f32; 2],
    ground_y: f32,
    obstacles: RTree<Obstacle>,
    /// Inflated obstacle corners that are themselves walkable.
    waypoints: Vec<Vec3>,
}

impl NavField {
    /// An obstacle-free square of side `2 * half_extent` centred on the origin.
    pub fn open(half_extent: f32) -> Self {
        NavField {
            min: [-half_extent, -half_extent],
            max: [half_extent, half_extent],
            ground_y: 0.0,
            obstacles: RTree::new(),
            waypoints: Vec::new(),
        }
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.size()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    fn in_bounds(&self, x: f32, z: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && z >= self.min[1] && z <= self.max[1]
    }

    /// `true` if `p` lies inside the bounds and outside every obstacle.
    pub fn is_navigable(&self, p: Vec3) -> bool {
        if !self.in_bounds(p.x, p.z) {
            return false;
        }
        let probe = AABB::from_point([p.x, p.z]);
        !self
            .obstacles
            .locate_in_envelope_intersecting(&probe)
            .any(|o| o.contains(p.x, p.z))
    }

    #[inline]
    fn on_ground(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x, self.ground_y, p.z)
    }

    fn clamp_to_bounds(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min[0], self.max[0]),
            self.ground_y,
            p.z.clamp(self.min[1], self.max[1]),
        )
    }

    fn segment_clear(&self, from: Vec3, to: Vec3) -> bool {
        let a = [from.x, from.z];
        let b = [to.x, to.z];
        let envelope = AABB::from_corners(a, b);
        !self
            .obstacles
            .locate_in_envelope_intersecting(&envelope)
            .any(|o| o.intersects_segment(a, b))
    }

    fn dijkstra(&self, from: Vec3, to: Vec3) -> SpatialResult<NavPath> {
        // Node 0 = source, node 1 = destination, then the waypoints.
        let mut nodes = Vec::with_capacity(self.waypoints.len() + 2);
        nodes.push(self.on_ground(from));
        nodes.push(self.on_ground(to));
        nodes.extend_from_slice(&self.waypoints);

        let n = nodes.len();
        let mut dist = vec![u32::MAX; n];
        let mut prev = vec![usize::MAX; n];
        dist[0] = 0;

        let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
        heap.push(Reverse((0, 0)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == 1 {
                return Ok(reconstruct(&nodes, &prev));
            }
            if cost > dist[node] {
                continue;
            }
            for next in 1..n {
                if next == node || !self.segment_clear(nodes[node], nodes[next]) {
                    continue;
                }
                let step = (nodes[node].distance_xz(nodes[next]) * 100.0).ceil() as u32;
                let new_cost = cost.saturating_add(step);
                if new_cost < dist[next] {
                    dist[next] = new_cost;
                    prev[next] = node;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }

        Err(SpatialError::NoPath { from, to })
    }
}

fn reconstruct(nodes: &[Vec3], prev: &[usize]) -> NavPath {
    let mut points = vec![nodes[1]];
    let mut cur = 1;
    while prev[cur] != usize::MAX {
        cur = prev[cur];
        points.push(nodes[cur]);
    }
    points.reverse();
    NavPath::from_points(points)
}

impl NavQuery for NavField {
    fn nearest_navigable(&self, position: Vec3, radius: f32) -> Option<Vec3> {
        if self.is_navigable(position) {
            return Some(self.on_ground(position));
        }
        if radius <= 0.0 {
            return None;
        }
        // Inner rings first, so the first hit is (approximately) the closest.
        for ring in 1..=SNAP_RINGS {
            let r = radius * ring as f32 / SNAP_RINGS as f32;
            for k in 0..SNAP_SAMPLES {
                let dir = Vec3::from_yaw(k as f32 * TAU / SNAP_SAMPLES as f32);
                let candidate = self.clamp_to_bounds(position + dir * r);
                if candidate.distance_xz(position) <= radius + 1e-3
                    && self.is_navigable(candidate)
                {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn find_path(&self, from: Vec3, to: Vec3) -> SpatialResult<NavPath> {
        if !self.is_navigable(from) {
            return Err(SpatialError::NotNavigable(from));
        }
        if !self.is_navigable(to) {
            return Err(SpatialError::NotNavigable(to));
        }
        if self.segment_clear(from, to) {
            return Ok(NavPath::from_points(vec![self.on_ground(from), self.on_ground(to)]));
        }
        let path = self.dijkstra(from, to);
        if path.is_err() {
            tracing::debug!(%from, %to, "nav field: no path through obstacles");
        }
        path
    }

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self.in_bounds(from.x, from.z) && self.in_bounds(to.x, to.z) && self.segment_clear(from, to)
    }
}

// ── NavFieldBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavField`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use npc_core::Vec3;
/// use npc_spatial::{NavFieldBuilder, NavQuery};
///
/// let mut b = NavFieldBuilder::new(Vec3::flat(-10.0, -10.0), Vec3::flat(10.0, 10.0));
/// b.add_obstacle(Vec3::flat(-1.0, -5.0), Vec3::flat(1.0, 5.0));
/// let field = b.build().unwrap();
/// assert!(!field.line_of_sight(Vec3::flat(-5.0, 0.0), Vec3::flat(5.0, 0.0)));
/// assert!(field.find_path(Vec3::flat(-5.0, 0.0), Vec3::flat(5.0, 0.0)).is_ok());
/// ```
pub struct NavFieldBuilder {
    min: [f32; 2],
    max: [f32; 2],
    ground_y: f32,
    clearance: f32,
    obstacles: Vec<Obstacle>,
}

impl NavFieldBuilder {
    /// Bounds are given as two ground points; only `x` and `z` are used.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: [min.x, min.z],
            max: [max.x, max.z],
            ground_y: 0.0,
            clearance: 0.5,
            obstacles: Vec::new(),
        }
    }

    pub fn ground_height(mut self, y: f32) -> Self {
        self.ground_y = y;
        self
    }

    /// Distance path corners keep from obstacle faces.  Default: 0.5 m.
    pub fn clearance(mut self, metres: f32) -> Self {
        self.clearance = metres;
        self
    }

    /// Add a box obstacle spanning the two corner points (any order).
    pub fn add_obstacle(&mut self, a: Vec3, b: Vec3) -> &mut Self {
        self.obstacles.push(Obstacle {
            min: [a.x.min(b.x), a.z.min(b.z)],
            max: [a.x.max(b.x), a.z.max(b.z)],
        });
        self
    }

    pub fn build(self) -> SpatialResult<NavField> {
        if !(self.min[0] < self.max[0] && self.min[1] < self.max[1]) {
            return Err(SpatialError::InvalidField(format!(
                "bounds {:?}..{:?} are empty",
                self.min, self.max
            )));
        }
        if self.clearance < 0.0 || !self.clearance.is_finite() {
            return Err(SpatialError::InvalidField(format!(
                "clearance {} must be a non-negative finite number",
                self.clearance
            )));
        }

        let mut field = NavField {
            min: self.min,
            max: self.max,
            ground_y: self.ground_y,
            obstacles: RTree::bulk_load(self.obstacles.clone()),
            waypoints: Vec::new(),
        };

        let c = self.clearance;
        let waypoints: Vec<Vec3> = self
            .obstacles
            .iter()
            .flat_map(|o| {
                [
                    (o.min[0] - c, o.min[1] - c),
                    (o.min[0] - c, o.max[1] + c),
                    (o.max[0] + c, o.min[1] - c),
                    (o.max[0] + c, o.max[1] + c),
                ]
            })
            .map(|(x, z)| Vec3::new(x, self.ground_y, z))
            .filter(|p| field.is_navigable(*p))
            .collect();
        field.waypoints = waypoints;

        Ok(field)
    }
}
