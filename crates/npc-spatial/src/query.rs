//! Navigation query trait and path type.
//!
//! # Thread safety
//!
//! Providers must be `Send + Sync`: with the `parallel` feature of
//! `npc-sim`, every agent's tick queries the same provider concurrently.
//! All methods take `&self`.

use npc_core::Vec3;

use crate::SpatialResult;

// ── NavPath ───────────────────────────────────────────────────────────────────

/// A walkable polyline from source to destination (both included).
#[derive(Debug, Clone, PartialEq)]
pub struct NavPath {
    pub points: Vec<Vec3>,
    /// Total horizontal length in metres.
    pub length: f32,
}

impl NavPath {
    /// Build a path from its corner points, computing the length.
    pub fn from_points(points: Vec<Vec3>) -> Self {
        let length = points.windows(2).map(|w| w[0].distance_xz(w[1])).sum();
        Self { points, length }
    }

    /// `true` if source and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.points.len() < 2 || self.length <= f32::EPSILON
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Seconds to walk the path at `speed` m/s.
    pub fn travel_secs(&self, speed: f32) -> f32 {
        if speed <= 0.0 { f32::INFINITY } else { self.length / speed }
    }
}

// ── NavQuery ──────────────────────────────────────────────────────────────────

/// Spatial query provider consumed by the sensor, locomotion and group
/// layers.
pub trait NavQuery: Send + Sync {
    /// Closest point on the navigable surface within `radius` of
    /// `position`, or `None` if nothing walkable is that close.
    fn nearest_navigable(&self, position: Vec3, radius: f32) -> Option<Vec3>;

    /// Walkable path between two points.
    fn find_path(&self, from: Vec3, to: Vec3) -> SpatialResult<NavPath>;

    /// `true` if nothing blocks the straight segment between the points.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool;
}

impl<T: NavQuery + ?Sized> NavQuery for &T {
    fn nearest_navigable(&self, position: Vec3, radius: f32) -> Option<Vec3> {
        (**self).nearest_navigable(position, radius)
    }

    fn find_path(&self, from: Vec3, to: Vec3) -> SpatialResult<NavPath> {
        (**self).find_path(from, to)
    }

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        (**self).line_of_sight(from, to)
    }
}

impl<T: NavQuery + ?Sized> NavQuery for Box<T> {
    fn nearest_navigable(&self, position: Vec3, radius: f32) -> Option<Vec3> {
        (**self).nearest_navigable(position, radius)
    }

    fn find_path(&self, from: Vec3, to: Vec3) -> SpatialResult<NavPath> {
        (**self).find_path(from, to)
    }

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        (**self).line_of_sight(from, to)
    }
}
