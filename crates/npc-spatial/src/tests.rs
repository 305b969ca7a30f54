//! Unit tests for npc-spatial.
//!
//! Fixture: a 20×20 field with a single wall from z = -5 to z = 5 at x = 0.
//!
//! ```text
//!  z=10 +--------------------+
//!       |         |          |
//!       |    A    |    B     |   A = (-5, 0), B = (5, 0)
//!       |         |          |
//! z=-10 +--------------------+
//!      x=-10     x=0       x=10
//! ```

#[cfg(test)]
mod helpers {
    use npc_core::Vec3;

    use crate::{NavField, NavFieldBuilder};

    pub fn walled() -> NavField {
        let mut b = NavFieldBuilder::new(Vec3::flat(-10.0, -10.0), Vec3::flat(10.0, 10.0));
        b.add_obstacle(Vec3::flat(-0.5, -5.0), Vec3::flat(0.5, 5.0));
        b.build().unwrap()
    }

    pub const A: Vec3 = Vec3::flat(-5.0, 0.0);
    pub const B: Vec3 = Vec3::flat(5.0, 0.0);
}

#[cfg(test)]
mod field {
    use npc_core::Vec3;

    use super::helpers::{walled, A, B};
    use crate::{NavFieldBuilder, NavQuery, SpatialError};

    #[test]
    fn build_indexes_obstacles_and_corners() {
        let f = walled();
        assert_eq!(f.obstacle_count(), 1);
        assert_eq!(f.waypoint_count(), 4);
    }

    #[test]
    fn empty_bounds_rejected() {
        let b = NavFieldBuilder::new(Vec3::flat(0.0, 0.0), Vec3::flat(0.0, 5.0));
        assert!(matches!(b.build(), Err(SpatialError::InvalidField(_))));
    }

    #[test]
    fn navigability() {
        let f = walled();
        assert!(f.is_navigable(A));
        assert!(!f.is_navigable(Vec3::flat(0.0, 0.0)));
        assert!(!f.is_navigable(Vec3::flat(11.0, 0.0)));
    }

    #[test]
    fn wall_blocks_sight() {
        let f = walled();
        assert!(!f.line_of_sight(A, B));
        assert!(f.line_of_sight(A, Vec3::flat(-5.0, 8.0)));
        // Around the end of the wall.
        assert!(f.line_of_sight(Vec3::flat(-5.0, 8.0), Vec3::flat(5.0, 8.0)));
    }

    #[test]
    fn snap_inside_obstacle_moves_out() {
        let f = walled();
        let p = f.nearest_navigable(Vec3::flat(0.2, 0.0), 2.0).unwrap();
        assert!(f.is_navigable(p));
        assert!(p.distance_xz(Vec3::flat(0.2, 0.0)) <= 2.0 + 1e-3);
    }

    #[test]
    fn snap_fails_when_radius_too_small() {
        let f = walled();
        assert!(f.nearest_navigable(Vec3::flat(0.0, 0.0), 0.2).is_none());
    }

    #[test]
    fn snap_keeps_navigable_point() {
        let f = walled();
        assert_eq!(f.nearest_navigable(A, 1.0), Some(A));
    }
}

#[cfg(test)]
mod path {
    use npc_core::Vec3;

    use super::helpers::{walled, A, B};
    use crate::{NavField, NavFieldBuilder, NavQuery, SpatialError};

    #[test]
    fn direct_path_when_clear() {
        let f = NavField::open(10.0);
        let p = f.find_path(A, B).unwrap();
        assert_eq!(p.points.len(), 2);
        assert!((p.length - 10.0).abs() < 1e-4);
    }

    #[test]
    fn path_goes_around_wall() {
        let f = walled();
        let p = f.find_path(A, B).unwrap();
        assert!(p.points.len() >= 3, "expected a detour, got {:?}", p.points);
        assert!(p.length > 10.0);
        for w in p.points.windows(2) {
            assert!(f.line_of_sight(w[0], w[1]));
        }
        assert_eq!(p.destination(), Some(B));
    }

    #[test]
    fn unreachable_destination() {
        // Wall spans the whole field: no way around.
        let mut b = NavFieldBuilder::new(Vec3::flat(-10.0, -10.0), Vec3::flat(10.0, 10.0));
        b.add_obstacle(Vec3::flat(-0.5, -10.0), Vec3::flat(0.5, 10.0));
        let f = b.build().unwrap();
        assert!(matches!(f.find_path(A, B), Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn blocked_endpoint_is_reported() {
        let f = walled();
        assert!(matches!(
            f.find_path(A, Vec3::flat(0.0, 0.0)),
            Err(SpatialError::NotNavigable(_))
        ));
    }

    #[test]
    fn travel_secs() {
        let f = NavField::open(10.0);
        let p = f.find_path(A, B).unwrap();
        assert!((p.travel_secs(2.0) - 5.0).abs() < 1e-4);
        assert!(p.travel_secs(0.0).is_infinite());
    }
}
