//! The walled courtyard the skirmish plays out in.
//!
//! ```text
//!   z=+25 ┌───────────────────────────┐
//!         │   ███ barracks ███        │
//!         │                           │
//!         │          ▓▓▓▓▓            │  ▓ fountain
//!   ██████████████     ▓▓▓  ██████████  inner wall with a gate at x∈[-3,3]
//!         │                           │
//!         │            gate           │
//!   z=-25 └───────────────────────────┘
//! ```

use npc_core::Vec3;
use npc_spatial::{NavField, NavFieldBuilder, SpatialResult};

pub const HALF_EXTENT: f32 = 25.0;

pub fn build_courtyard() -> SpatialResult<NavField> {
    let mut b = NavFieldBuilder::new(
        Vec3::flat(-HALF_EXTENT, -HALF_EXTENT),
        Vec3::flat(HALF_EXTENT, HALF_EXTENT),
    )
    .clearance(0.6);

    // Inner wall, split by the gate.
    b.add_obstacle(Vec3::flat(-25.0, -0.5), Vec3::flat(-3.0, 0.5));
    b.add_obstacle(Vec3::flat(3.0, -0.5), Vec3::flat(25.0, 0.5));
    // Fountain north of the gate.
    b.add_obstacle(Vec3::flat(-2.0, 6.0), Vec3::flat(2.0, 9.0));
    // Barracks along the north edge.
    b.add_obstacle(Vec3::flat(-15.0, 19.0), Vec3::flat(-5.0, 23.0));
    b.build()
}
