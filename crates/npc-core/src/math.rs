//! World-space vector type.
//!
//! The world is Y-up.  Gameplay decisions (vision cones, flanking rings,
//! dodge directions) happen on the horizontal XZ plane; `y` is carried along
//! for eye heights and navigation surfaces but ignored by the `*_xz` helpers.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A single-precision 3-D vector.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// Default facing for a freshly spawned agent.
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane (`y = 0`).
    #[inline]
    pub const fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn length_xz(self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Distance ignoring height.
    #[inline]
    pub fn distance_xz(self, other: Vec3) -> f32 {
        (other - self).length_xz()
    }

    /// Unit vector in the same direction, or `ZERO` for a (near) zero vector.
    pub fn normalize_or_zero(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON { Vec3::ZERO } else { self * (1.0 / len) }
    }

    /// Horizontal component only, normalized.
    pub fn flatten(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z).normalize_or_zero()
    }

    /// Heading around the vertical axis, radians, measured from +Z toward +X.
    #[inline]
    pub fn yaw(self) -> f32 {
        self.x.atan2(self.z)
    }

    /// Unit horizontal direction for a heading produced by [`yaw`](Self::yaw).
    #[inline]
    pub fn from_yaw(yaw: f32) -> Vec3 {
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Rotate around the vertical axis by `radians` (same sense as `yaw`).
    pub fn rotate_y(self, radians: f32) -> Vec3 {
        let (s, c) = radians.sin_cos();
        Vec3::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Unsigned horizontal angle between two directions, radians in [0, π].
    /// Returns 0 when either direction has no horizontal component.
    pub fn angle_xz(self, other: Vec3) -> f32 {
        let a = self.flatten();
        let b = other.flatten();
        if a == Vec3::ZERO || b == Vec3::ZERO {
            return 0.0;
        }
        a.dot(b).clamp(-1.0, 1.0).acos()
    }

    /// Horizontal perpendicular (rotated 90° toward +X from +Z).
    #[inline]
    pub fn perpendicular_xz(self) -> Vec3 {
        Vec3::new(self.z, 0.0, -self.x).normalize_or_zero()
    }

    /// Step from `self` toward `target` by at most `max_step`.
    pub fn move_towards(self, target: Vec3, max_step: f32) -> Vec3 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist <= f32::EPSILON {
            target
        } else {
            self + delta * (max_step / dist)
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
