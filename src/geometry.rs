//! Planar pose math.
//!
//! The arena lives in the x/z plane; y is carried along untouched so a host
//! world can keep its entities at their own heights. Heading is a yaw angle
//! in radians where 0 faces +z and positive values turn clockwise seen from
//! above, i.e. towards [`Pose::right`].

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::ops::{Add, Mul, Sub};

/// A vector in the x/z plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Planar {
    pub x: f32,
    pub z: f32,
}

impl Planar {
    pub const ZERO: Planar = Planar { x: 0.0, z: 0.0 };

    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn dot(self, other: Planar) -> f32 {
        self.x * other.x + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    pub fn normalized(self) -> Option<Planar> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(Planar::new(self.x / len, self.z / len))
        } else {
            None
        }
    }
}

impl Add for Planar {
    type Output = Planar;
    fn add(self, rhs: Planar) -> Planar {
        Planar::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Planar {
    type Output = Planar;
    fn sub(self, rhs: Planar) -> Planar {
        Planar::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f32> for Planar {
    type Output = Planar;
    fn mul(self, rhs: f32) -> Planar {
        Planar::new(self.x * rhs, self.z * rhs)
    }
}

/// Position plus yaw of one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    /// Height; preserved but never read by the simulation.
    pub y: f32,
    pub z: f32,
    /// Yaw in radians.
    pub heading: f32,
}

impl Pose {
    pub const fn new(x: f32, y: f32, z: f32, heading: f32) -> Self {
        Self { x, y, z, heading }
    }

    /// Pose at height 0 with the heading given in degrees.
    pub fn planar(x: f32, z: f32, heading_deg: f32) -> Self {
        Self::new(x, 0.0, z, heading_deg.to_radians())
    }

    pub fn position(&self) -> Planar {
        Planar::new(self.x, self.z)
    }

    pub fn with_position(mut self, position: Planar) -> Self {
        self.x = position.x;
        self.z = position.z;
        self
    }

    pub fn forward(&self) -> Planar {
        Planar::new(self.heading.sin(), self.heading.cos())
    }

    pub fn right(&self) -> Planar {
        Planar::new(self.heading.cos(), -self.heading.sin())
    }

    pub fn planar_distance(&self, other: &Pose) -> f32 {
        (other.position() - self.position()).length()
    }

    /// Angle from this pose's forward vector to `other`, in `[-π, π]`.
    /// Positive means the other entity is to the right. A coincident
    /// entity yields 0.
    pub fn signed_angle_to(&self, other: &Pose) -> f32 {
        let forward = self.forward();
        let dir = (other.position() - self.position())
            .normalized()
            .unwrap_or(forward);
        self.right().dot(dir).atan2(forward.dot(dir))
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn heading_zero_faces_positive_z() {
        let pose = Pose::planar(0.0, 0.0, 0.0);
        assert!(close(pose.forward().x, 0.0) && close(pose.forward().z, 1.0));
        assert!(close(pose.right().x, 1.0) && close(pose.right().z, 0.0));
    }

    #[test]
    fn quarter_turn_faces_positive_x() {
        let pose = Pose::planar(0.0, 0.0, 90.0);
        assert!(close(pose.forward().x, 1.0) && close(pose.forward().z, 0.0));
        assert!(close(pose.right().x, 0.0) && close(pose.right().z, -1.0));
    }

    #[test]
    fn distance_ignores_height() {
        let a = Pose::new(0.0, 10.0, 0.0, 0.0);
        let b = Pose::new(3.0, -4.0, 4.0, 1.0);
        assert!(close(a.planar_distance(&b), 5.0));
    }

    #[test]
    fn signed_angle_sides() {
        let seeker = Pose::planar(0.0, 0.0, 0.0);
        assert!(close(seeker.signed_angle_to(&Pose::planar(0.0, 3.0, 0.0)), 0.0));
        assert!(close(seeker.signed_angle_to(&Pose::planar(2.0, 0.0, 0.0)), FRAC_PI_2));
        assert!(close(seeker.signed_angle_to(&Pose::planar(-2.0, 0.0, 0.0)), -FRAC_PI_2));
        assert!(close(seeker.signed_angle_to(&Pose::planar(0.0, -1.0, 0.0)).abs(), PI));
    }

    #[test]
    fn coincident_target_has_zero_angle() {
        let seeker = Pose::planar(1.0, 1.0, 37.0);
        assert_eq!(seeker.signed_angle_to(&Pose::planar(1.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        assert!(close(wrap_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2));
        assert!(close(wrap_angle(TAU + 0.5), 0.5));
        let tiny = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }
}
