//! Arena geometry: the elliptical movement bound and the fence wall around it
//!
//! The bound is checked analytically. The fence is a real triangle strip
//! registered with the spatial index and hit by rays like any other wall.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::spatial::Triangle;
use crate::tuning::Tuning;

/// Axis-aligned ellipse on the ground plane (X/Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub radius_x: f32,
    pub radius_z: f32,
}

impl Ellipse {
    pub fn new(radius_x: f32, radius_z: f32) -> Self {
        Self { radius_x, radius_z }
    }

    /// `x²/rx² + z²/rz²`: below 1 inside, 1 on the boundary
    #[inline]
    pub fn value(&self, p: Vec3) -> f32 {
        (p.x * p.x) / (self.radius_x * self.radius_x) + (p.z * p.z) / (self.radius_z * self.radius_z)
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        self.value(p) <= 1.0
    }

    /// Scale `p` radially from the origin onto the boundary, keeping its height.
    ///
    /// Points already inside are returned unchanged.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        let value = self.value(p);
        if value <= 1.0 {
            return p;
        }
        let t = value.sqrt();
        let mut clamped = Vec3::new(p.x / t, p.y, p.z / t);
        // Rounding can leave the scaled point a hair outside
        if self.value(clamped) > 1.0 {
            let nudge = 1.0 - f32::EPSILON * 4.0;
            clamped.x *= nudge;
            clamped.z *= nudge;
        }
        clamped
    }

    /// Point on the boundary at parametric angle `theta`
    #[inline]
    pub fn point_at(&self, theta: f32, y: f32) -> Vec3 {
        Vec3::new(self.radius_x * theta.cos(), y, self.radius_z * theta.sin())
    }
}

/// Static arena layout derived from tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Where characters may stand
    pub bound: Ellipse,
    /// Where the fence wall stands
    pub fence: Ellipse,
    pub fence_height: f32,
    pub fence_segments: u32,
}

impl Arena {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            bound: Ellipse::new(tuning.bound_radius_x, tuning.bound_radius_z),
            fence: Ellipse::new(tuning.fence_radius_x, tuning.fence_radius_z),
            fence_height: tuning.fence_height,
            fence_segments: tuning.fence_segments,
        }
    }

    /// Fence wall as two triangles per segment, from the ground up to `fence_height`
    pub fn fence_triangles(&self) -> Vec<Triangle> {
        let segments = self.fence_segments.max(3);
        let mut triangles = Vec::with_capacity(segments as usize * 2);

        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * std::f32::consts::TAU;
            let theta2 = ((i + 1) as f32 / segments as f32) * std::f32::consts::TAU;

            let lower1 = self.fence.point_at(theta1, 0.0);
            let lower2 = self.fence.point_at(theta2, 0.0);
            let upper1 = self.fence.point_at(theta1, self.fence_height);
            let upper2 = self.fence.point_at(theta2, self.fence_height);

            triangles.push(Triangle::new(lower1, upper1, lower2));
            triangles.push(Triangle::new(upper1, upper2, lower2));
        }

        triangles
    }
}
