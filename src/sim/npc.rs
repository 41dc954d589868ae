//! Circling character: a scripted NPC running a fixed orbit
//!
//! The pose is a pure function of the orbit phase, so accumulated updates
//! never drift off the circle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::Transform;
use crate::tuning::Tuning;
use crate::yaw_from_direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitController {
    /// Radians travelled so far
    pub phase: f32,
    pub radius: f32,
    pub height: f32,
    /// Radians per second
    pub angular_speed: f32,
}

impl OrbitController {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            phase: 0.0,
            radius: tuning.orbit_radius,
            height: tuning.orbit_height,
            angular_speed: tuning.orbit_angular_speed,
        }
    }

    /// Position on the circle and facing along its tangent
    pub fn pose_at(&self, phase: f32) -> Transform {
        let (sin, cos) = phase.sin_cos();
        let position = Vec3::new(self.radius * cos, self.height, self.radius * sin);
        let tangent = Vec3::new(-sin, 0.0, cos);
        Transform::new(position, yaw_from_direction(tangent))
    }

    pub fn pose(&self) -> Transform {
        self.pose_at(self.phase)
    }

    /// Advance by `dt` seconds and return the new pose
    pub fn tick(&mut self, dt: f32) -> Transform {
        self.phase += dt * self.angular_speed;
        self.pose()
    }
}
