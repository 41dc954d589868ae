//! Data-driven gameplay constants
//!
//! Every number the simulation consumes lives here so a level can be retuned
//! from JSON without touching code. Speeds and accelerations are per tick at
//! `consts::SIM_DT`; the orbit angular speed is per second.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Character movement (per tick) ===
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Speed gained per tick while moving (doubled under sprint)
    pub acceleration: f32,
    /// Speed lost per tick with no directional input
    pub deceleration: f32,
    /// Yaw change per tick while turning (radians)
    pub rotation_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Height of the character origin when standing
    pub ground_height: f32,

    // === Character collision ===
    pub character_radius: f32,
    pub collision_padding: f32,
    /// Rays cast around the character each tick
    pub collision_rays: u32,
    /// Cap on contact resolution passes
    pub resolve_iterations: u32,
    /// Half extents of a character hit volume
    pub character_half_extents: Vec3,

    // === Arena ===
    /// Movement bound (ellipse radii on X and Z)
    pub bound_radius_x: f32,
    pub bound_radius_z: f32,
    /// Fence wall (ellipse radii on X and Z)
    pub fence_radius_x: f32,
    pub fence_radius_z: f32,
    pub fence_height: f32,
    pub fence_segments: u32,

    // === Projectiles ===
    pub projectile_speed: f32,
    /// A ray hit closer than this counts as impact
    pub projectile_hit_distance: f32,
    /// Spawn height above the character origin
    pub projectile_spawn_height: f32,
    /// Ticks during which a projectile ignores the body that fired it
    pub projectile_owner_grace_ticks: u32,

    // === Circling NPC ===
    pub orbit_radius: f32,
    pub orbit_height: f32,
    /// Radians per second
    pub orbit_angular_speed: f32,

    // === Camera ===
    pub camera_offset: Vec3,
    pub camera_base_height: f32,
    pub camera_min_height: f32,
    pub camera_max_height: f32,
    /// Base height change per pixel of vertical pointer motion
    pub pointer_sensitivity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 0.1,
            sprint_speed: 0.2,
            acceleration: 0.01,
            deceleration: 0.015,
            rotation_speed: 0.05,
            jump_impulse: 0.15,
            gravity: 0.006,
            ground_height: 1.0,

            character_radius: 0.8,
            collision_padding: 0.3,
            collision_rays: 16,
            resolve_iterations: 4,
            character_half_extents: Vec3::new(0.5, 1.0, 0.5),

            bound_radius_x: 44.5,
            bound_radius_z: 29.5,
            fence_radius_x: 45.0,
            fence_radius_z: 30.0,
            fence_height: 15.0,
            fence_segments: 128,

            projectile_speed: 0.5,
            projectile_hit_distance: 1.0,
            projectile_spawn_height: 1.0,
            projectile_owner_grace_ticks: 3,

            orbit_radius: 20.0,
            orbit_height: 2.0,
            orbit_angular_speed: 0.3,

            camera_offset: Vec3::new(0.0, 3.0, -5.0),
            camera_base_height: 2.0,
            camera_min_height: 1.0,
            camera_max_height: 3.0,
            pointer_sensitivity: 0.005,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file from disk
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Minimum distance the character keeps from a wall surface
    #[inline]
    pub fn wall_clearance(&self) -> f32 {
        self.character_radius + self.collision_padding
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, v: f32) -> Result<(), TuningError> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be positive and finite",
                })
            }
        }

        positive("walk_speed", self.walk_speed)?;
        positive("sprint_speed", self.sprint_speed)?;
        positive("acceleration", self.acceleration)?;
        positive("deceleration", self.deceleration)?;
        positive("gravity", self.gravity)?;
        positive("character_radius", self.character_radius)?;
        positive("bound_radius_x", self.bound_radius_x)?;
        positive("bound_radius_z", self.bound_radius_z)?;
        positive("fence_radius_x", self.fence_radius_x)?;
        positive("fence_radius_z", self.fence_radius_z)?;
        positive("fence_height", self.fence_height)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_hit_distance", self.projectile_hit_distance)?;
        positive("pointer_sensitivity", self.pointer_sensitivity)?;

        if self.collision_padding < 0.0 {
            return Err(TuningError::Invalid {
                field: "collision_padding",
                reason: "must not be negative",
            });
        }
        if self.collision_rays < 3 {
            return Err(TuningError::Invalid {
                field: "collision_rays",
                reason: "need at least 3 rays to surround the character",
            });
        }
        if self.resolve_iterations == 0 {
            return Err(TuningError::Invalid {
                field: "resolve_iterations",
                reason: "must be at least 1",
            });
        }
        if self.fence_segments < 3 {
            return Err(TuningError::Invalid {
                field: "fence_segments",
                reason: "need at least 3 segments",
            });
        }
        if self.bound_radius_x > self.fence_radius_x || self.bound_radius_z > self.fence_radius_z {
            return Err(TuningError::Invalid {
                field: "bound_radius_x",
                reason: "movement bound must lie inside the fence",
            });
        }
        if self.camera_min_height > self.camera_max_height {
            return Err(TuningError::Invalid {
                field: "camera_min_height",
                reason: "must not exceed camera_max_height",
            });
        }
        Ok(())
    }
}
