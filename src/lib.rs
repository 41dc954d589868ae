//! Oval Arena - a third-person arena demo
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collision, projectiles, camera follow)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Host key/button mapping
//! - `settings`: Player preferences
//! - `tuning`: Data-driven gameplay constants

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsToggle};
pub use tuning::{Tuning, TuningError};

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Per-tick movement constants are tuned at 60 Hz.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scene tags used by ray queries
    pub const TAG_WALL: &str = "wall";
    pub const TAG_CHARACTER: &str = "character";
    pub const TAG_CIRCLING_CHARACTER: &str = "circling-character";
}

/// Rotate a vector around the world up axis by `yaw` radians.
///
/// Right-handed, matching a Y rotation matrix: +Z turns toward +X for positive yaw.
#[inline]
pub fn rotate_y(v: Vec3, yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * v
}

/// Forward vector for a yaw: the unit +Z axis rotated around +Y.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    rotate_y(Vec3::Z, yaw)
}

/// Yaw that makes `yaw_forward` point along `dir` (horizontal part only)
#[inline]
pub fn yaw_from_direction(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
