//! Gameplay events emitted by the tick for the frontend to consume

use glam::Vec3;

use super::projectile::ProjectileId;
use super::spatial::{BodyHandle, Tag};

/// What a projectile struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    pub body: BodyHandle,
    pub tag: Tag,
}

/// Gameplay events (drained by the frontend each frame)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ProjectileSpawned {
        id: ProjectileId,
        position: Vec3,
        direction: Vec3,
    },
    /// Removed after a confirmed hit
    ProjectileDespawned {
        id: ProjectileId,
        position: Vec3,
        target: HitTarget,
    },
}
