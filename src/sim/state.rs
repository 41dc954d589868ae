//! Game state and core simulation types
//!
//! Everything the tick reads or writes lives here. Scene bodies are
//! registered with the spatial index once at construction; characters keep
//! the handle of their hit volume and move it as they move.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::camera::FollowCamera;
use super::character::MotionState;
use super::events::GameEvent;
use super::npc::OrbitController;
use super::projectile::ProjectileSet;
use super::spatial::{BodyHandle, SpatialIndex, Shape, Tag};
use crate::tuning::Tuning;

/// Position plus heading about +Y (0 faces +Z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub yaw: f32,
}

impl Transform {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// The player-controlled character
#[derive(Debug, Clone)]
pub struct Character {
    pub transform: Transform,
    pub motion: MotionState,
    /// Hit volume in the spatial index
    pub body: BodyHandle,
}

/// The scripted circling character
#[derive(Debug, Clone)]
pub struct Npc {
    pub transform: Transform,
    pub orbit: OrbitController,
    pub body: BodyHandle,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub arena: Arena,
    pub spatial: SpatialIndex,
    pub fence: BodyHandle,
    /// Absent until the character is spawned (e.g. while its model loads)
    pub player: Option<Character>,
    pub npc: Option<Npc>,
    pub projectiles: ProjectileSet,
    pub camera: FollowCamera,
    /// Emitted this tick, drained by the frontend
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) warned_missing_player: bool,
}

impl GameState {
    /// Full scene: fence, player at the arena center, NPC at orbit phase 0
    pub fn new(tuning: Tuning) -> Self {
        let mut state = Self::empty(tuning);
        state.spawn_player(Transform::new(
            Vec3::new(0.0, state.tuning.ground_height, 0.0),
            0.0,
        ));
        state.spawn_npc();
        state
    }

    /// Arena and fence only; no characters
    pub fn empty(tuning: Tuning) -> Self {
        let arena = Arena::from_tuning(&tuning);
        let mut spatial = SpatialIndex::new();
        let fence = spatial.register(Tag::Wall, Shape::mesh(arena.fence_triangles()));
        let camera = FollowCamera::from_tuning(&tuning);

        log::info!(
            "Arena ready: bound {}x{}, fence {}x{} ({} segments)",
            arena.bound.radius_x,
            arena.bound.radius_z,
            arena.fence.radius_x,
            arena.fence.radius_z,
            arena.fence_segments
        );

        Self {
            tuning,
            arena,
            spatial,
            fence,
            player: None,
            npc: None,
            projectiles: ProjectileSet::new(),
            camera,
            events: Vec::new(),
            time_ticks: 0,
            warned_missing_player: false,
        }
    }

    /// Place the player and register its hit volume. Replaces any existing player's pose.
    pub fn spawn_player(&mut self, transform: Transform) {
        if let Some(player) = &mut self.player {
            player.transform = transform;
            player.motion = MotionState::default();
            self.spatial.set_center(player.body, transform.position);
            return;
        }
        let body = self.spatial.register(
            Tag::Character,
            Shape::aabb(transform.position, self.tuning.character_half_extents),
        );
        self.player = Some(Character {
            transform,
            motion: MotionState::default(),
            body,
        });
        self.warned_missing_player = false;
        log::info!("Player spawned at {:?}", transform.position);
    }

    pub fn spawn_npc(&mut self) {
        if self.npc.is_some() {
            return;
        }
        let orbit = OrbitController::from_tuning(&self.tuning);
        let transform = orbit.pose();
        let body = self.spatial.register(
            Tag::CirclingCharacter,
            Shape::aabb(transform.position, self.tuning.character_half_extents),
        );
        self.npc = Some(Npc {
            transform,
            orbit,
            body,
        });
    }

    /// Take this tick's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
