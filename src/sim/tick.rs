//! Fixed timestep simulation tick
//!
//! Advances the whole scene by one step, in this order:
//!
//! 1. camera base height from pointer motion
//! 2. fire requests, spawned from the pre-move pose
//! 3. player movement and its hit volume
//! 4. NPC orbit and its hit volume
//! 5. existing projectiles advance and despawn on impact
//! 6. new projectiles join (first advanced next tick)
//! 7. camera follows the player

use super::character::{self, CollisionKind};
use super::events::GameEvent;
use super::input::TickInput;
use super::state::GameState;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Frame-time accumulator feeding fixed ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed seconds and return how many ticks to run now.
    ///
    /// Frame deltas are clamped to `MAX_FRAME_DT` and at most `MAX_SUBSTEPS`
    /// ticks run per frame; leftover time carries to the next frame.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Seconds banked toward the next tick
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.camera.adjust_height(input.pointer_dy);

    let mut pending = Vec::new();
    if input.fire > 0 {
        match &state.player {
            Some(player) => {
                let (position, direction) = character::muzzle(&player.transform, &state.tuning);
                for _ in 0..input.fire {
                    pending.push((position, direction, player.body));
                }
            }
            None => log::debug!("Fire request with no player, ignored"),
        }
    }

    step_player(state, input);

    if let Some(npc) = &mut state.npc {
        npc.transform = npc.orbit.tick(dt);
        state.spatial.set_center(npc.body, npc.transform.position);
    }

    for hit in state.projectiles.tick(&state.spatial, &state.tuning) {
        log::debug!(
            "Projectile {} hit {} at {:?}",
            hit.id,
            hit.target.tag.as_str(),
            hit.position
        );
        state.events.push(GameEvent::ProjectileDespawned {
            id: hit.id,
            position: hit.position,
            target: hit.target,
        });
    }

    for (position, direction, owner) in pending {
        if let Some(id) = state.projectiles.spawn(position, direction, Some(owner)) {
            log::debug!("Projectile {id} spawned at {position:?}");
            state.events.push(GameEvent::ProjectileSpawned {
                id,
                position,
                direction,
            });
        }
    }

    state
        .camera
        .follow(state.player.as_ref().map(|p| &p.transform));

    state.time_ticks += 1;
}

fn step_player(state: &mut GameState, input: &TickInput) {
    let Some(player) = &mut state.player else {
        if !state.warned_missing_player {
            log::warn!("No player transform, skipping movement");
            state.warned_missing_player = true;
        }
        return;
    };

    let resolution = character::step(
        &mut player.transform,
        &mut player.motion,
        &input.held,
        &state.arena,
        &state.spatial,
        &state.tuning,
    );
    match resolution.kind {
        CollisionKind::Free => {}
        CollisionKind::Bound => log::trace!("Player clamped to bound at {:?}", resolution.position),
        CollisionKind::Wall {
            normal, contacts, ..
        } => log::trace!("Player wall contact {normal:?} ({contacts} planes)"),
    }

    state
        .spatial
        .set_center(player.body, player.transform.position);
}
