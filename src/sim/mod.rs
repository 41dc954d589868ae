//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Input arrives as a per-tick snapshot, never from event handlers
//! - Stable iteration order (projectiles by id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod camera;
pub mod character;
pub mod events;
pub mod input;
pub mod npc;
pub mod projectile;
pub mod spatial;
pub mod state;
pub mod tick;

pub use arena::{Arena, Ellipse};
pub use camera::FollowCamera;
pub use character::{CollisionKind, MotionPhase, MotionState, Resolution};
pub use events::{GameEvent, HitTarget};
pub use input::{Action, InputEvent, InputQueue, InputState, PRIMARY_BUTTON, TickInput};
pub use npc::OrbitController;
pub use projectile::{Projectile, ProjectileHit, ProjectileId, ProjectileSet};
pub use spatial::{BodyHandle, RayHit, Shape, SpatialIndex, Tag, Triangle};
pub use state::{Character, GameState, Npc, Transform};
pub use tick::{FixedStep, tick};
