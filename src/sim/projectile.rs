//! Straight-line projectiles
//!
//! Projectiles move a fixed distance per tick along the direction they were
//! fired in and probe ahead with a ray. A hit closer than the impact distance
//! despawns the projectile. They have no lifetime limit: one that never hits
//! anything keeps flying.

use std::collections::BTreeMap;

use glam::Vec3;

use super::events::HitTarget;
use super::spatial::{BodyHandle, SpatialIndex, Tag};
use crate::tuning::Tuning;

pub type ProjectileId = u32;

/// Bodies a projectile can strike
pub const PROJECTILE_TARGETS: [Tag; 3] = [Tag::Wall, Tag::Character, Tag::CirclingCharacter];

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub position: Vec3,
    /// Unit direction, fixed at spawn
    pub direction: Vec3,
    /// Body that fired it, ignored for the grace period
    pub owner: Option<BodyHandle>,
    /// Ticks advanced since spawn
    pub age_ticks: u32,
}

/// Confirmed impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub id: ProjectileId,
    pub position: Vec3,
    pub distance: f32,
    pub target: HitTarget,
}

impl Projectile {
    /// Owner is skipped by the hit probe while this holds
    pub fn in_grace(&self, grace_ticks: u32) -> bool {
        self.age_ticks <= grace_ticks
    }

    /// Move one tick and probe for an impact
    pub fn advance(&mut self, spatial: &SpatialIndex, tuning: &Tuning) -> Option<ProjectileHit> {
        self.position += self.direction * tuning.projectile_speed;
        self.age_ticks += 1;

        let exclude = if self.in_grace(tuning.projectile_owner_grace_ticks) {
            self.owner
        } else {
            None
        };
        let hit =
            spatial.cast_ray_nearest(self.position, self.direction, &PROJECTILE_TARGETS, exclude)?;

        (hit.distance < tuning.projectile_hit_distance).then_some(ProjectileHit {
            id: self.id,
            position: self.position,
            distance: hit.distance,
            target: HitTarget {
                body: hit.body,
                tag: hit.tag,
            },
        })
    }
}

/// Live projectiles keyed by id (iteration in spawn order)
#[derive(Debug, Clone)]
pub struct ProjectileSet {
    live: BTreeMap<ProjectileId, Projectile>,
    next_id: ProjectileId,
}

impl Default for ProjectileSet {
    fn default() -> Self {
        Self {
            live: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl ProjectileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a projectile; ids are never reused.
    ///
    /// Returns `None` for a zero direction.
    pub fn spawn(
        &mut self,
        position: Vec3,
        direction: Vec3,
        owner: Option<BodyHandle>,
    ) -> Option<ProjectileId> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            log::warn!("Ignoring projectile with zero direction");
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(
            id,
            Projectile {
                id,
                position,
                direction,
                owner,
                age_ticks: 0,
            },
        );
        Some(id)
    }

    /// Remove a projectile whose hit has been handled
    pub fn acknowledge_hit(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.live.remove(&id)
    }

    /// Advance every projectile one tick, removing and returning those that hit
    pub fn tick(&mut self, spatial: &SpatialIndex, tuning: &Tuning) -> Vec<ProjectileHit> {
        let hits: Vec<ProjectileHit> = self
            .live
            .values_mut()
            .filter_map(|p| p.advance(spatial, tuning))
            .collect();
        for hit in &hits {
            self.acknowledge_hit(hit.id);
        }
        hits
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.values()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
