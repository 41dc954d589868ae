//! Player character movement and collision response
//!
//! Each tick the held input is turned into a horizontal velocity with
//! tick-based acceleration, gravity is applied while airborne, and the
//! proposed position is resolved against the elliptical bound first and the
//! fence wall second. Wall contacts come from a fan of rays cast from the
//! current position; the response pushes the character out to the clearance
//! distance and slides the remaining movement along the wall.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::input::InputState;
use super::spatial::{SpatialIndex, Tag};
use super::state::Transform;
use crate::tuning::Tuning;
use crate::yaw_forward;

/// Normals closer than this (cosine) are treated as the same plane
const SAME_PLANE_COS: f32 = 0.9999;

/// Soft vertical state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    Grounded,
    Airborne,
}

/// Per-character motion, owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub velocity: Vec3,
    /// Desired horizontal direction for this tick (not normalized until used)
    pub direction: Vec3,
    /// Current scalar ground speed
    pub speed: f32,
    pub grounded: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            direction: Vec3::ZERO,
            speed: 0.0,
            grounded: true,
        }
    }
}

impl MotionState {
    pub fn phase(&self) -> MotionPhase {
        if self.grounded {
            MotionPhase::Grounded
        } else {
            MotionPhase::Airborne
        }
    }
}

/// A wall contact found by the ray fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ray distance from the character to the wall
    pub distance: f32,
    pub point: Vec3,
    /// Unit normal pointing from the wall toward the character
    pub normal: Vec3,
}

/// How the proposed position was constrained
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionKind {
    /// Proposed position accepted unchanged
    Free,
    /// Proposed position was outside the bound and scaled back onto it
    Bound,
    /// Wall contacts pushed and slid the movement; `normal` is the nearest one
    Wall {
        normal: Vec3,
        distance: f32,
        contacts: usize,
    },
}

/// Outcome of resolving one proposed move
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub position: Vec3,
    pub kind: CollisionKind,
}

/// Turn held input into yaw and velocity (steps 1-5 of a tick).
///
/// Horizontal velocity is rebuilt from scratch every tick. Vertical velocity
/// carries over and only changes from a jump or from gravity.
pub fn apply_input(
    transform: &mut Transform,
    motion: &mut MotionState,
    input: &InputState,
    tuning: &Tuning,
) {
    motion.velocity.x = 0.0;
    motion.velocity.z = 0.0;
    motion.direction = Vec3::ZERO;

    if input.turn_left {
        transform.yaw += tuning.rotation_speed;
    }
    if input.turn_right {
        transform.yaw -= tuning.rotation_speed;
    }

    let forward = yaw_forward(transform.yaw);
    if input.forward {
        motion.direction += forward;
    }
    if input.backward {
        motion.direction -= forward;
    }

    let target_speed = if input.sprint {
        tuning.sprint_speed
    } else {
        tuning.walk_speed
    };

    if motion.direction.length_squared() > 0.0 {
        let step = if input.sprint {
            tuning.acceleration * 2.0
        } else {
            tuning.acceleration
        };
        motion.speed = target_speed.min(motion.speed + step);
    } else {
        motion.speed = (motion.speed - tuning.deceleration).max(0.0);
    }

    if motion.direction.length_squared() > 0.0 {
        let dir = motion.direction.normalize();
        motion.velocity.x = dir.x * motion.speed;
        motion.velocity.z = dir.z * motion.speed;
    }

    if input.jump && motion.grounded {
        motion.velocity.y = tuning.jump_impulse;
        motion.grounded = false;
    }

    if !motion.grounded {
        motion.velocity.y -= tuning.gravity;
    }
}

/// Directions of the ray fan: evenly spaced around the full circle
pub fn ray_fan(count: u32) -> impl Iterator<Item = Vec3> {
    (0..count).map(move |i| {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
        Vec3::new(angle.cos(), 0.0, angle.sin())
    })
}

/// Wall contacts within clearance of `current`, nearest first.
///
/// One candidate per ray (its nearest wall hit); the fan is cast from the
/// current position plus one ray along the movement. Contacts on the same
/// plane collapse into the nearest one, and each normal is oriented toward
/// the character.
pub fn wall_contacts(
    spatial: &SpatialIndex,
    current: Vec3,
    proposed: Vec3,
    tuning: &Tuning,
) -> Vec<Contact> {
    let clearance = tuning.wall_clearance();
    let movement_dir = (proposed - current).normalize_or_zero();

    let mut contacts: Vec<Contact> = Vec::new();
    let rays = ray_fan(tuning.collision_rays)
        .chain((movement_dir != Vec3::ZERO).then_some(movement_dir));

    for dir in rays {
        let Some(hit) = spatial.cast_ray_nearest(current, dir, &[Tag::Wall], None) else {
            continue;
        };
        if hit.distance >= clearance {
            continue;
        }
        let Some(mut normal) = hit.normal else {
            continue;
        };
        if (current - hit.point).dot(normal) < 0.0 {
            normal = -normal;
        }
        contacts.push(Contact {
            distance: hit.distance,
            point: hit.point,
            normal,
        });
    }

    contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut distinct: Vec<Contact> = Vec::with_capacity(contacts.len());
    for contact in contacts {
        if distinct
            .iter()
            .all(|c| c.normal.dot(contact.normal) < SAME_PLANE_COS)
        {
            distinct.push(contact);
        }
    }
    distinct
}

/// Push-out and slide against a single contact.
///
/// Returns `(push, slide)`; the committed position is `current + push + slide`.
pub fn slide_against(contact: &Contact, movement: Vec3, clearance: f32) -> (Vec3, Vec3) {
    let n = contact.normal;
    let dot = movement.dot(n);
    let push = n * (clearance - contact.distance).max(0.0);

    if push.length_squared() > 0.0 {
        // Too close: push out, then keep only the along-wall part of the move
        let slide = if movement.length_squared() > 0.0 {
            movement - n * dot
        } else {
            Vec3::ZERO
        };
        (push, slide)
    } else {
        // Touching: drop only the part of the move that heads into the wall
        (Vec3::ZERO, movement - n * dot.min(0.0))
    }
}

/// Resolve contacts in sequence.
///
/// The nearest contact is handled by `slide_against`. Further contacts add
/// whatever push-out they still need and clip the slide, repeating passes
/// until the slide heads into none of them or `iterations` passes ran out;
/// in that case the horizontal slide is dropped.
pub fn resolve_contacts(
    current: Vec3,
    movement: Vec3,
    contacts: &[Contact],
    tuning: &Tuning,
) -> Vec3 {
    let Some(first) = contacts.first() else {
        return current + movement;
    };
    let clearance = tuning.wall_clearance();
    let (mut push, mut slide) = slide_against(first, movement, clearance);
    if contacts.len() == 1 {
        return current + push + slide;
    }

    for contact in &contacts[1..] {
        let gap = (current + push - contact.point).dot(contact.normal);
        push += contact.normal * (clearance - gap).max(0.0);
    }

    let mut settled = false;
    for _ in 0..tuning.resolve_iterations {
        let mut clipped = false;
        for contact in contacts {
            let into = slide.dot(contact.normal);
            if into < -1e-6 {
                slide -= contact.normal * into;
                clipped = true;
            }
        }
        if !clipped {
            settled = true;
            break;
        }
    }
    if !settled {
        log::trace!("Contact resolution hit iteration cap, dropping slide");
        slide.x = 0.0;
        slide.z = 0.0;
    }

    current + push + slide
}

/// Constrain a proposed move (step 7 of a tick).
///
/// The bound is checked first and short-circuits wall checks. A wall
/// response that would leave the bound is scaled back onto it.
pub fn resolve_movement(
    arena: &Arena,
    spatial: &SpatialIndex,
    current: Vec3,
    proposed: Vec3,
    tuning: &Tuning,
) -> Resolution {
    if !arena.bound.contains(proposed) {
        return Resolution {
            position: arena.bound.clamp(proposed),
            kind: CollisionKind::Bound,
        };
    }

    let contacts = wall_contacts(spatial, current, proposed, tuning);
    let Some(nearest) = contacts.first().copied() else {
        return Resolution {
            position: proposed,
            kind: CollisionKind::Free,
        };
    };

    let safe = resolve_contacts(current, proposed - current, &contacts, tuning);
    Resolution {
        position: arena.bound.clamp(safe),
        kind: CollisionKind::Wall {
            normal: nearest.normal,
            distance: nearest.distance,
            contacts: contacts.len(),
        },
    }
}

/// Advance one character by a tick: input, integration, collision, ground clamp
pub fn step(
    transform: &mut Transform,
    motion: &mut MotionState,
    input: &InputState,
    arena: &Arena,
    spatial: &SpatialIndex,
    tuning: &Tuning,
) -> Resolution {
    apply_input(transform, motion, input, tuning);

    let current = transform.position;
    let proposed = current + motion.velocity;
    let resolution = resolve_movement(arena, spatial, current, proposed, tuning);
    transform.position = resolution.position;

    if transform.position.y <= tuning.ground_height {
        transform.position.y = tuning.ground_height;
        motion.velocity.y = 0.0;
        motion.grounded = true;
    }

    resolution
}

/// Where and in which direction a projectile leaves the character
pub fn muzzle(transform: &Transform, tuning: &Tuning) -> (Vec3, Vec3) {
    let position = transform.position + Vec3::Y * tuning.projectile_spawn_height;
    (position, yaw_forward(transform.yaw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spatial::{Shape, Triangle};
    use proptest::prelude::*;

    fn standing() -> (Transform, MotionState) {
        (
            Transform::new(Vec3::new(0.0, 1.0, 0.0), 0.0),
            MotionState::default(),
        )
    }

    fn open_field() -> (Arena, SpatialIndex) {
        (Arena::from_tuning(&Tuning::default()), SpatialIndex::new())
    }

    fn fenced() -> (Arena, SpatialIndex) {
        let arena = Arena::from_tuning(&Tuning::default());
        let mut spatial = SpatialIndex::new();
        spatial.register(Tag::Wall, Shape::mesh(arena.fence_triangles()));
        (arena, spatial)
    }

    /// Vertical wall quad in the plane x = `x`
    fn wall_at_x(x: f32) -> Shape {
        let a = Vec3::new(x, 0.0, -10.0);
        let b = Vec3::new(x, 0.0, 10.0);
        let c = Vec3::new(x, 10.0, -10.0);
        let d = Vec3::new(x, 10.0, 10.0);
        Shape::mesh(vec![Triangle::new(a, c, b), Triangle::new(c, d, b)])
    }

    /// Vertical wall quad in the plane z = `z`
    fn wall_at_z(z: f32) -> Shape {
        let a = Vec3::new(-10.0, 0.0, z);
        let b = Vec3::new(10.0, 0.0, z);
        let c = Vec3::new(-10.0, 10.0, z);
        let d = Vec3::new(10.0, 10.0, z);
        Shape::mesh(vec![Triangle::new(a, c, b), Triangle::new(c, d, b)])
    }

    fn hold(forward: bool, sprint: bool) -> InputState {
        InputState {
            forward,
            sprint,
            ..Default::default()
        }
    }

    #[test]
    fn test_walk_ramps_up_to_walk_speed() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();

        let mut speeds = Vec::new();
        for _ in 0..15 {
            step(&mut t, &mut m, &hold(true, false), &arena, &spatial, &tuning);
            speeds.push(m.speed);
        }
        assert!((speeds[0] - 0.01).abs() < 1e-6);
        assert!(speeds.windows(2).all(|w| w[1] >= w[0]));
        assert!((speeds[14] - tuning.walk_speed).abs() < 1e-6);
        // Facing +Z at yaw 0
        assert!(t.position.z > 0.0);
        assert!(t.position.x.abs() < 1e-5);
    }

    #[test]
    fn test_sprint_accelerates_twice_as_fast() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        step(&mut t, &mut m, &hold(true, true), &arena, &spatial, &tuning);
        assert!((m.speed - 0.02).abs() < 1e-6);
        for _ in 0..20 {
            step(&mut t, &mut m, &hold(true, true), &arena, &spatial, &tuning);
        }
        assert!((m.speed - tuning.sprint_speed).abs() < 1e-6);
    }

    #[test]
    fn test_releasing_sprint_caps_speed_at_walk() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        for _ in 0..20 {
            step(&mut t, &mut m, &hold(true, true), &arena, &spatial, &tuning);
        }
        step(&mut t, &mut m, &hold(true, false), &arena, &spatial, &tuning);
        assert!((m.speed - tuning.walk_speed).abs() < 1e-6);
    }

    #[test]
    fn test_no_input_decelerates_and_stays_put() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        for _ in 0..10 {
            step(&mut t, &mut m, &hold(true, false), &arena, &spatial, &tuning);
        }
        let rest = t.position;
        let mut last = m.speed;
        for _ in 0..10 {
            step(&mut t, &mut m, &InputState::default(), &arena, &spatial, &tuning);
            assert!(m.speed <= last);
            last = m.speed;
            assert_eq!(t.position, rest);
        }
        assert_eq!(m.speed, 0.0);
    }

    #[test]
    fn test_forward_and_backward_cancel() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        let input = InputState {
            forward: true,
            backward: true,
            ..Default::default()
        };
        step(&mut t, &mut m, &input, &arena, &spatial, &tuning);
        assert_eq!(m.speed, 0.0);
        assert_eq!(t.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_turning_changes_yaw_only() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        let left = InputState {
            turn_left: true,
            ..Default::default()
        };
        step(&mut t, &mut m, &left, &arena, &spatial, &tuning);
        assert!((t.yaw - 0.05).abs() < 1e-6);
        assert_eq!(t.position, Vec3::new(0.0, 1.0, 0.0));

        let right = InputState {
            turn_right: true,
            ..Default::default()
        };
        step(&mut t, &mut m, &right, &arena, &spatial, &tuning);
        step(&mut t, &mut m, &right, &arena, &spatial, &tuning);
        assert!((t.yaw + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_backward_moves_against_facing() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        let input = InputState {
            backward: true,
            ..Default::default()
        };
        step(&mut t, &mut m, &input, &arena, &spatial, &tuning);
        assert!((t.position.z + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_jump_arc_lands_exactly_on_ground() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        let jump = InputState {
            jump: true,
            ..Default::default()
        };

        step(&mut t, &mut m, &jump, &arena, &spatial, &tuning);
        assert_eq!(m.phase(), MotionPhase::Airborne);
        assert!((m.velocity.y - (0.15 - 0.006)).abs() < 1e-6);
        assert!(t.position.y > 1.0);

        let mut ticks = 1;
        while !m.grounded {
            step(&mut t, &mut m, &InputState::default(), &arena, &spatial, &tuning);
            ticks += 1;
            assert!(ticks < 200, "never landed");
        }
        assert_eq!(t.position.y, 1.0);
        assert_eq!(m.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let (mut t, mut m) = standing();
        let jump = InputState {
            jump: true,
            ..Default::default()
        };
        step(&mut t, &mut m, &jump, &arena, &spatial, &tuning);
        let vy = m.velocity.y;

        // Holding jump mid-air only lets gravity act
        step(&mut t, &mut m, &jump, &arena, &spatial, &tuning);
        assert!((m.velocity.y - (vy - tuning.gravity)).abs() < 1e-6);
        step(&mut t, &mut m, &jump, &arena, &spatial, &tuning);
        assert!((m.velocity.y - (vy - 2.0 * tuning.gravity)).abs() < 1e-6);
    }

    #[test]
    fn test_ground_clamp_from_below() {
        let tuning = Tuning::default();
        let (arena, spatial) = open_field();
        let mut t = Transform::new(Vec3::new(0.0, 0.2, 0.0), 0.0);
        let mut m = MotionState {
            velocity: Vec3::new(0.0, -0.5, 0.0),
            grounded: false,
            ..Default::default()
        };
        step(&mut t, &mut m, &InputState::default(), &arena, &spatial, &tuning);
        assert_eq!(t.position.y, 1.0);
        assert_eq!(m.velocity.y, 0.0);
        assert!(m.grounded);
    }

    #[test]
    fn test_bound_violation_clamps_radially() {
        let tuning = Tuning::default();
        let (arena, spatial) = fenced();
        let current = Vec3::new(44.4, 1.0, 0.0);
        let proposed = Vec3::new(44.6, 1.0, 0.0);
        let r = resolve_movement(&arena, &spatial, current, proposed, &tuning);
        assert_eq!(r.kind, CollisionKind::Bound);
        assert!((r.position.x - 44.5).abs() < 1e-4);
        assert_eq!(r.position.y, 1.0);
        assert!(arena.bound.contains(r.position));
    }

    #[test]
    fn test_free_move_far_from_walls() {
        let tuning = Tuning::default();
        let (arena, spatial) = fenced();
        let current = Vec3::new(0.0, 1.0, 0.0);
        let proposed = Vec3::new(0.1, 1.0, 0.0);
        let r = resolve_movement(&arena, &spatial, current, proposed, &tuning);
        assert_eq!(r.kind, CollisionKind::Free);
        assert_eq!(r.position, proposed);
    }

    #[test]
    fn test_wall_pushes_out_and_slides() {
        let tuning = Tuning::default();
        let arena = Arena::from_tuning(&tuning);
        let mut spatial = SpatialIndex::new();
        spatial.register(Tag::Wall, wall_at_x(0.5));

        let current = Vec3::new(0.0, 1.0, 0.0);
        // Diagonal move toward the wall
        let proposed = Vec3::new(0.1, 1.0, 0.1);
        let r = resolve_movement(&arena, &spatial, current, proposed, &tuning);

        let CollisionKind::Wall {
            normal,
            distance,
            contacts,
        } = r.kind
        else {
            panic!("expected wall contact, got {:?}", r.kind);
        };
        assert_eq!(contacts, 1);
        assert!((normal - -Vec3::X).length() < 1e-5);
        assert!((distance - 0.5).abs() < 1e-4);

        // Pushed out to clearance (1.1 - 0.5 = 0.6) and slid along z
        assert!((r.position.x + 0.6).abs() < 1e-4);
        assert!((r.position.z - 0.1).abs() < 1e-5);
        assert_eq!(r.position.y, 1.0);
        // Offset along the normal is away from the wall
        assert!((r.position - current).dot(normal) >= 0.0);
    }

    #[test]
    fn test_wall_behind_character_still_oriented_toward_character() {
        let tuning = Tuning::default();
        let arena = Arena::from_tuning(&tuning);
        let mut spatial = SpatialIndex::new();
        spatial.register(Tag::Wall, wall_at_x(-0.5));

        let current = Vec3::new(0.0, 1.0, 0.0);
        let r = resolve_movement(&arena, &spatial, current, current, &tuning);
        let CollisionKind::Wall { normal, .. } = r.kind else {
            panic!("expected wall contact");
        };
        assert!((normal - Vec3::X).length() < 1e-5);
        assert!(r.position.x > 0.5);
    }

    #[test]
    fn test_corner_blocks_motion_into_both_walls() {
        let tuning = Tuning::default();
        let arena = Arena::from_tuning(&tuning);
        let mut spatial = SpatialIndex::new();
        spatial.register(Tag::Wall, wall_at_x(1.0));
        spatial.register(Tag::Wall, wall_at_z(1.0));

        let current = Vec3::new(0.0, 1.0, 0.0);
        let proposed = Vec3::new(0.15, 1.0, 0.15);
        let r = resolve_movement(&arena, &spatial, current, proposed, &tuning);
        let CollisionKind::Wall { contacts, .. } = r.kind else {
            panic!("expected wall contact");
        };
        assert_eq!(contacts, 2);
        // Neither wall is approached past clearance
        assert!(1.0 - r.position.x >= tuning.wall_clearance() - 1e-4);
        assert!(1.0 - r.position.z >= tuning.wall_clearance() - 1e-4);
    }

    /// Wall behind on -X, a diagonal wall ahead-right, a wall behind on -Z.
    /// The diagonal clip turns the slide back toward the first wall, so a
    /// single pass cannot settle.
    fn wedge_contacts(current: Vec3) -> Vec<Contact> {
        let diagonal = Vec3::new(1.0, 0.0, -1.0).normalize();
        vec![
            Contact {
                distance: 0.5,
                point: current - Vec3::X * 0.5,
                normal: Vec3::X,
            },
            Contact {
                distance: 1.0,
                point: current - diagonal,
                normal: diagonal,
            },
            Contact {
                distance: 1.0,
                point: current - Vec3::Z,
                normal: Vec3::Z,
            },
        ]
    }

    #[test]
    fn test_iteration_cap_drops_horizontal_slide() {
        let tuning = Tuning {
            resolve_iterations: 1,
            ..Default::default()
        };
        let clearance = tuning.wall_clearance();
        let current = Vec3::new(0.0, 1.0, 0.0);
        let movement = Vec3::new(-0.1, 0.0, 0.15);
        let contacts = wedge_contacts(current);

        let resolved = resolve_contacts(current, movement, &contacts, &tuning);

        // Only the push-outs: 0.6 off the -X wall, 0.1 off the -Z wall
        assert!((resolved - Vec3::new(0.6, 1.0, 0.1)).length() < 1e-5);
        for c in &contacts {
            assert!((resolved - c.point).dot(c.normal) >= clearance - 1e-5);
        }
    }

    #[test]
    fn test_enough_iterations_keep_the_slide() {
        let tuning = Tuning::default();
        let current = Vec3::new(0.0, 1.0, 0.0);
        let movement = Vec3::new(-0.1, 0.0, 0.15);
        let contacts = wedge_contacts(current);

        let resolved = resolve_contacts(current, movement, &contacts, &tuning);

        // Settles on the second pass, sliding along the diagonal wall
        assert!((resolved - Vec3::new(0.675, 1.0, 0.175)).length() < 1e-4);
        for c in &contacts {
            assert!((resolved - c.point).dot(c.normal) >= tuning.wall_clearance() - 1e-5);
        }
    }

    #[test]
    fn test_fence_keeps_clearance_when_running_into_it() {
        let tuning = Tuning::default();
        let (arena, spatial) = fenced();
        let mut t = Transform::new(Vec3::new(40.0, 1.0, 0.0), std::f32::consts::FRAC_PI_2);
        let mut m = MotionState::default();
        for _ in 0..200 {
            step(&mut t, &mut m, &hold(true, true), &arena, &spatial, &tuning);
            assert!(arena.bound.contains(t.position));
        }
        // Settles within one tick of travel from the clearance distance
        assert!(t.position.x < 45.0 - tuning.wall_clearance() + tuning.sprint_speed + 0.05);
        assert!(t.position.x > 43.0);
    }

    #[test]
    fn test_muzzle_uses_facing_and_height() {
        let tuning = Tuning::default();
        let t = Transform::new(Vec3::new(2.0, 1.0, 3.0), std::f32::consts::FRAC_PI_2);
        let (pos, dir) = muzzle(&t, &tuning);
        assert!((pos - Vec3::new(2.0, 2.0, 3.0)).length() < 1e-6);
        assert!((dir - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_ray_fan_is_unit_and_horizontal() {
        let dirs: Vec<Vec3> = ray_fan(16).collect();
        assert_eq!(dirs.len(), 16);
        for d in dirs {
            assert_eq!(d.y, 0.0);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }

    fn input_strategy() -> impl Strategy<Value = InputState> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(forward, backward, turn_left, turn_right, jump, sprint)| InputState {
                forward,
                backward,
                turn_left,
                turn_right,
                jump,
                sprint,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_position_stays_inside_bound(
            inputs in prop::collection::vec(input_strategy(), 1..200),
            start_x in -30.0f32..30.0,
            start_z in -20.0f32..20.0,
            yaw in -3.1f32..3.1,
        ) {
            let tuning = Tuning::default();
            let (arena, spatial) = fenced();
            let mut t = Transform::new(Vec3::new(start_x, 1.0, start_z), yaw);
            let mut m = MotionState::default();
            for input in &inputs {
                step(&mut t, &mut m, input, &arena, &spatial, &tuning);
                let e = t.position.x.powi(2) / 45.0f32.powi(2) + t.position.z.powi(2) / 30.0f32.powi(2);
                prop_assert!(e <= 1.0);
                prop_assert!(arena.bound.contains(t.position));
                prop_assert!(t.position.y >= tuning.ground_height);
            }
        }

        #[test]
        fn prop_speed_never_negative_or_above_sprint(
            inputs in prop::collection::vec(input_strategy(), 1..200),
        ) {
            let tuning = Tuning::default();
            let (arena, spatial) = open_field();
            let (mut t, mut m) = standing();
            for input in &inputs {
                step(&mut t, &mut m, input, &arena, &spatial, &tuning);
                prop_assert!(m.speed >= 0.0);
                prop_assert!(m.speed <= tuning.sprint_speed + 1e-6);
            }
        }

        #[test]
        fn prop_holding_forward_is_monotonic(ticks in 1usize..60, sprint in any::<bool>()) {
            let tuning = Tuning::default();
            let (arena, spatial) = open_field();
            let (mut t, mut m) = standing();
            let target = if sprint { tuning.sprint_speed } else { tuning.walk_speed };
            let mut last = 0.0;
            for _ in 0..ticks {
                step(&mut t, &mut m, &hold(true, sprint), &arena, &spatial, &tuning);
                prop_assert!(m.speed >= last);
                prop_assert!(m.speed <= target + 1e-6);
                last = m.speed;
            }
        }
    }
}
