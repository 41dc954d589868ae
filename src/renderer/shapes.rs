//! Mesh generation for scene primitives
//!
//! Everything is emitted as world-space triangle lists. Characters are drawn
//! as placeholder box rigs; there are no model assets to load or fail.

use glam::Vec3;

use super::vertex::{Vertex, colors};
use crate::rotate_y;
use crate::sim::{Arena, GameState, Projectile, Transform};

/// Projectile box half extents (long axis along travel)
const PROJECTILE_HALF: Vec3 = Vec3::new(0.08, 0.08, 0.3);

/// Ground margin beyond the fence
const GROUND_MARGIN: f32 = 10.0;

fn quad(out: &mut Vec<Vertex>, corners: [Vec3; 4], normal: Vec3, color: [f32; 4]) {
    let [a, b, c, d] = corners;
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::new(p, normal, color));
    }
}

/// Flat ground rectangle at y = 0 covering the arena
pub fn ground(arena: &Arena) -> Vec<Vertex> {
    let hx = arena.fence.radius_x + GROUND_MARGIN;
    let hz = arena.fence.radius_z + GROUND_MARGIN;
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        [
            Vec3::new(-hx, 0.0, -hz),
            Vec3::new(-hx, 0.0, hz),
            Vec3::new(hx, 0.0, hz),
            Vec3::new(hx, 0.0, -hz),
        ],
        Vec3::Y,
        colors::GROUND,
    );
    vertices
}

/// Fence wall, the same triangles the collision queries use, shaded inward
pub fn fence(arena: &Arena) -> Vec<Vertex> {
    let triangles = arena.fence_triangles();
    let mut vertices = Vec::with_capacity(triangles.len() * 3);
    for tri in &triangles {
        let mut normal = tri.normal();
        let center = (tri.a + tri.b + tri.c) / 3.0;
        if normal.dot(Vec3::new(center.x, 0.0, center.z)) > 0.0 {
            normal = -normal;
        }
        for p in [tri.a, tri.b, tri.c] {
            vertices.push(Vertex::new(p, normal, colors::FENCE));
        }
    }
    vertices
}

/// Box rotated by `yaw` about its center. The local +Z face gets `front`.
pub fn oriented_box(
    center: Vec3,
    half: Vec3,
    yaw: f32,
    front: [f32; 4],
    body: [f32; 4],
) -> Vec<Vertex> {
    let h = half;
    // (normal, four corners) per face in local space
    let faces = [
        (
            Vec3::Z,
            [
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
            ],
        ),
        (
            -Vec3::Z,
            [
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(-h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
            ],
        ),
        (
            Vec3::X,
            [
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(h.x, h.y, -h.z),
                Vec3::new(h.x, h.y, h.z),
            ],
        ),
        (
            -Vec3::X,
            [
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(-h.x, -h.y, h.z),
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(-h.x, h.y, -h.z),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-h.x, h.y, h.z),
                Vec3::new(h.x, h.y, h.z),
                Vec3::new(h.x, h.y, -h.z),
                Vec3::new(-h.x, h.y, -h.z),
            ],
        ),
        (
            -Vec3::Y,
            [
                Vec3::new(-h.x, -h.y, -h.z),
                Vec3::new(h.x, -h.y, -h.z),
                Vec3::new(h.x, -h.y, h.z),
                Vec3::new(-h.x, -h.y, h.z),
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let color = if normal == Vec3::Z { front } else { body };
        quad(
            &mut vertices,
            corners.map(|c| center + rotate_y(c, yaw)),
            rotate_y(normal, yaw),
            color,
        );
    }
    vertices
}

/// Placeholder rig for a character standing at `transform`
pub fn character_rig(
    transform: &Transform,
    half: Vec3,
    front: [f32; 4],
    body: [f32; 4],
) -> Vec<Vertex> {
    oriented_box(transform.position, half, transform.yaw, front, body)
}

pub fn projectile(p: &Projectile) -> Vec<Vertex> {
    let yaw = crate::yaw_from_direction(p.direction);
    oriented_box(
        p.position,
        PROJECTILE_HALF,
        yaw,
        colors::PROJECTILE,
        colors::PROJECTILE,
    )
}

/// Static geometry, built once
pub fn static_scene(arena: &Arena) -> Vec<Vertex> {
    let mut vertices = ground(arena);
    vertices.extend(fence(arena));
    vertices
}

/// Moving geometry, rebuilt every frame
pub fn dynamic_scene(state: &GameState) -> Vec<Vertex> {
    let half = state.tuning.character_half_extents;
    let mut vertices = Vec::with_capacity(72 + state.projectiles.len() * 36);

    if let Some(player) = &state.player {
        vertices.extend(character_rig(
            &player.transform,
            half,
            colors::RIG_FRONT,
            colors::RIG_BODY,
        ));
    }
    if let Some(npc) = &state.npc {
        vertices.extend(character_rig(
            &npc.transform,
            half,
            colors::NPC_FRONT,
            colors::NPC_BODY,
        ));
    }
    for p in state.projectiles.iter() {
        vertices.extend(projectile(p));
    }
    vertices
}
