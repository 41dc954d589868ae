//! Vertex types for flat-shaded 3D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// World-space vertex with face normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const GROUND: [f32; 4] = [0.22, 0.45, 0.2, 1.0];
    pub const FENCE: [f32; 4] = [0.55, 0.42, 0.28, 1.0];
    /// Placeholder rig: front panel
    pub const RIG_FRONT: [f32; 4] = [1.0, 0.41, 0.71, 1.0];
    /// Placeholder rig: remaining panels
    pub const RIG_BODY: [f32; 4] = [1.0, 0.9, 0.1, 1.0];
    pub const NPC_FRONT: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const NPC_BODY: [f32; 4] = [0.2, 0.35, 0.9, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 0.3, 0.1, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.53, 0.72, 0.9, 1.0];
}
