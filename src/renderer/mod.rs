//! WebGPU rendering module
//!
//! Flat-shaded triangle lists with a depth buffer. Static arena geometry is
//! uploaded once; characters and projectiles are rebuilt every frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
