//! GPU-ready vertex records and input-layout descriptors.
//!
//! Each material variant binds a fixed-layout vertex record; the matching
//! [`VertexLayout`] describes that record to the host's input-assembly
//! stage. The stride is a property of the layout chosen at construction
//! time, never derived from the material's runtime type.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::VertexFormat;

/// One attribute of a vertex record, addressed by shader semantic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    pub semantic: &'static str,
    pub format: VertexFormat,
    pub offset: u64,
}

/// Descriptor mapping a vertex record's byte layout to shader input slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttributeDesc>,
}

/// Position + color, for untextured debug meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexPosCol {
    pub position: Vec3,
    pub color: Vec3,
}

impl VertexPosCol {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Self>() as u64,
            attributes: vec![
                VertexAttributeDesc {
                    semantic: "POSITION",
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttributeDesc {
                    semantic: "COLOR",
                    format: VertexFormat::Float32x3,
                    offset: 12,
                },
            ],
        }
    }
}

/// Position + UV, for diffuse-only materials.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexPosTex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl VertexPosTex {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Self>() as u64,
            attributes: vec![
                VertexAttributeDesc {
                    semantic: "POSITION",
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttributeDesc {
                    semantic: "TEXCOORD",
                    format: VertexFormat::Float32x2,
                    offset: 12,
                },
            ],
        }
    }
}

/// Position + normal + tangent + UV, for the normal-mapped material.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexLit {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub uv: Vec2,
}

impl VertexLit {
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Self>() as u64,
            attributes: vec![
                VertexAttributeDesc {
                    semantic: "POSITION",
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttributeDesc {
                    semantic: "NORMAL",
                    format: VertexFormat::Float32x3,
                    offset: 12,
                },
                VertexAttributeDesc {
                    semantic: "TANGENT",
                    format: VertexFormat::Float32x3,
                    offset: 24,
                },
                VertexAttributeDesc {
                    semantic: "TEXCOORD",
                    format: VertexFormat::Float32x2,
                    offset: 36,
                },
            ],
        }
    }
}
