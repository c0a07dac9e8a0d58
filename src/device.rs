//! Collaborator traits at the GPU seam.
//!
//! The viewer core never owns a device, swap chain or compiled shader; it
//! talks to them through these traits. Handles are opaque tokens minted by
//! the host — the core only stores and passes them back.

use glam::Mat4;
use wgpu::PrimitiveTopology;

use crate::errors::Result;
use crate::geometry::VertexLayout;
use crate::texture::Image;

/// Opaque handle to a host-owned GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque handle to a host-owned GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Opaque handle to one precompiled shader technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TechniqueHandle(pub u64);

/// Host-side resource factory: creates immutable buffers and textures.
///
/// A denied allocation surfaces as a typed error; the requesting component
/// propagates it rather than substituting a default.
pub trait RenderDevice {
    fn create_vertex_buffer(&self, contents: &[u8], label: &str) -> Result<BufferHandle>;
    fn create_index_buffer(&self, indices: &[u32], label: &str) -> Result<BufferHandle>;
    fn create_texture(&self, image: &Image, label: &str) -> Result<TextureHandle>;
}

/// A compiled shader program with named techniques and parameters.
///
/// Technique resolution is by name and may fail (returns `None`); parameter
/// setters are only called after [`has_parameter`](Self::has_parameter)
/// confirms the slot exists, so hosts may treat unknown names as a bug.
pub trait ShaderProgram {
    /// Resolves a technique by name; `None` when the program has no such
    /// technique.
    fn technique(&self, name: &str) -> Option<TechniqueHandle>;

    /// Number of passes in the given technique.
    fn pass_count(&self, technique: TechniqueHandle) -> u32;

    /// Whether the program exposes a parameter with this name. Shader
    /// variants may legitimately omit optional slots (e.g. no normal map).
    fn has_parameter(&self, name: &str) -> bool;

    fn set_matrix(&mut self, name: &str, value: &Mat4);
    fn set_texture(&mut self, name: &str, texture: TextureHandle);
}

/// Per-frame draw-protocol sink.
///
/// A [`Mesh`](crate::mesh::Mesh) emits its draw as an ordered sequence of
/// these calls; the host maps them onto its graphics API (or records them,
/// in tests).
pub trait DrawContext {
    fn set_topology(&mut self, topology: PrimitiveTopology);
    fn set_input_layout(&mut self, layout: &VertexLayout);
    fn set_vertex_buffer(&mut self, buffer: BufferHandle, stride: u64);
    fn set_index_buffer(&mut self, buffer: BufferHandle);
    fn apply_pass(&mut self, technique: TechniqueHandle, pass: u32);
    fn draw_indexed(&mut self, index_count: u32);
}
