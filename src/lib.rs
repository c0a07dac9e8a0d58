//! Vantage — a real-time textured-mesh scene viewer core.
//!
//! The crate owns the math- and state-heavy parts of a small 3D viewer:
//! a free-look [`Camera`], OBJ-subset geometry ingestion with per-vertex
//! tangent derivation ([`obj`]), and the sampler-filter × cull-mode
//! technique state machine ([`TechniqueSet`]) that drives per-frame draw
//! emission from a [`Mesh`].
//!
//! GPU resource creation, shader compilation and presentation stay outside:
//! the host supplies them through the [`device`] collaborator traits and
//! receives the draw protocol through a [`device::DrawContext`].

pub mod camera;
pub mod device;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod obj;
pub mod scene;
pub mod technique;
pub mod texture;

pub use camera::{Camera, LookInput, MoveDirections};
pub use device::{BufferHandle, DrawContext, RenderDevice, ShaderProgram, TechniqueHandle, TextureHandle};
pub use errors::{Result, ViewerError};
pub use geometry::{VertexAttributeDesc, VertexLayout, VertexLit, VertexPosCol, VertexPosTex};
pub use input::InputState;
pub use mesh::{MaterialKind, MaterialMaps, Mesh};
pub use obj::{ObjMesh, VertexIn};
pub use scene::Scene;
pub use technique::{CullMode, SamplerFilter, TechniqueSet, TechniqueVariants};
pub use texture::Image;
