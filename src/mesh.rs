//! Mesh orchestration and the per-frame draw protocol.
//!
//! A mesh binds one parsed geometry to one [`TechniqueSet`] and its
//! textures, owns a small local animation state (translation plus an
//! optional time-accumulated Y rotation) and emits its draw as an ordered
//! protocol through a [`DrawContext`], independent of the graphics API.
//!
//! The material is a closed set of variants; each variant fixes the vertex
//! layout, the matrices it binds and the texture slots it fills. The
//! vertex stride is stored on the mesh at construction and never derived
//! from the material at draw time.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use wgpu::PrimitiveTopology;

use crate::camera::Camera;
use crate::device::{BufferHandle, DrawContext, RenderDevice, ShaderProgram, TextureHandle};
use crate::errors::Result;
use crate::geometry::{VertexLayout, VertexLit, VertexPosCol, VertexPosTex};
use crate::obj::ObjMesh;
use crate::technique::{CullMode, SamplerFilter, TechniqueSet, TechniqueVariants};
use crate::texture::Image;

// Shader parameter names, as compiled into the effect files.
const PARAM_WORLD_VIEW_PROJ: &str = "gWorldViewProj";
const PARAM_WORLD: &str = "gWorldMatrix";
const PARAM_VIEW_INVERSE: &str = "gViewInverseMatrix";
const PARAM_DIFFUSE_MAP: &str = "gDiffuseMap";
const PARAM_NORMAL_MAP: &str = "gNormalMap";
const PARAM_SPECULAR_MAP: &str = "gSpecularMap";
const PARAM_GLOSSINESS_MAP: &str = "gGlossinessMap";

/// Spin rate while rotation is enabled, radians per second.
const ANGULAR_RATE: f32 = FRAC_PI_2;

/// Which material variant a mesh was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Vertex colors, no textures.
    Basic,
    /// Diffuse map only.
    Textured,
    /// Diffuse + normal + specular + glossiness maps; exposes the
    /// culling axis.
    NormalMapped,
}

/// The four maps of the normal-mapped material.
#[derive(Debug, Clone, Copy)]
pub struct MaterialMaps<'a> {
    pub diffuse: &'a Image,
    pub normal: &'a Image,
    pub specular: &'a Image,
    pub glossiness: &'a Image,
}

/// One drawable mesh: immutable GPU buffers, a technique set, textures
/// and local transform state.
pub struct Mesh {
    material: MaterialKind,
    layout: VertexLayout,
    stride: u64,

    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    index_count: u32,

    techniques: TechniqueSet,
    textures: Vec<TextureHandle>,

    position: Vec3,
    rotation_enabled: bool,
    rotation_seconds: f32,
}

impl Mesh {
    /// Builds an untextured vertex-color mesh.
    pub fn basic(
        device: &dyn RenderDevice,
        program: Box<dyn ShaderProgram>,
        vertices: &[VertexPosCol],
        indices: &[u32],
        position: Vec3,
    ) -> Result<Self> {
        assert!(!vertices.is_empty(), "mesh requires at least one vertex");
        assert!(!indices.is_empty(), "mesh requires at least one index");

        let layout = VertexPosCol::layout();
        let vertex_buffer =
            device.create_vertex_buffer(bytemuck::cast_slice(vertices), "BasicMeshVertices")?;
        let index_buffer = device.create_index_buffer(indices, "BasicMeshIndices")?;

        Ok(Self {
            material: MaterialKind::Basic,
            stride: layout.stride,
            layout,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            techniques: TechniqueSet::new(program, TechniqueVariants::FilterOnly),
            textures: Vec::new(),
            position,
            rotation_enabled: false,
            rotation_seconds: 0.0,
        })
    }

    /// Builds a diffuse-textured mesh from parsed geometry.
    pub fn textured(
        device: &dyn RenderDevice,
        program: Box<dyn ShaderProgram>,
        geometry: &ObjMesh,
        diffuse: &Image,
        position: Vec3,
    ) -> Result<Self> {
        assert!(!geometry.vertices.is_empty(), "mesh requires at least one vertex");
        assert!(!geometry.indices.is_empty(), "mesh requires at least one index");

        let vertices: Vec<VertexPosTex> = geometry
            .vertices
            .iter()
            .map(|v| VertexPosTex {
                position: v.position,
                uv: v.uv,
            })
            .collect();

        let layout = VertexPosTex::layout();
        let vertex_buffer =
            device.create_vertex_buffer(bytemuck::cast_slice(&vertices), "TexturedMeshVertices")?;
        let index_buffer = device.create_index_buffer(&geometry.indices, "TexturedMeshIndices")?;

        let diffuse_handle = device.create_texture(diffuse, "DiffuseMap")?;
        let mut techniques = TechniqueSet::new(program, TechniqueVariants::FilterOnly);
        techniques.bind_texture(PARAM_DIFFUSE_MAP, diffuse_handle);

        Ok(Self {
            material: MaterialKind::Textured,
            stride: layout.stride,
            layout,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            techniques,
            textures: vec![diffuse_handle],
            position,
            rotation_enabled: false,
            rotation_seconds: 0.0,
        })
    }

    /// Builds a normal-mapped mesh from parsed geometry. This is the only
    /// variant whose technique set spans the full filter × cull table.
    pub fn normal_mapped(
        device: &dyn RenderDevice,
        program: Box<dyn ShaderProgram>,
        geometry: &ObjMesh,
        maps: &MaterialMaps<'_>,
        position: Vec3,
    ) -> Result<Self> {
        assert!(!geometry.vertices.is_empty(), "mesh requires at least one vertex");
        assert!(!geometry.indices.is_empty(), "mesh requires at least one index");

        let vertices: Vec<VertexLit> = geometry
            .vertices
            .iter()
            .map(|v| VertexLit {
                position: v.position,
                normal: v.normal,
                tangent: v.tangent,
                uv: v.uv,
            })
            .collect();

        let layout = VertexLit::layout();
        let vertex_buffer =
            device.create_vertex_buffer(bytemuck::cast_slice(&vertices), "LitMeshVertices")?;
        let index_buffer = device.create_index_buffer(&geometry.indices, "LitMeshIndices")?;

        let diffuse = device.create_texture(maps.diffuse, "DiffuseMap")?;
        let normal = device.create_texture(maps.normal, "NormalMap")?;
        let specular = device.create_texture(maps.specular, "SpecularMap")?;
        let glossiness = device.create_texture(maps.glossiness, "GlossinessMap")?;

        let mut techniques = TechniqueSet::new(program, TechniqueVariants::FilterAndCull);
        techniques.bind_texture(PARAM_DIFFUSE_MAP, diffuse);
        techniques.bind_texture(PARAM_NORMAL_MAP, normal);
        techniques.bind_texture(PARAM_SPECULAR_MAP, specular);
        techniques.bind_texture(PARAM_GLOSSINESS_MAP, glossiness);

        Ok(Self {
            material: MaterialKind::NormalMapped,
            stride: layout.stride,
            layout,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            techniques,
            textures: vec![diffuse, normal, specular, glossiness],
            position,
            rotation_enabled: false,
            rotation_seconds: 0.0,
        })
    }

    /// Accumulates animation time. Must be called once per frame with a
    /// non-negative, finite elapsed time before [`render`](Self::render).
    pub fn update(&mut self, elapsed_seconds: f32) {
        debug_assert!(
            elapsed_seconds.is_finite() && elapsed_seconds >= 0.0,
            "elapsed time must be non-negative and finite"
        );
        if self.rotation_enabled {
            self.rotation_seconds += elapsed_seconds;
        }
    }

    /// Current accumulated Y rotation in radians.
    #[inline]
    pub fn yaw(&self) -> f32 {
        ANGULAR_RATE * self.rotation_seconds
    }

    /// Local transform: translation to the mesh position, then the
    /// accumulated Y rotation.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.yaw())
    }

    /// Binds this frame's matrices and emits the draw protocol.
    ///
    /// The camera is borrowed for this call only. Its stored view matrix
    /// is the camera's own world transform; it is inverted here, per mesh
    /// per frame, to produce the conventional view transform.
    pub fn render(&mut self, camera: &Camera, ctx: &mut dyn DrawContext) {
        let world = self.world_matrix();
        let view = camera.view_matrix().inverse();
        let world_view_projection = camera.projection_matrix() * view * world;

        self.techniques.bind_matrix(PARAM_WORLD_VIEW_PROJ, &world_view_projection);
        if self.material == MaterialKind::NormalMapped {
            // View-space lighting terms need the world transform and the
            // camera's own world matrix (the inverse view).
            self.techniques.bind_matrix(PARAM_WORLD, &world);
            self.techniques.bind_matrix(PARAM_VIEW_INVERSE, &camera.view_matrix());
        }

        ctx.set_topology(PrimitiveTopology::TriangleList);
        ctx.set_input_layout(&self.layout);
        ctx.set_vertex_buffer(self.vertex_buffer, self.stride);
        ctx.set_index_buffer(self.index_buffer);

        // With every technique name unresolved there is nothing to draw;
        // state setup above is harmless and rendering stays degraded, not
        // broken.
        if let Some(technique) = self.techniques.active_technique() {
            for pass in 0..self.techniques.active_pass_count() {
                ctx.apply_pass(technique, pass);
                ctx.draw_indexed(self.index_count);
            }
        }
    }

    /// Flips the rotation animation on or off.
    pub fn toggle_rotation(&mut self) -> bool {
        self.rotation_enabled = !self.rotation_enabled;
        self.rotation_enabled
    }

    #[inline]
    pub fn is_rotating(&self) -> bool {
        self.rotation_enabled
    }

    /// Advances the sampling-filter axis of the technique set.
    pub fn toggle_filter(&mut self) -> SamplerFilter {
        self.techniques.toggle_filter()
    }

    /// Advances the culling axis of the technique set.
    pub fn toggle_cull(&mut self) -> CullMode {
        self.techniques.toggle_cull()
    }

    /// Whether this mesh's material exposes the culling axis as technique
    /// variants.
    #[inline]
    pub fn exposes_culling(&self) -> bool {
        self.techniques.variants() == TechniqueVariants::FilterAndCull
    }

    #[inline]
    pub fn material(&self) -> MaterialKind {
        self.material
    }

    #[inline]
    pub fn technique_set(&self) -> &TechniqueSet {
        &self.techniques
    }

    #[inline]
    pub fn technique_set_mut(&mut self) -> &mut TechniqueSet {
        &mut self.techniques
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("material", &self.material)
            .field("index_count", &self.index_count)
            .field("stride", &self.stride)
            .field("position", &self.position)
            .field("rotation_enabled", &self.rotation_enabled)
            .finish_non_exhaustive()
    }
}
