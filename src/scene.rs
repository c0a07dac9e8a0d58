//! Thin scene orchestrator.
//!
//! Owns the camera and the meshes, forwards the per-frame update/render
//! calls in order, and routes input toggles: rotation and sampling affect
//! every mesh, culling only the meshes whose material exposes that axis.
//!
//! Single-threaded by contract: toggles run in the input-handling step and
//! are fully applied (including active-technique re-resolution) before the
//! same frame's render reads the handle.

use log::info;

use crate::camera::{Camera, LookInput, MoveDirections};
use crate::device::DrawContext;
use crate::mesh::Mesh;

pub struct Scene {
    camera: Camera,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            meshes: Vec::new(),
        }
    }

    /// Adds a mesh and returns its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Advances the camera and every mesh by one frame.
    pub fn update(&mut self, elapsed_seconds: f32, movement: MoveDirections, look: LookInput) {
        self.camera.update(elapsed_seconds, movement, look);
        for mesh in &mut self.meshes {
            mesh.update(elapsed_seconds);
        }
    }

    /// Emits every mesh's draw protocol. The camera is lent to each mesh
    /// for the duration of its render call only.
    pub fn render(&mut self, ctx: &mut dyn DrawContext) {
        for mesh in &mut self.meshes {
            mesh.render(&self.camera, ctx);
        }
    }

    /// Flips rotation on every mesh.
    pub fn toggle_rotation(&mut self) {
        let mut enabled = false;
        for mesh in &mut self.meshes {
            enabled = mesh.toggle_rotation();
        }
        info!("rotation {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Advances the sampling filter on every mesh.
    pub fn toggle_filter(&mut self) {
        let mut filter = None;
        for mesh in &mut self.meshes {
            filter = Some(mesh.toggle_filter());
        }
        if let Some(filter) = filter {
            info!("sampler filter: {filter:?}");
        }
    }

    /// Advances the culling mode on the meshes that expose it.
    pub fn toggle_cull(&mut self) {
        let mut cull = None;
        for mesh in &mut self.meshes {
            if mesh.exposes_culling() {
                cull = Some(mesh.toggle_cull());
            }
        }
        if let Some(cull) = cull {
            info!("cull mode: {cull:?}");
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }
}
