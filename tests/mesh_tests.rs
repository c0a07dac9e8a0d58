//! Mesh and Scene Tests
//!
//! Tests for:
//! - Construction through the device collaborator, including typed
//!   failure propagation
//! - Vertex stride stored at construction per material variant
//! - Rotation animation: static world matrix while disabled, monotonic
//!   yaw while enabled
//! - Draw-protocol emission order against a recording context
//! - Matrix binding (world-view-projection always, world + inverse view
//!   for the normal-mapped variant)
//! - Scene toggle routing

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use wgpu::PrimitiveTopology;

use vantage::obj::{self, ObjMesh};
use vantage::{
    BufferHandle, Camera, DrawContext, Image, LookInput, MaterialKind, MaterialMaps, Mesh,
    MoveDirections, RenderDevice, Result, Scene, ShaderProgram, TechniqueHandle, TextureHandle,
    VertexLayout, VertexPosCol, ViewerError,
};

// ============================================================================
// Test Doubles
// ============================================================================

/// Counts allocations and hands out sequential handles; optionally denies
/// buffer requests to exercise the failure path.
#[derive(Default)]
struct StubDevice {
    next_handle: Cell<u64>,
    deny_buffers: bool,
}

impl StubDevice {
    fn mint(&self) -> u64 {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        id
    }
}

impl RenderDevice for StubDevice {
    fn create_vertex_buffer(&self, _contents: &[u8], label: &str) -> Result<BufferHandle> {
        if self.deny_buffers {
            return Err(ViewerError::BufferCreate {
                label: label.to_string(),
                reason: "denied by test device".to_string(),
            });
        }
        Ok(BufferHandle(self.mint()))
    }

    fn create_index_buffer(&self, _indices: &[u32], label: &str) -> Result<BufferHandle> {
        if self.deny_buffers {
            return Err(ViewerError::BufferCreate {
                label: label.to_string(),
                reason: "denied by test device".to_string(),
            });
        }
        Ok(BufferHandle(self.mint()))
    }

    fn create_texture(&self, _image: &Image, _label: &str) -> Result<TextureHandle> {
        Ok(TextureHandle(self.mint()))
    }
}

#[derive(Default)]
struct Recorded {
    matrices: Vec<(String, Mat4)>,
}

struct StubProgram {
    techniques: HashMap<String, TechniqueHandle>,
    parameters: HashSet<String>,
    pass_count: u32,
    recorded: Rc<RefCell<Recorded>>,
}

impl StubProgram {
    /// A program exposing the full cross-product plus the filter-only
    /// names and every shader parameter the materials use.
    fn complete(pass_count: u32) -> (Box<Self>, Rc<RefCell<Recorded>>) {
        let names = [
            "PointBackCullTechnique",
            "PointFrontCullTechnique",
            "PointNoCullTechnique",
            "LinearBackCullTechnique",
            "LinearFrontCullTechnique",
            "LinearNoCullTechnique",
            "AnisotropicBackCullTechnique",
            "AnisotropicFrontCullTechnique",
            "AnisotropicNoCullTechnique",
            "PointTechnique",
            "LinearTechnique",
            "AnisotropicTechnique",
        ];
        let techniques = names
            .iter()
            .enumerate()
            .map(|(i, name)| ((*name).to_string(), TechniqueHandle(i as u64)))
            .collect();
        let parameters = [
            "gWorldViewProj",
            "gWorldMatrix",
            "gViewInverseMatrix",
            "gDiffuseMap",
            "gNormalMap",
            "gSpecularMap",
            "gGlossinessMap",
        ]
        .iter()
        .map(|n| (*n).to_string())
        .collect();
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        (
            Box::new(Self {
                techniques,
                parameters,
                pass_count,
                recorded: Rc::clone(&recorded),
            }),
            recorded,
        )
    }

    fn empty() -> Box<Self> {
        Box::new(Self {
            techniques: HashMap::new(),
            parameters: HashSet::new(),
            pass_count: 0,
            recorded: Rc::default(),
        })
    }
}

impl ShaderProgram for StubProgram {
    fn technique(&self, name: &str) -> Option<TechniqueHandle> {
        self.techniques.get(name).copied()
    }

    fn pass_count(&self, _technique: TechniqueHandle) -> u32 {
        self.pass_count
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    fn set_matrix(&mut self, name: &str, value: &Mat4) {
        self.recorded.borrow_mut().matrices.push((name.to_string(), *value));
    }

    fn set_texture(&mut self, _name: &str, _texture: TextureHandle) {}
}

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Topology(PrimitiveTopology),
    InputLayout(u64),
    VertexBuffer(BufferHandle, u64),
    IndexBuffer(BufferHandle),
    ApplyPass(TechniqueHandle, u32),
    DrawIndexed(u32),
}

#[derive(Default)]
struct RecordingContext {
    ops: Vec<Op>,
}

impl DrawContext for RecordingContext {
    fn set_topology(&mut self, topology: PrimitiveTopology) {
        self.ops.push(Op::Topology(topology));
    }

    fn set_input_layout(&mut self, layout: &VertexLayout) {
        self.ops.push(Op::InputLayout(layout.stride));
    }

    fn set_vertex_buffer(&mut self, buffer: BufferHandle, stride: u64) {
        self.ops.push(Op::VertexBuffer(buffer, stride));
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle) {
        self.ops.push(Op::IndexBuffer(buffer));
    }

    fn apply_pass(&mut self, technique: TechniqueHandle, pass: u32) {
        self.ops.push(Op::ApplyPass(technique, pass));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.ops.push(Op::DrawIndexed(index_count));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn quad_geometry() -> ObjMesh {
    let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";
    obj::parse(Cursor::new(source), false).expect("fixture parses")
}

fn white_pixel() -> Image {
    Image::from_rgba8(1, 1, vec![255, 255, 255, 255])
}

fn textured_mesh(pass_count: u32) -> (Mesh, Rc<RefCell<Recorded>>) {
    let device = StubDevice::default();
    let (program, recorded) = StubProgram::complete(pass_count);
    let mesh = Mesh::textured(&device, program, &quad_geometry(), &white_pixel(), Vec3::ZERO)
        .expect("construction succeeds");
    (mesh, recorded)
}

fn normal_mapped_mesh() -> (Mesh, Rc<RefCell<Recorded>>) {
    let device = StubDevice::default();
    let (program, recorded) = StubProgram::complete(1);
    let diffuse = white_pixel();
    let normal = white_pixel();
    let specular = white_pixel();
    let glossiness = white_pixel();
    let maps = MaterialMaps {
        diffuse: &diffuse,
        normal: &normal,
        specular: &specular,
        glossiness: &glossiness,
    };
    let mesh = Mesh::normal_mapped(&device, program, &quad_geometry(), &maps, Vec3::new(0.0, 0.0, 50.0))
        .expect("construction succeeds");
    (mesh, recorded)
}

fn test_camera() -> Camera {
    Camera::new(45.0, Vec3::new(0.0, 0.0, -50.0), 640.0 / 480.0)
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn stride_is_fixed_per_material_variant() {
    let (textured, _) = textured_mesh(1);
    assert_eq!(textured.stride(), 20);
    assert_eq!(textured.material(), MaterialKind::Textured);

    let (lit, _) = normal_mapped_mesh();
    assert_eq!(lit.stride(), 44);
    assert_eq!(lit.material(), MaterialKind::NormalMapped);
    assert_eq!(lit.textures().len(), 4);

    let device = StubDevice::default();
    let (program, _) = StubProgram::complete(1);
    let vertices = [
        VertexPosCol { position: Vec3::ZERO, color: Vec3::ONE },
        VertexPosCol { position: Vec3::X, color: Vec3::ONE },
        VertexPosCol { position: Vec3::Y, color: Vec3::ONE },
    ];
    let basic = Mesh::basic(&device, program, &vertices, &[0, 1, 2], Vec3::ZERO).unwrap();
    assert_eq!(basic.stride(), 24);
    assert_eq!(basic.material(), MaterialKind::Basic);
}

#[test]
fn device_denial_propagates_as_typed_error() {
    let device = StubDevice {
        deny_buffers: true,
        ..Default::default()
    };
    let (program, _) = StubProgram::complete(1);
    let result = Mesh::textured(&device, program, &quad_geometry(), &white_pixel(), Vec3::ZERO);
    assert!(matches!(result, Err(ViewerError::BufferCreate { .. })));
}

#[test]
fn only_normal_mapped_material_exposes_culling() {
    let (textured, _) = textured_mesh(1);
    assert!(!textured.exposes_culling());

    let (lit, _) = normal_mapped_mesh();
    assert!(lit.exposes_culling());
}

// ============================================================================
// Animation Tests
// ============================================================================

#[test]
fn world_matrix_is_static_while_rotation_disabled() {
    let (mut mesh, _) = normal_mapped_mesh();
    let before = mesh.world_matrix();
    for _ in 0..10 {
        mesh.update(0.25);
    }
    assert_eq!(mesh.world_matrix(), before);
}

#[test]
fn yaw_is_monotonic_while_rotation_enabled() {
    let (mut mesh, _) = textured_mesh(1);
    mesh.toggle_rotation();
    assert!(mesh.is_rotating());

    let mut previous = mesh.yaw();
    for _ in 0..5 {
        mesh.update(0.1);
        assert!(mesh.yaw() > previous);
        previous = mesh.yaw();
    }

    // Disabling freezes the accumulated angle.
    mesh.toggle_rotation();
    mesh.update(1.0);
    assert!((mesh.yaw() - previous).abs() < f32::EPSILON);
}

#[test]
fn world_matrix_is_translation_times_rotation() {
    let (mut mesh, _) = normal_mapped_mesh();
    mesh.toggle_rotation();
    mesh.update(1.0);

    let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0))
        * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let actual = mesh.world_matrix();
    for col in 0..4 {
        for row in 0..4 {
            assert!((actual.col(col)[row] - expected.col(col)[row]).abs() < 1e-5);
        }
    }
}

// ============================================================================
// Draw Protocol Tests
// ============================================================================

#[test]
fn render_emits_protocol_in_order() {
    let (mut mesh, _) = textured_mesh(1);
    let camera = test_camera();
    let mut ctx = RecordingContext::default();

    mesh.render(&camera, &mut ctx);

    let active = mesh.technique_set().active_technique().unwrap();
    assert_eq!(
        ctx.ops,
        vec![
            Op::Topology(PrimitiveTopology::TriangleList),
            Op::InputLayout(20),
            Op::VertexBuffer(BufferHandle(0), 20),
            Op::IndexBuffer(BufferHandle(1)),
            Op::ApplyPass(active, 0),
            Op::DrawIndexed(6),
        ]
    );
}

#[test]
fn render_draws_once_per_pass() {
    let (mut mesh, _) = textured_mesh(3);
    let camera = test_camera();
    let mut ctx = RecordingContext::default();

    mesh.render(&camera, &mut ctx);

    let draws = ctx.ops.iter().filter(|op| matches!(op, Op::DrawIndexed(_))).count();
    let applies = ctx.ops.iter().filter(|op| matches!(op, Op::ApplyPass(..))).count();
    assert_eq!(draws, 3);
    assert_eq!(applies, 3);
}

#[test]
fn render_without_resolved_technique_emits_no_draw() {
    let device = StubDevice::default();
    let mesh = Mesh::textured(
        &device,
        StubProgram::empty(),
        &quad_geometry(),
        &white_pixel(),
        Vec3::ZERO,
    );
    let mut mesh = mesh.expect("unresolved techniques are non-fatal");

    let camera = test_camera();
    let mut ctx = RecordingContext::default();
    mesh.render(&camera, &mut ctx);

    assert!(ctx.ops.iter().all(|op| !matches!(op, Op::DrawIndexed(_))));
    assert!(ctx.ops.iter().all(|op| !matches!(op, Op::ApplyPass(..))));
}

#[test]
fn textured_material_binds_only_wvp() {
    let (mut mesh, recorded) = textured_mesh(1);
    let camera = test_camera();
    let mut ctx = RecordingContext::default();

    mesh.render(&camera, &mut ctx);

    let recorded = recorded.borrow();
    assert_eq!(recorded.matrices.len(), 1);
    assert_eq!(recorded.matrices[0].0, "gWorldViewProj");
}

#[test]
fn normal_mapped_material_binds_lighting_matrices() {
    let (mut mesh, recorded) = normal_mapped_mesh();
    let camera = test_camera();
    let mut ctx = RecordingContext::default();

    mesh.render(&camera, &mut ctx);

    let recorded = recorded.borrow();
    let names: Vec<&str> = recorded.matrices.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["gWorldViewProj", "gWorldMatrix", "gViewInverseMatrix"]);

    // The bound composite must equal projection * view * world computed
    // from the camera's stored (own-world) view matrix.
    let expected =
        camera.projection_matrix() * camera.view_matrix().inverse() * mesh.world_matrix();
    let bound = recorded.matrices[0].1;
    for col in 0..4 {
        for row in 0..4 {
            assert!((bound.col(col)[row] - expected.col(col)[row]).abs() < 1e-5);
        }
    }

    // The inverse-view slot receives the camera's own world matrix.
    assert_eq!(recorded.matrices[2].1, camera.view_matrix());
}

// ============================================================================
// Scene Tests
// ============================================================================

fn test_scene() -> Scene {
    let mut scene = Scene::new(test_camera());
    let (lit, _) = normal_mapped_mesh();
    let (fire, _) = textured_mesh(1);
    scene.add_mesh(lit);
    scene.add_mesh(fire);
    scene
}

#[test]
fn scene_renders_every_mesh() {
    let mut scene = test_scene();
    let mut ctx = RecordingContext::default();
    scene.update(0.016, MoveDirections::empty(), LookInput::default());
    scene.render(&mut ctx);

    let draws = ctx.ops.iter().filter(|op| matches!(op, Op::DrawIndexed(_))).count();
    assert_eq!(draws, 2);
}

#[test]
fn rotation_toggle_reaches_every_mesh() {
    let mut scene = test_scene();
    scene.toggle_rotation();
    assert!(scene.meshes().iter().all(Mesh::is_rotating));
    scene.toggle_rotation();
    assert!(!scene.meshes().iter().any(Mesh::is_rotating));
}

#[test]
fn filter_toggle_reaches_every_mesh() {
    let mut scene = test_scene();
    scene.toggle_filter();
    for mesh in scene.meshes() {
        assert_eq!(mesh.technique_set().filter(), vantage::SamplerFilter::Linear);
    }
}

#[test]
fn cull_toggle_only_reaches_exposing_meshes() {
    let mut scene = test_scene();
    scene.toggle_cull();

    let lit = &scene.meshes()[0];
    let fire = &scene.meshes()[1];
    assert_eq!(lit.technique_set().cull(), vantage::CullMode::Back);
    // The filter-only mesh keeps its default axis value.
    assert_eq!(fire.technique_set().cull(), vantage::CullMode::None);
}

#[test]
fn toggle_is_visible_to_same_frame_render() {
    let mut scene = test_scene();
    scene.toggle_filter();

    let mut ctx = RecordingContext::default();
    scene.update(0.016, MoveDirections::empty(), LookInput::default());
    scene.render(&mut ctx);

    // The lit mesh draws with its Linear/NoCull technique (table index 5).
    assert!(ctx.ops.contains(&Op::ApplyPass(TechniqueHandle(5), 0)));
}
