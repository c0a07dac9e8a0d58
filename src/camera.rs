//! Free-look camera.
//!
//! The camera owns the viewer position and yaw/pitch (stored in degrees,
//! unbounded), and derives its orthonormal basis, view matrix and
//! projection matrix from them. The stored "view matrix" is the camera's
//! *own* world transform (orthonormal basis + translation); renderers
//! invert it to obtain the conventional world-to-camera transform.
//!
//! The projection is left-handed with a 0..1 depth range, matching the
//! target pipeline convention.

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3};

bitflags! {
    /// Directional movement flags for one frame of keyboard input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct MoveDirections: u8 {
        const FORWARD  = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
    }
}

/// One frame of click-drag navigation input.
///
/// Only the *sign* of the pointer delta steers the camera; the magnitude
/// is ignored and motion is scaled by elapsed time instead. This matches
/// the legacy relative-mouse behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookInput {
    /// Primary (left) drag button held.
    pub primary: bool,
    /// Secondary (right) drag button held.
    pub secondary: bool,
    /// Pointer delta since the previous frame, +Y pointing down.
    pub delta: Vec2,
}

#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    /// Accumulated yaw in degrees. Unbounded, must stay finite.
    yaw: f32,
    /// Accumulated pitch in degrees.
    pitch: f32,

    // Immutable after construction.
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,

    /// Translation speed in world units per second.
    pub movement_speed: f32,
    /// Yaw/pitch speed in degrees per second while dragging.
    pub rotation_speed: f32,

    // Derived from yaw/pitch every update, never from stored vectors.
    forward: Vec3,
    up: Vec3,
    right: Vec3,

    view_matrix: Mat4,
    inverse_view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Creates a camera at `origin` looking down +Z.
    ///
    /// # Panics
    ///
    /// Panics when `aspect <= 0` or `fov_degrees` is outside `(0, 180)`.
    /// Both are construction-time precondition violations; no partial
    /// camera escapes.
    pub fn new(fov_degrees: f32, origin: Vec3, aspect: f32) -> Self {
        assert!(aspect > 0.0, "aspect ratio must be positive, got {aspect}");
        assert!(
            fov_degrees > 0.0 && fov_degrees < 180.0,
            "field of view must be in (0, 180) degrees, got {fov_degrees}"
        );

        let near = 0.1;
        let far = 100.0;
        let projection_matrix = Mat4::perspective_lh(fov_degrees.to_radians(), aspect, near, far);

        let mut camera = Self {
            origin,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees,
            aspect,
            near,
            far,
            movement_speed: 20.0,
            rotation_speed: 1000.0,
            forward: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::X,
            view_matrix: Mat4::IDENTITY,
            inverse_view_matrix: Mat4::IDENTITY,
            projection_matrix,
        };
        camera.recalculate_view();
        camera
    }

    /// Advances the camera one frame.
    ///
    /// Translation is applied against the *previous* frame's basis before
    /// the new rotation is derived, so pointer input steers with a
    /// one-frame lag. That is the intended interactive feel; keep it.
    pub fn update(&mut self, elapsed_seconds: f32, movement: MoveDirections, look: LookInput) {
        let step = self.movement_speed * elapsed_seconds;

        if movement.contains(MoveDirections::FORWARD) {
            self.origin += step * self.forward;
        }
        if movement.contains(MoveDirections::BACKWARD) {
            self.origin -= step * self.forward;
        }
        if movement.contains(MoveDirections::LEFT) {
            self.origin -= step * self.right;
        }
        if movement.contains(MoveDirections::RIGHT) {
            self.origin += step * self.right;
        }

        let turn = self.rotation_speed * elapsed_seconds;

        if look.primary {
            if look.secondary {
                // Both buttons: vertical pan.
                if look.delta.y > 0.0 {
                    self.origin -= step * self.up;
                } else if look.delta.y < 0.0 {
                    self.origin += step * self.up;
                }
            } else {
                // Primary only: dolly forward/back and yaw.
                if look.delta.y > 0.0 {
                    self.origin -= step * self.forward;
                } else if look.delta.y < 0.0 {
                    self.origin += step * self.forward;
                }
                if look.delta.x > 0.0 {
                    self.yaw += turn;
                } else if look.delta.x < 0.0 {
                    self.yaw -= turn;
                }
            }
        } else if look.secondary {
            // Secondary only: orbit. Dragging down lowers the stored
            // pitch, which tilts the view upward.
            if look.delta.x > 0.0 {
                self.yaw += turn;
            } else if look.delta.x < 0.0 {
                self.yaw -= turn;
            }
            if look.delta.y > 0.0 {
                self.pitch -= turn;
            } else if look.delta.y < 0.0 {
                self.pitch += turn;
            }
        }

        self.recalculate_view();
    }

    /// Rebuilds the basis and view matrices from yaw/pitch alone.
    fn recalculate_view(&mut self) {
        let rotation =
            Mat4::from_rotation_y(self.yaw.to_radians()) * Mat4::from_rotation_x(self.pitch.to_radians());

        self.right = rotation.x_axis.truncate();
        self.up = rotation.y_axis.truncate();
        self.forward = rotation.z_axis.truncate();

        self.view_matrix = Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            self.forward.extend(0.0),
            self.origin.extend(1.0),
        );
        self.inverse_view_matrix = self.view_matrix.inverse();
    }

    /// The camera's own world transform (orthonormal basis + translation).
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Inverse of [`view_matrix`](Self::view_matrix): the conventional
    /// world-to-camera transform.
    #[inline]
    pub fn inverse_view_matrix(&self) -> Mat4 {
        self.inverse_view_matrix
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }
}
