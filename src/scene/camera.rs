use crate::math::{Real, Vec3};
use nalgebra::{Matrix4, Point3};

/// Projection and view state handed to the renderer every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position in world space
    pub position: Vec3,

    /// Point the camera looks at
    pub target: Vec3,

    /// Up direction
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov_y: Real,

    /// Near clip distance
    pub near: Real,

    /// Far clip distance
    pub far: Real,

    /// Width over height of the output surface
    pub aspect: Real,
}

impl CameraState {
    /// Creates a camera at `position` looking at `target` with sensible
    /// projection defaults (45 degree fov, 0.1..1000 clip range)
    pub fn looking_at(position: Vec3, target: Vec3, aspect: Real) -> Self {
        Self {
            position,
            target,
            up: Vec3::y(),
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect,
        }
    }

    /// Returns the view matrix
    pub fn view_matrix(&self) -> Matrix4<Real> {
        Matrix4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Returns the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<Real> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }
}

/// Raw pointer input consumed by the orbit controller. Delivery is up to
/// the host windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer dragged by (dx, dy) in logical pixels
    Drag { dx: Real, dy: Real },

    /// Scroll or pinch delta; positive moves the camera closer
    Scroll { delta: Real },
}

/// Spherical-coordinate state for the interactive orbit mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Point orbited around
    pub target: Vec3,

    /// Distance from the target
    pub distance: Real,

    /// Heading angle in radians
    pub yaw: Real,

    /// Elevation angle in radians, clamped short of the poles
    pub pitch: Real,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            target: Vec3::zeros(),
            distance: 50.0,
            yaw: 0.0,
            pitch: 0.4,
        }
    }
}

/// Pitch stays this far away from straight up/down
const PITCH_LIMIT: Real = 1.55;

/// Sensitivity of drag input in radians per pixel
const DRAG_SENSITIVITY: Real = 0.005;

/// Sensitivity of scroll input in distance units per delta unit
const SCROLL_SENSITIVITY: Real = 0.1;

/// The camera mode, decided once at construction
#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Preset viewpoint; input is ignored entirely
    Fixed,

    /// Pointer-driven orbit around a target
    Orbit(OrbitParams),
}

/// Owns the camera state and, in debug builds of a scene, drives it from
/// pointer input.
///
/// The two modes are alternative configurations of this one type, chosen
/// by the constructor used; there is no mid-run switching. A fixed
/// controller has no input dependence at all, so two runs without
/// pointer events produce identical camera poses.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    mode: Mode,
}

impl CameraController {
    /// Creates a fixed-viewpoint controller
    pub fn fixed(state: CameraState) -> Self {
        Self {
            state,
            mode: Mode::Fixed,
        }
    }

    /// Creates an interactive orbit controller. The initial eye position
    /// is derived from the orbit parameters immediately.
    pub fn orbit(params: OrbitParams, fov_y: Real, aspect: Real) -> Self {
        let mut controller = Self {
            state: CameraState {
                position: Vec3::zeros(),
                target: params.target,
                up: Vec3::y(),
                fov_y,
                near: 0.1,
                far: 1000.0,
                aspect,
            },
            mode: Mode::Orbit(params),
        };
        controller.update();
        controller
    }

    /// Returns the current camera state
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Returns whether this controller consumes pointer input
    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, Mode::Orbit(_))
    }

    /// Re-derives the aspect ratio from a new surface size
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.state.aspect = width as Real / height as Real;
        }
    }

    /// Feeds a pointer event to the controller. Fixed mode ignores it.
    pub fn handle_event(&mut self, event: PointerEvent) {
        let Mode::Orbit(ref mut params) = self.mode else {
            return;
        };
        match event {
            PointerEvent::Drag { dx, dy } => {
                params.yaw -= dx * DRAG_SENSITIVITY;
                params.pitch =
                    (params.pitch + dy * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            PointerEvent::Scroll { delta } => {
                params.distance = (params.distance - delta * SCROLL_SENSITIVITY).max(0.5);
            }
        }
    }

    /// Recomputes the eye position from the orbit parameters. Called once
    /// per frame before the render pass; a no-op in fixed mode.
    pub fn update(&mut self) {
        let Mode::Orbit(params) = self.mode else {
            return;
        };
        let (sin_yaw, cos_yaw) = params.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = params.pitch.sin_cos();

        let offset = Vec3::new(
            params.distance * cos_pitch * sin_yaw,
            params.distance * sin_pitch,
            params.distance * cos_pitch * cos_yaw,
        );
        self.state.position = params.target + offset;
        self.state.target = params.target;
    }
}
