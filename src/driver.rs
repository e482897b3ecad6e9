use crate::core::PhysicsWorld;
use crate::math::{GizmoLine, Real};
use crate::scene::{
    overlay_lines, CameraController, CameraState, DebugFlags, Geometry, NodeTransform,
    PointerEvent, SceneGraph,
};
use crate::Result;

use std::time::Duration;

use log::trace;

/// One draw request: what to draw and where
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// The geometry to draw
    pub geometry: Geometry,

    /// The node's world transform
    pub transform: NodeTransform,

    /// Display color as linear RGB
    pub color: [Real; 3],
}

/// The fully-posed scene handed to the renderer once per tick
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Scene nodes with their world transforms, in creation order
    pub draws: Vec<DrawCall>,

    /// Camera state for this frame
    pub camera: CameraState,

    /// Debug overlay line list; empty when the overlay is off
    pub gizmos: Vec<GizmoLine>,
}

/// The external rasterizer collaborator. The engine assembles a
/// [`RenderFrame`]; rasterization, shading and GPU submission happen on
/// the other side of this trait. A failure (such as surface loss) is not
/// recoverable here and propagates to the host for re-initialization.
pub trait Renderer {
    /// Draws one frame
    fn render(&mut self, frame: &RenderFrame) -> Result<()>;
}

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Ticking perpetually
    Running,

    /// Host tore the surface down; ticks are no-ops
    Stopped,
}

/// The top-level per-display-frame driver.
///
/// Each tick banks the elapsed wall time into a fixed-timestep
/// accumulator and steps the physics world once per whole timestep
/// banked, carrying any remainder to the next tick so simulated time
/// never drifts from wall time regardless of the display refresh rate.
/// After stepping it syncs scene poses, updates the camera and hands one
/// assembled frame to the renderer.
///
/// Everything is single-threaded and frame-driven: a tick runs to
/// completion before the next can begin, so the scene graph never reads
/// a pose mid-integration.
pub struct RenderLoopDriver {
    world: PhysicsWorld,
    scene: SceneGraph,
    camera: CameraController,
    debug: DebugFlags,
    accumulator: Real,
    steps_taken: u64,
    state: DriverState,
}

impl RenderLoopDriver {
    /// Creates a driver over an assembled world and scene. `debug`
    /// selects the overlay gizmos; pass `DebugFlags::empty()` for
    /// production rendering.
    pub fn new(
        world: PhysicsWorld,
        scene: SceneGraph,
        camera: CameraController,
        debug: DebugFlags,
    ) -> Self {
        Self {
            world,
            scene,
            camera,
            debug,
            accumulator: 0.0,
            steps_taken: 0,
            state: DriverState::Running,
        }
    }

    /// Returns the driver state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns a reference to the physics world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Returns a reference to the scene graph
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Returns a reference to the camera controller
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Returns the leftover sub-step time carried to the next tick
    pub fn accumulator(&self) -> Real {
        self.accumulator
    }

    /// Returns how many fixed steps have run since construction
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Forwards a pointer event to the camera controller. Has no effect
    /// on a fixed camera.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        self.camera.handle_event(event);
    }

    /// Re-derives the camera aspect after a surface resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    /// Stops the driver. There is no restart: stopping models the host
    /// tearing down the render surface.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    /// Runs one display-frame tick with the given elapsed wall time.
    ///
    /// Zero or more fixed physics steps run depending on the banked
    /// time; a zero-length frame steps nothing and simply re-renders.
    /// Renderer failure propagates to the host; the simulation state
    /// remains valid and a later tick may resume with a fresh renderer.
    pub fn tick<R: Renderer>(&mut self, elapsed: Duration, renderer: &mut R) -> Result<()> {
        if self.state == DriverState::Stopped {
            return Ok(());
        }

        let dt = self.world.timestep();
        self.accumulator += elapsed.as_secs_f32();

        let mut steps = 0u32;
        while self.accumulator >= dt {
            self.world.step();
            self.accumulator -= dt;
            steps += 1;
        }
        self.steps_taken += u64::from(steps);
        trace!(
            "tick: {} step(s), {:.4}s left in accumulator",
            steps,
            self.accumulator
        );

        self.scene.sync_poses(&self.world)?;
        self.camera.update();

        let frame = self.assemble_frame();
        renderer.render(&frame)
    }

    /// Builds the frame for the current scene and camera state
    fn assemble_frame(&self) -> RenderFrame {
        let draws = self
            .scene
            .nodes()
            .iter()
            .map(|node| DrawCall {
                geometry: node.geometry.clone(),
                transform: node.transform,
                color: node.color,
            })
            .collect();

        let gizmos = if self.debug.is_empty() {
            Vec::new()
        } else {
            overlay_lines(&self.world, self.debug)
        };

        RenderFrame {
            draws,
            camera: *self.camera.state(),
            gizmos,
        }
    }
}
