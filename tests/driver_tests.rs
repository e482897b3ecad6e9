use approx::assert_abs_diff_eq;
use scenestep::driver::DriverState;
use scenestep::error::EngineError;
use scenestep::math::{Pose, Quat, Vec3};
use scenestep::scene::{Geometry, OrbitParams, PointerEvent};
use scenestep::{
    BodyDesc, BodyId, CameraController, CameraState, DebugFlags, Material, PhysicsWorld,
    RenderFrame, RenderLoopDriver, Renderer, SceneGraph, Shape,
};

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

/// Keeps every frame it is handed, for later inspection
#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<RenderFrame>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &RenderFrame) -> scenestep::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Models a torn-down render surface
struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _frame: &RenderFrame) -> scenestep::Result<()> {
        Err(EngineError::SurfaceLost("device removed".into()))
    }
}

/// A plane facing world +Y plus a sphere dropped onto it, with the
/// sphere mirrored by one scene node
fn make_driver(debug: DebugFlags) -> (RenderLoopDriver, BodyId) {
    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
    world
        .create_body(BodyDesc::new(
            0.0,
            Material::new("ground"),
            Pose::new(
                Vec3::zeros(),
                Quat::from_axis_angle(&Vec3::x_axis(), -FRAC_PI_2),
            ),
            Shape::Plane,
        ))
        .unwrap();
    let ball = world
        .create_body(BodyDesc::new(
            10.0,
            Material::new("ball"),
            Pose::from_position(Vec3::new(0.0, 20.0, 0.0)),
            Shape::sphere(1.0),
        ))
        .unwrap();

    let mut scene = SceneGraph::new();
    scene.bind(ball, Geometry::FromShape(Shape::sphere(1.0)), [1.0, 0.2, 0.2]);

    let camera = CameraController::fixed(CameraState::looking_at(
        Vec3::new(0.0, 20.0, 50.0),
        Vec3::new(0.0, 5.0, 0.0),
        16.0 / 9.0,
    ));

    (RenderLoopDriver::new(world, scene, camera, debug), ball)
}

#[test]
fn test_accumulator_conserves_elapsed_time() {
    let (mut driver, _) = make_driver(DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    let frames = [0.025_f32, 0.0, 0.040, 0.016, 0.1, 0.007];
    let mut fed = 0.0_f32;
    for seconds in frames {
        driver
            .tick(Duration::from_secs_f32(seconds), &mut renderer)
            .unwrap();
        fed += Duration::from_secs_f32(seconds).as_secs_f32();
    }

    let dt = driver.world().timestep();
    let accounted = driver.steps_taken() as f32 * dt + driver.accumulator();
    assert!(
        (accounted - fed).abs() < 1e-3,
        "banked {accounted}, fed {fed}"
    );
    // The leftover is always a sub-step remainder
    assert!(driver.accumulator() < dt);
    assert!(driver.steps_taken() >= 10);
}

#[test]
fn test_zero_elapsed_renders_without_stepping() {
    let (mut driver, ball) = make_driver(DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    let before = driver.world().get_pose(ball).unwrap();
    driver.tick(Duration::ZERO, &mut renderer).unwrap();

    assert_eq!(driver.steps_taken(), 0);
    assert_eq!(driver.world().get_pose(ball).unwrap(), before);
    // The frame still went out, re-rendering the unchanged scene
    assert_eq!(renderer.frames.len(), 1);
}

#[test]
fn test_bound_node_mirrors_body_after_tick() {
    let (mut driver, ball) = make_driver(DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    driver
        .tick(Duration::from_secs_f32(0.1), &mut renderer)
        .unwrap();

    assert!(driver.steps_taken() >= 5);
    let pose = driver.world().get_pose(ball).unwrap();
    assert!(pose.position.y < 20.0);

    let frame = renderer.frames.last().unwrap();
    assert_eq!(frame.draws.len(), 1);
    assert_eq!(frame.draws[0].transform.position, pose.position);
    assert_eq!(frame.draws[0].transform.orientation, pose.orientation);
}

#[test]
fn test_renderer_failure_propagates_and_driver_survives() {
    let (mut driver, _) = make_driver(DebugFlags::empty());

    let result = driver.tick(Duration::from_secs_f32(0.02), &mut FailingRenderer);
    assert!(matches!(result, Err(EngineError::SurfaceLost(_))));

    // The simulation itself is unharmed; a fresh renderer resumes
    assert_eq!(driver.state(), DriverState::Running);
    let mut renderer = RecordingRenderer::default();
    driver
        .tick(Duration::from_secs_f32(0.02), &mut renderer)
        .unwrap();
    assert_eq!(renderer.frames.len(), 1);
}

#[test]
fn test_stopped_driver_ignores_ticks() {
    let (mut driver, _) = make_driver(DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    driver
        .tick(Duration::from_secs_f32(0.05), &mut renderer)
        .unwrap();
    let steps = driver.steps_taken();

    driver.stop();
    assert_eq!(driver.state(), DriverState::Stopped);

    driver
        .tick(Duration::from_secs_f32(0.05), &mut renderer)
        .unwrap();
    assert_eq!(driver.steps_taken(), steps);
    assert_eq!(renderer.frames.len(), 1);
}

#[test]
fn test_identical_tick_sequences_render_identical_frames() {
    let (mut first, _) = make_driver(DebugFlags::empty());
    let (mut second, _) = make_driver(DebugFlags::empty());
    let mut frames_a = RecordingRenderer::default();
    let mut frames_b = RecordingRenderer::default();

    for _ in 0..20 {
        first
            .tick(Duration::from_secs_f32(0.017), &mut frames_a)
            .unwrap();
        second
            .tick(Duration::from_secs_f32(0.017), &mut frames_b)
            .unwrap();
    }

    assert_eq!(first.steps_taken(), second.steps_taken());
    let last_a = frames_a.frames.last().unwrap();
    let last_b = frames_b.frames.last().unwrap();
    assert_eq!(last_a.camera, last_b.camera);
    for (a, b) in last_a.draws.iter().zip(&last_b.draws) {
        assert_eq!(a.transform, b.transform);
    }
}

#[test]
fn test_pointer_events_reach_an_orbit_camera() {
    let mut world = PhysicsWorld::new();
    world
        .create_body(BodyDesc::new(
            1.0,
            Material::default(),
            Pose::from_position(Vec3::new(0.0, 5.0, 0.0)),
            Shape::sphere(1.0),
        ))
        .unwrap();
    let camera = CameraController::orbit(
        OrbitParams::default(),
        45.0_f32.to_radians(),
        16.0 / 9.0,
    );
    let mut driver =
        RenderLoopDriver::new(world, SceneGraph::new(), camera, DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    let before = *driver.camera().state();
    driver.pointer_event(PointerEvent::Drag { dx: 80.0, dy: 10.0 });
    driver.tick(Duration::ZERO, &mut renderer).unwrap();
    assert_ne!(driver.camera().state().position, before.position);
}

#[test]
fn test_fixed_camera_unmoved_by_pointer_events() {
    let (mut driver, _) = make_driver(DebugFlags::empty());
    let mut renderer = RecordingRenderer::default();

    let before = *driver.camera().state();
    driver.pointer_event(PointerEvent::Drag { dx: 80.0, dy: 10.0 });
    driver.pointer_event(PointerEvent::Scroll { delta: 4.0 });
    driver.tick(Duration::ZERO, &mut renderer).unwrap();
    assert_eq!(*driver.camera().state(), before);
}

#[test]
fn test_resize_rederives_aspect() {
    let (mut driver, _) = make_driver(DebugFlags::empty());
    driver.resize(800, 400);
    assert_abs_diff_eq!(driver.camera().state().aspect, 2.0, epsilon = 1e-5);
}

#[test]
fn test_debug_flags_gate_overlay_gizmos() {
    let (mut with_overlay, _) = make_driver(DebugFlags::all());
    let (mut without, _) = make_driver(DebugFlags::empty());
    let mut frames_on = RecordingRenderer::default();
    let mut frames_off = RecordingRenderer::default();

    with_overlay.tick(Duration::ZERO, &mut frames_on).unwrap();
    without.tick(Duration::ZERO, &mut frames_off).unwrap();

    assert!(!frames_on.frames[0].gizmos.is_empty());
    assert!(frames_off.frames[0].gizmos.is_empty());
}
