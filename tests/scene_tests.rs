use approx::assert_abs_diff_eq;
use scenestep::math::{Pose, Quat, Vec3};
use scenestep::scene::{overlay_lines, Geometry, NodeTransform, PointerEvent, SceneNode};
use scenestep::scene::OrbitParams;
use scenestep::{
    BodyDesc, CameraController, CameraState, DebugFlags, Material, PhysicsWorld, SceneGraph, Shape,
};

use std::f32::consts::FRAC_PI_2;

fn falling_ball_world() -> (PhysicsWorld, scenestep::BodyId) {
    let mut world = PhysicsWorld::new();
    let ball = world
        .create_body(BodyDesc::new(
            1.0,
            Material::default(),
            Pose::from_position(Vec3::new(0.0, 10.0, 0.0)),
            Shape::sphere(1.0),
        ))
        .unwrap();
    (world, ball)
}

#[test]
fn test_sync_copies_bound_poses_only() {
    let (mut world, ball) = falling_ball_world();

    let mut scene = SceneGraph::new();
    let bound = scene.bind(ball, Geometry::FromShape(Shape::sphere(1.0)), [1.0, 0.0, 0.0]);

    let decor_transform = NodeTransform {
        position: Vec3::new(0.0, 5.0, -8.0),
        orientation: Quat::identity(),
        scale: Vec3::new(2.0, 1.0, 1.0),
    };
    let decor = scene.add_node(SceneNode {
        geometry: Geometry::DecorBox(Vec3::new(4.0, 4.0, 0.1)),
        transform: decor_transform,
        body: None,
        color: [0.5, 0.5, 0.5],
    });

    for _ in 0..30 {
        world.step();
    }
    scene.sync_poses(&world).unwrap();

    let pose = world.get_pose(ball).unwrap();
    let nodes = scene.nodes();
    assert_eq!(nodes[bound].transform.position, pose.position);
    assert_eq!(nodes[bound].transform.orientation, pose.orientation);
    // Scale is visual-only state and survives the sync
    assert_eq!(nodes[bound].transform.scale, Vec3::new(1.0, 1.0, 1.0));

    // The unbound node keeps the transform it was created with
    assert_eq!(nodes[decor].transform, decor_transform);
}

#[test]
fn test_bound_node_starts_at_identity() {
    let (_world, ball) = falling_ball_world();

    let mut scene = SceneGraph::new();
    let index = scene.bind(ball, Geometry::FromShape(Shape::sphere(1.0)), [1.0, 1.0, 1.0]);
    assert_eq!(scene.nodes()[index].transform, NodeTransform::identity());
}

#[test]
fn test_fixed_camera_ignores_pointer_input() {
    let state = CameraState::looking_at(Vec3::new(0.0, 20.0, 50.0), Vec3::zeros(), 16.0 / 9.0);
    let mut camera = CameraController::fixed(state);
    assert!(!camera.is_interactive());

    camera.handle_event(PointerEvent::Drag { dx: 50.0, dy: -30.0 });
    camera.handle_event(PointerEvent::Scroll { delta: 10.0 });
    camera.update();

    assert_eq!(*camera.state(), state);
}

#[test]
fn test_orbit_camera_follows_drag_and_scroll() {
    let params = OrbitParams {
        target: Vec3::new(0.0, 2.0, 0.0),
        distance: 40.0,
        yaw: 0.0,
        pitch: 0.4,
    };
    let mut camera = CameraController::orbit(params, 45.0_f32.to_radians(), 16.0 / 9.0);
    assert!(camera.is_interactive());

    // The eye starts on the orbit sphere around the target
    let eye = camera.state().position;
    assert!(((eye - params.target).norm() - 40.0).abs() < 1e-3);

    camera.handle_event(PointerEvent::Drag { dx: 100.0, dy: 0.0 });
    camera.update();
    let dragged = camera.state().position;
    assert_ne!(dragged, eye);
    assert!(((dragged - params.target).norm() - 40.0).abs() < 1e-3);

    // Zooming in moves the eye closer to the target
    camera.handle_event(PointerEvent::Scroll { delta: 50.0 });
    camera.update();
    assert!((camera.state().position - params.target).norm() < 40.0);
}

#[test]
fn test_orbit_pitch_clamps_short_of_the_poles() {
    let mut camera =
        CameraController::orbit(OrbitParams::default(), 45.0_f32.to_radians(), 1.0);

    // A huge vertical drag must not flip the camera over the top
    camera.handle_event(PointerEvent::Drag { dx: 0.0, dy: 1.0e6 });
    camera.update();

    let offset = camera.state().position - camera.state().target;
    let elevation = (offset.y / offset.norm()).asin();
    assert!(elevation < FRAC_PI_2);
    assert!(elevation > 1.5);
}

#[test]
fn test_orbit_distance_clamps_above_zero() {
    let mut camera =
        CameraController::orbit(OrbitParams::default(), 45.0_f32.to_radians(), 1.0);

    camera.handle_event(PointerEvent::Scroll { delta: 1.0e6 });
    camera.update();

    let distance = (camera.state().position - camera.state().target).norm();
    assert!(distance >= 0.4, "camera collapsed onto its target");
}

#[test]
fn test_camera_aspect_resize() {
    let mut camera = CameraController::fixed(CameraState::looking_at(
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::zeros(),
        1.0,
    ));

    camera.set_aspect(1920, 1080);
    assert_abs_diff_eq!(camera.state().aspect, 1920.0 / 1080.0, epsilon = 1e-5);

    // A degenerate surface size leaves the aspect alone
    camera.set_aspect(800, 0);
    assert_abs_diff_eq!(camera.state().aspect, 1920.0 / 1080.0, epsilon = 1e-5);
}

#[test]
fn test_view_matrix_maps_eye_to_origin() {
    let state = CameraState::looking_at(Vec3::new(3.0, 4.0, 5.0), Vec3::zeros(), 1.5);
    let view = state.view_matrix();
    let eye = view.transform_point(&nalgebra::Point3::from(state.position));
    assert!(eye.coords.norm() < 1e-4);
}

#[test]
fn test_overlay_axes_lines() {
    let world = PhysicsWorld::new();
    let lines = overlay_lines(&world, DebugFlags::AXES);

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].color, [1.0, 0.0, 0.0]);
    assert_eq!(lines[1].color, [0.0, 1.0, 0.0]);
    assert_eq!(lines[2].color, [0.0, 0.0, 1.0]);
    for line in &lines {
        assert_eq!(line.start, Vec3::zeros());
    }
}

#[test]
fn test_overlay_wireframes_per_shape() {
    let mut world = PhysicsWorld::new();
    world
        .create_body(BodyDesc::new(
            0.0,
            Material::default(),
            Pose::identity(),
            Shape::cuboid(Vec3::new(1.0, 1.0, 1.0)),
        ))
        .unwrap();

    // A box wireframe is its twelve edges
    let box_lines = overlay_lines(&world, DebugFlags::WIREFRAMES);
    assert_eq!(box_lines.len(), 12);

    let mut sphere_world = PhysicsWorld::new();
    sphere_world
        .create_body(BodyDesc::new(
            0.0,
            Material::default(),
            Pose::identity(),
            Shape::sphere(2.0),
        ))
        .unwrap();

    // A sphere draws three 16-segment great circles
    let sphere_lines = overlay_lines(&sphere_world, DebugFlags::WIREFRAMES);
    assert_eq!(sphere_lines.len(), 48);

    // Both families together
    let all = overlay_lines(&world, DebugFlags::all());
    assert_eq!(all.len(), 3 + 12);
}

#[test]
fn test_overlay_empty_flags_draw_nothing() {
    let (world, _) = falling_ball_world();
    assert!(overlay_lines(&world, DebugFlags::empty()).is_empty());
}
