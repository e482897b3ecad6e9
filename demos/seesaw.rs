//! The seesaw scene: a ball drops onto a tilting seesaw next to a player
//! capsule, all on an infinite ground plane. Renders body poses to the
//! terminal through the `Renderer` seam.

use scenestep::driver::{RenderFrame, RenderLoopDriver, Renderer};
use scenestep::math::{Pose, Quat, Vec3};
use scenestep::scene::{CameraController, Geometry, OrbitParams, SceneNode};
use scenestep::{BodyDesc, DebugFlags, Material, PhysicsWorld, SceneGraph, Shape};

use std::thread::sleep;
use std::time::{Duration, Instant};

struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &RenderFrame) -> scenestep::Result<()> {
        print!("\x1B[2J\x1B[1;1H"); // Clear terminal
        println!("Seesaw scene ({} nodes, {} gizmo lines)", frame.draws.len(), frame.gizmos.len());
        println!("--------------------------------------");
        for (i, draw) in frame.draws.iter().enumerate() {
            let p = draw.transform.position;
            println!("node {}: ({:8.2}, {:8.2}, {:8.2})", i, p.x, p.y, p.z);
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
    let mut scene = SceneGraph::new();

    // Ground plane, rotated so its +Z normal faces up
    let ground_pose = Pose::new(
        Vec3::zeros(),
        Quat::from_axis_angle(&Vec3::x_axis(), -std::f32::consts::FRAC_PI_2),
    );
    let ground = world
        .create_body(BodyDesc::new(
            0.0,
            Material::new("ground"),
            ground_pose,
            Shape::Plane,
        ))
        .expect("ground body");
    scene.bind(ground, Geometry::FromShape(Shape::Plane), [0.5, 0.5, 0.5]);

    // Ball dropped from high above the seesaw
    let ball_shape = Shape::sphere(1.0);
    let ball = world
        .create_body(
            BodyDesc::new(
                10.0,
                Material::new("ball"),
                Pose::from_position(Vec3::new(0.0, 40.0, 0.5)),
                ball_shape,
            )
            .with_linear_damping(0.01),
        )
        .expect("ball body");
    scene.bind(ball, Geometry::FromShape(ball_shape), [0.9, 0.2, 0.2]);

    // Seesaw: bar, two end walls and a fulcrum cylinder on one body
    let seesaw_desc = BodyDesc::empty(
        10.0,
        Material::new("seesaw"),
        Pose::from_position(Vec3::new(0.0, 1.5, 0.0)),
    )
    .with_shape(Shape::cuboid(Vec3::new(8.0, 0.5, 5.0)), Vec3::new(0.0, 2.0, 0.0))
    .with_shape(Shape::cuboid(Vec3::new(8.0, 1.0, 0.5)), Vec3::new(0.0, 2.5, 5.0))
    .with_shape(Shape::cuboid(Vec3::new(8.0, 1.0, 0.5)), Vec3::new(0.0, 2.5, -5.0))
    .with_shape(Shape::cylinder(1.5, 1.5, 10.0, 100), Vec3::zeros());
    let seesaw = world.create_body(seesaw_desc).expect("seesaw body");
    scene.bind(
        seesaw,
        Geometry::FromShape(Shape::cuboid(Vec3::new(8.0, 0.5, 5.0))),
        [0.8, 0.7, 0.2],
    );

    // Player capsule stand-in
    let player_shape = Shape::cylinder(2.0, 2.0, 8.0, 100);
    let player = world
        .create_body(
            BodyDesc::new(
                10.0,
                Material::new("player"),
                Pose::from_position(Vec3::new(0.0, 6.0, 0.0)),
                player_shape,
            )
            .with_linear_damping(0.01),
        )
        .expect("player body");
    scene.bind(player, Geometry::FromShape(player_shape), [0.2, 0.4, 0.9]);

    // Decorative back wall: an unbound node, never touched after creation
    scene.add_node(SceneNode {
        geometry: Geometry::DecorBox(Vec3::new(12.0, 20.0, 0.5)),
        transform: scenestep::scene::NodeTransform::from_position(Vec3::new(0.0, 20.0, -1.0)),
        body: None,
        color: [1.0, 1.0, 0.4],
    });

    // Debug configuration: orbit camera plus the gizmo overlay
    let camera = CameraController::orbit(
        OrbitParams {
            target: Vec3::zeros(),
            distance: 54.0,
            yaw: 0.0,
            pitch: 0.38,
        },
        45.0_f32.to_radians(),
        16.0 / 9.0,
    );
    let mut driver = RenderLoopDriver::new(world, scene, camera, DebugFlags::all());
    let mut renderer = ConsoleRenderer;

    let frame_time = Duration::from_millis(16);
    let mut last = Instant::now();
    for _ in 0..600 {
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        driver.tick(elapsed, &mut renderer).expect("render tick");
        sleep(frame_time);
    }
    driver.stop();
}
