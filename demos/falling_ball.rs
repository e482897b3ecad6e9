//! Minimal production-mode scene: one ball falling onto the ground
//! plane, watched by a fixed camera with the overlay disabled.

use scenestep::driver::{RenderFrame, RenderLoopDriver, Renderer};
use scenestep::math::{Pose, Quat, Vec3};
use scenestep::scene::{CameraController, CameraState, Geometry};
use scenestep::{BodyDesc, DebugFlags, Material, PhysicsWorld, SceneGraph, Shape};

use std::thread::sleep;
use std::time::{Duration, Instant};

struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &RenderFrame) -> scenestep::Result<()> {
        for draw in &frame.draws {
            let p = draw.transform.position;
            println!("({:7.2}, {:7.2}, {:7.2})", p.x, p.y, p.z);
        }
        println!("---");
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec3::new(0.0, -10.0, 0.0));
    let mut scene = SceneGraph::new();

    let ground_pose = Pose::new(
        Vec3::zeros(),
        Quat::from_axis_angle(&Vec3::x_axis(), -std::f32::consts::FRAC_PI_2),
    );
    world
        .create_body(BodyDesc::new(
            0.0,
            Material::new("ground"),
            ground_pose,
            Shape::Plane,
        ))
        .expect("ground body");

    let ball_shape = Shape::sphere(1.0);
    let ball = world
        .create_body(BodyDesc::new(
            10.0,
            Material::new("ball"),
            Pose::from_position(Vec3::new(0.0, 40.0, 0.0)),
            ball_shape,
        ))
        .expect("ball body");
    scene.bind(ball, Geometry::FromShape(ball_shape), [0.9, 0.2, 0.2]);

    let camera = CameraController::fixed(CameraState::looking_at(
        Vec3::new(0.0, 20.0, 50.0),
        Vec3::zeros(),
        16.0 / 9.0,
    ));
    let mut driver = RenderLoopDriver::new(world, scene, camera, DebugFlags::empty());
    let mut renderer = ConsoleRenderer;

    let frame_time = Duration::from_millis(16);
    let mut last = Instant::now();
    for _ in 0..300 {
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        driver.tick(elapsed, &mut renderer).expect("render tick");
        sleep(frame_time);
    }
    driver.stop();
}
