use crate::bodies::RigidBody;
use crate::core::PhysicsWorld;
use crate::math::{GizmoLine, Pose, Real, Vec3};
use crate::shapes::Shape;

use bitflags::bitflags;

bitflags! {
    /// Which gizmo families the debug overlay draws. The startup
    /// `debug_mode` boolean maps to `all()` or `empty()`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DebugFlags: u32 {
        /// World axis gizmo at the origin
        const AXES = 0x01;

        /// Wireframes of every body's collision shapes
        const WIREFRAMES = 0x02;
    }
}

const AXIS_LENGTH: Real = 1000.0;
const WIREFRAME_COLOR: [Real; 3] = [0.0, 1.0, 0.0];

/// Segments per circle when tessellating wireframe circles
const CIRCLE_SEGMENTS: u32 = 16;

/// Half-width and line spacing of the plane wireframe grid
const GRID_EXTENT: Real = 20.0;
const GRID_STEP: Real = 4.0;

/// Produces the overlay's line list for the current world state:
/// the world axes (X red, Y green, Z blue) and a wireframe for every
/// collision shape of every body, per the enabled flags.
pub fn overlay_lines(world: &PhysicsWorld, flags: DebugFlags) -> Vec<GizmoLine> {
    let mut lines = Vec::new();

    if flags.contains(DebugFlags::AXES) {
        lines.push(GizmoLine::new(
            Vec3::zeros(),
            Vec3::x() * AXIS_LENGTH,
            [1.0, 0.0, 0.0],
        ));
        lines.push(GizmoLine::new(
            Vec3::zeros(),
            Vec3::y() * AXIS_LENGTH,
            [0.0, 1.0, 0.0],
        ));
        lines.push(GizmoLine::new(
            Vec3::zeros(),
            Vec3::z() * AXIS_LENGTH,
            [0.0, 0.0, 1.0],
        ));
    }

    if flags.contains(DebugFlags::WIREFRAMES) {
        for i in 0..world.body_count() {
            let id = crate::core::BodyId(i as u32);
            if let Ok(body) = world.get_body(id) {
                body_wireframe(body, &mut lines);
            }
        }
    }

    lines
}

fn body_wireframe(body: &RigidBody, lines: &mut Vec<GizmoLine>) {
    for (shape, offset) in body.get_shapes() {
        let pose = body.get_pose().with_offset(*offset);
        shape_wireframe(shape, &pose, lines);
    }
}

fn shape_wireframe(shape: &Shape, pose: &Pose, lines: &mut Vec<GizmoLine>) {
    match *shape {
        Shape::Plane => plane_grid(pose, lines),
        Shape::Sphere { radius } => {
            // Three great circles around the local axes
            circle(pose, Vec3::zeros(), Vec3::x(), radius, lines);
            circle(pose, Vec3::zeros(), Vec3::y(), radius, lines);
            circle(pose, Vec3::zeros(), Vec3::z(), radius, lines);
        }
        Shape::Box { half_extents } => box_edges(&half_extents, pose, lines),
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            ..
        } => {
            let half = 0.5 * height;
            circle(pose, Vec3::y() * half, Vec3::y(), radius_top, lines);
            circle(pose, Vec3::y() * (-half), Vec3::y(), radius_bottom, lines);
            // Four vertical struts connecting the rims
            for k in 0..4 {
                let angle = (k as Real) * std::f32::consts::FRAC_PI_2;
                let (sin, cos) = angle.sin_cos();
                let top = Vec3::new(radius_top * cos, half, radius_top * sin);
                let bottom = Vec3::new(radius_bottom * cos, -half, radius_bottom * sin);
                lines.push(GizmoLine::new(
                    pose.transform_point(bottom),
                    pose.transform_point(top),
                    WIREFRAME_COLOR,
                ));
            }
        }
    }
}

/// A circle of radius `r` around `axis`, centered at the local `center`
fn circle(pose: &Pose, center: Vec3, axis: Vec3, r: Real, lines: &mut Vec<GizmoLine>) {
    let u = if axis.x.abs() < 0.9 {
        axis.cross(&Vec3::x()).normalize()
    } else {
        axis.cross(&Vec3::y()).normalize()
    };
    let v = axis.cross(&u);

    let mut previous: Option<Vec3> = None;
    for k in 0..=CIRCLE_SEGMENTS {
        let angle = (k as Real) / (CIRCLE_SEGMENTS as Real) * std::f32::consts::TAU;
        let local = center + (u * angle.cos() + v * angle.sin()) * r;
        let point = pose.transform_point(local);
        if let Some(prev) = previous {
            lines.push(GizmoLine::new(prev, point, WIREFRAME_COLOR));
        }
        previous = Some(point);
    }
}

/// The twelve edges of a box
fn box_edges(half_extents: &Vec3, pose: &Pose, lines: &mut Vec<GizmoLine>) {
    let he = half_extents;
    let corner = |sx: Real, sy: Real, sz: Real| {
        pose.transform_point(Vec3::new(sx * he.x, sy * he.y, sz * he.z))
    };

    let c = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];

    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0), // back face
        (4, 5), (5, 6), (6, 7), (7, 4), // front face
        (0, 4), (1, 5), (2, 6), (3, 7), // connecting edges
    ];
    for (a, b) in EDGES {
        lines.push(GizmoLine::new(c[a], c[b], WIREFRAME_COLOR));
    }
}

/// A finite grid standing in for an infinite plane, drawn in the plane's
/// local XY (the local normal is +Z)
fn plane_grid(pose: &Pose, lines: &mut Vec<GizmoLine>) {
    let mut offset = -GRID_EXTENT;
    while offset <= GRID_EXTENT {
        lines.push(GizmoLine::new(
            pose.transform_point(Vec3::new(offset, -GRID_EXTENT, 0.0)),
            pose.transform_point(Vec3::new(offset, GRID_EXTENT, 0.0)),
            WIREFRAME_COLOR,
        ));
        lines.push(GizmoLine::new(
            pose.transform_point(Vec3::new(-GRID_EXTENT, offset, 0.0)),
            pose.transform_point(Vec3::new(GRID_EXTENT, offset, 0.0)),
            WIREFRAME_COLOR,
        ));
        offset += GRID_STEP;
    }
}
