//! Exact contact generation for candidate pairs.
//!
//! Dispatch is a lookup table keyed by pairs of [`ShapeTag`] values: one
//! contact function per supported combination, registered in canonical
//! tag order and flipped (arguments swapped, normal negated) when a pair
//! arrives reversed. Cylinder contacts use axis/rim approximations rather
//! than exact quadric tests; each function documents its own shortcuts.

use crate::bodies::RigidBody;
use crate::collision::contact::ContactManifold;
use crate::core::{BodyId, BodyStorage, ContactPoint};
use crate::math::{Pose, Real, Vec3, EPSILON};
use crate::shapes::{Shape, ShapeTag};

/// Contacts produced by one shape pair: a shared normal (pointing from
/// shape A toward shape B) plus world-space points with penetrations
struct ShapeContact {
    normal: Vec3,
    points: Vec<(Vec3, Real)>,
}

type ContactFn = fn(&Shape, &Pose, &Shape, &Pose) -> Option<ShapeContact>;

#[inline]
fn tag_index(tag: ShapeTag) -> usize {
    match tag {
        ShapeTag::Plane => 0,
        ShapeTag::Sphere => 1,
        ShapeTag::Box => 2,
        ShapeTag::Cylinder => 3,
    }
}

/// Contact-function table, filled on the canonical (upper-triangle) side
/// of the tag ordering Plane < Sphere < Box < Cylinder. Plane-plane is
/// absent: two infinite planes are always static scenery.
const CONTACT_TABLE: [[Option<ContactFn>; 4]; 4] = [
    // Plane vs ...
    [None, Some(plane_sphere), Some(plane_box), Some(plane_cylinder)],
    // Sphere vs ...
    [None, Some(sphere_sphere), Some(sphere_box), Some(sphere_cylinder)],
    // Box vs ...
    [None, None, Some(box_box), Some(box_cylinder)],
    // Cylinder vs ...
    [None, None, None, Some(cylinder_cylinder)],
];

/// Looks up the contact function for a tag pair. The boolean is true when
/// the arguments must be swapped (and the resulting normal negated).
fn lookup(a: ShapeTag, b: ShapeTag) -> Option<(ContactFn, bool)> {
    if let Some(f) = CONTACT_TABLE[tag_index(a)][tag_index(b)] {
        return Some((f, false));
    }
    CONTACT_TABLE[tag_index(b)][tag_index(a)].map(|f| (f, true))
}

/// Runs the narrowphase over the broadphase candidates, producing one
/// manifold per overlapping shape pair. Shape pairs are visited in the
/// bodies' shape insertion order, keeping output order deterministic.
pub fn generate_manifolds(
    bodies: &BodyStorage<RigidBody>,
    pairs: &[(BodyId, BodyId)],
) -> Vec<ContactManifold> {
    let mut manifolds = Vec::new();

    for &(id_a, id_b) in pairs {
        let (body_a, body_b) = match (bodies.get(id_a), bodies.get(id_b)) {
            (Ok(a), Ok(b)) => (a, b),
            _ => continue,
        };

        for (shape_a, offset_a) in body_a.get_shapes() {
            let pose_a = body_a.get_pose().with_offset(*offset_a);

            for (shape_b, offset_b) in body_b.get_shapes() {
                let pose_b = body_b.get_pose().with_offset(*offset_b);

                let Some((f, flipped)) = lookup(shape_a.tag(), shape_b.tag()) else {
                    continue;
                };

                let result = if flipped {
                    f(shape_b, &pose_b, shape_a, &pose_a).map(|mut c| {
                        c.normal = -c.normal;
                        c
                    })
                } else {
                    f(shape_a, &pose_a, shape_b, &pose_b)
                };

                let Some(contact) = result else { continue };
                if contact.points.is_empty() {
                    continue;
                }

                let mut manifold = ContactManifold::new(id_a, id_b);
                manifold.normal = contact.normal;
                for (position, penetration) in contact.points {
                    manifold.add_contact(ContactPoint {
                        position,
                        normal: contact.normal,
                        penetration,
                    });
                }
                manifolds.push(manifold);
            }
        }
    }

    manifolds
}

/// World-space normal of a plane shape (+Z in local space)
#[inline]
fn plane_normal(pose: &Pose) -> Vec3 {
    pose.transform_direction(Vec3::z())
}

/// Any unit vector perpendicular to `v`
fn any_perpendicular(v: &Vec3) -> Vec3 {
    let candidate = if v.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let perp = v.cross(&candidate);
    let norm = perp.norm();
    if norm > EPSILON {
        perp / norm
    } else {
        Vec3::x()
    }
}

/// World-space corners of a box shape
fn box_corners(half_extents: &Vec3, pose: &Pose) -> [Vec3; 8] {
    let he = half_extents;
    let signs = [
        (-1.0, -1.0, -1.0),
        (1.0, -1.0, -1.0),
        (-1.0, 1.0, -1.0),
        (1.0, 1.0, -1.0),
        (-1.0, -1.0, 1.0),
        (1.0, -1.0, 1.0),
        (-1.0, 1.0, 1.0),
        (1.0, 1.0, 1.0),
    ];
    signs.map(|(sx, sy, sz)| {
        pose.transform_point(Vec3::new(sx * he.x, sy * he.y, sz * he.z))
    })
}

/// Closest point to `p` on the segment from `a` to `b`
fn closest_point_on_segment(p: &Vec3, a: &Vec3, b: &Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.dot(&ab);
    if len_sq < EPSILON {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments (p1,q1) and (p2,q2), Ericson-style
fn closest_points_on_segments(p1: &Vec3, q1: &Vec3, p2: &Vec3, q2: &Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    if a < EPSILON && e < EPSILON {
        return (*p1, *p2);
    }

    let (s, t);
    if a < EPSILON {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e < EPSILON {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let s_raw = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t_raw = (b * s_raw + f) / e;
            if t_raw < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t_raw > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            } else {
                t = t_raw;
                s = s_raw;
            }
        }
    }

    (p1 + d1 * s, p2 + d2 * t)
}

fn plane_sphere(_plane: &Shape, pose_a: &Pose, sphere: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let Shape::Sphere { radius } = *sphere else {
        return None;
    };
    let n = plane_normal(pose_a);
    let dist = n.dot(&(pose_b.position - pose_a.position));
    let penetration = radius - dist;
    if penetration <= 0.0 {
        return None;
    }

    Some(ShapeContact {
        normal: n,
        points: vec![(pose_b.position - n * radius, penetration)],
    })
}

fn plane_box(_plane: &Shape, pose_a: &Pose, cuboid: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let Shape::Box { half_extents } = cuboid else {
        return None;
    };
    let n = plane_normal(pose_a);

    let mut points = Vec::new();
    for corner in box_corners(half_extents, pose_b) {
        let dist = n.dot(&(corner - pose_a.position));
        if dist < 0.0 {
            points.push((corner, -dist));
        }
    }
    if points.is_empty() {
        return None;
    }

    Some(ShapeContact { normal: n, points })
}

/// Plane vs cylinder tested at the cap rims: for each cap the rim point
/// most opposed to the plane normal, or four sampled rim points when the
/// cap lies parallel to the plane. The curved side between the caps is
/// never the deepest feature against an infinite plane.
fn plane_cylinder(_plane: &Shape, pose_a: &Pose, cyl: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let Shape::Cylinder {
        radius_top,
        radius_bottom,
        height,
        ..
    } = *cyl
    else {
        return None;
    };
    let n = plane_normal(pose_a);
    let axis = pose_b.transform_direction(Vec3::y());

    let mut points = Vec::new();
    for (sign, radius) in [(-1.0, radius_bottom), (1.0, radius_top)] {
        let cap_center = pose_b.position + axis * (sign * 0.5 * height);
        let radial = n - axis * n.dot(&axis);
        let radial_norm = radial.norm();

        let candidates: Vec<Vec3> = if radial_norm > EPSILON {
            vec![cap_center - (radial / radial_norm) * radius]
        } else {
            // Cap face parallel to the plane: sample the rim
            let u = any_perpendicular(&axis);
            let v = axis.cross(&u);
            vec![
                cap_center + u * radius,
                cap_center - u * radius,
                cap_center + v * radius,
                cap_center - v * radius,
            ]
        };

        for p in candidates {
            let dist = n.dot(&(p - pose_a.position));
            if dist < 0.0 {
                points.push((p, -dist));
            }
        }
    }
    if points.is_empty() {
        return None;
    }

    Some(ShapeContact { normal: n, points })
}

fn sphere_sphere(sphere_a: &Shape, pose_a: &Pose, sphere_b: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) = (*sphere_a, *sphere_b)
    else {
        return None;
    };

    let delta = pose_b.position - pose_a.position;
    let dist = delta.norm();
    let penetration = ra + rb - dist;
    if penetration <= 0.0 {
        return None;
    }

    let normal = if dist > EPSILON { delta / dist } else { Vec3::x() };
    let point = pose_a.position + normal * (ra - 0.5 * penetration);

    Some(ShapeContact {
        normal,
        points: vec![(point, penetration)],
    })
}

fn sphere_box(sphere: &Shape, pose_a: &Pose, cuboid: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (Shape::Sphere { radius }, Shape::Box { half_extents }) = (*sphere, *cuboid) else {
        return None;
    };

    let center = pose_a.position;
    let local = pose_b.orientation.inverse() * (center - pose_b.position);
    let clamped = Vec3::new(
        local.x.clamp(-half_extents.x, half_extents.x),
        local.y.clamp(-half_extents.y, half_extents.y),
        local.z.clamp(-half_extents.z, half_extents.z),
    );

    if (local - clamped).norm() > EPSILON {
        // Sphere center outside the box
        let closest = pose_b.transform_point(clamped);
        let delta = closest - center;
        let dist = delta.norm();
        let penetration = radius - dist;
        if penetration <= 0.0 {
            return None;
        }
        let normal = if dist > EPSILON { delta / dist } else { Vec3::y() };
        return Some(ShapeContact {
            normal,
            points: vec![(closest, penetration)],
        });
    }

    // Center inside the box: push out through the nearest face
    let mut min_depth = half_extents.x - local.x.abs();
    let mut face = Vec3::new(local.x.signum(), 0.0, 0.0);
    let depth_y = half_extents.y - local.y.abs();
    if depth_y < min_depth {
        min_depth = depth_y;
        face = Vec3::new(0.0, local.y.signum(), 0.0);
    }
    let depth_z = half_extents.z - local.z.abs();
    if depth_z < min_depth {
        min_depth = depth_z;
        face = Vec3::new(0.0, 0.0, local.z.signum());
    }

    let face_out = pose_b.transform_direction(face);
    Some(ShapeContact {
        // The sphere escapes along +face_out, so the pair normal (pushing
        // the box) is its negation
        normal: -face_out,
        points: vec![(center, min_depth + radius)],
    })
}

/// Sphere vs cylinder treated as sphere vs capped axis segment with the
/// cap radius interpolated along the axis. This rounds the cap edge but
/// is exact on the side wall and well-behaved above the caps.
fn sphere_cylinder(sphere: &Shape, pose_a: &Pose, cyl: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (
        Shape::Sphere { radius },
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            ..
        },
    ) = (*sphere, *cyl)
    else {
        return None;
    };

    let axis = pose_b.transform_direction(Vec3::y());
    let bottom = pose_b.position - axis * (0.5 * height);
    let top = pose_b.position + axis * (0.5 * height);

    let q = closest_point_on_segment(&pose_a.position, &bottom, &top);
    let t = if height > EPSILON {
        (q - bottom).norm() / height
    } else {
        0.5
    };
    let r_cyl = radius_bottom + t * (radius_top - radius_bottom);

    let delta = q - pose_a.position;
    let dist = delta.norm();
    let penetration = radius + r_cyl - dist;
    if penetration <= 0.0 {
        return None;
    }

    let normal = if dist > EPSILON {
        delta / dist
    } else {
        any_perpendicular(&axis)
    };
    let point = pose_a.position + normal * (radius - 0.5 * penetration);

    Some(ShapeContact {
        normal,
        points: vec![(point, penetration)],
    })
}

/// Box vs box via separating-axis test over the 6 face axes and 9 edge
/// cross products. The manifold collects the corners of each box lying
/// inside the other; for pure edge-edge contact the midpoint between
/// centers stands in for the single contact point.
fn box_box(box_a: &Shape, pose_a: &Pose, box_b: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) = (*box_a, *box_b)
    else {
        return None;
    };

    let ra = pose_a.orientation.to_rotation_matrix();
    let rb = pose_b.orientation.to_rotation_matrix();
    let axes_a = [
        ra.matrix().column(0).into_owned(),
        ra.matrix().column(1).into_owned(),
        ra.matrix().column(2).into_owned(),
    ];
    let axes_b = [
        rb.matrix().column(0).into_owned(),
        rb.matrix().column(1).into_owned(),
        rb.matrix().column(2).into_owned(),
    ];
    let t = pose_b.position - pose_a.position;

    let project = |axis: &Vec3, he: &Vec3, axes: &[Vec3; 3]| -> Real {
        he.x * axes[0].dot(axis).abs()
            + he.y * axes[1].dot(axis).abs()
            + he.z * axes[2].dot(axis).abs()
    };

    let mut min_overlap = Real::MAX;
    let mut best_axis = Vec3::y();

    let mut test_axis = |axis: Vec3, edge_axis: bool| -> bool {
        let norm = axis.norm();
        if norm < EPSILON {
            return true; // Degenerate cross product, skip
        }
        let axis = axis / norm;
        let overlap = project(&axis, &ha, &axes_a) + project(&axis, &hb, &axes_b)
            - t.dot(&axis).abs();
        if overlap < 0.0 {
            return false; // Separating axis found
        }
        // Edge axes must beat face axes by a margin to avoid jitter
        let threshold = if edge_axis {
            min_overlap - 1.0e-4
        } else {
            min_overlap
        };
        if overlap < threshold {
            min_overlap = overlap;
            best_axis = axis;
        }
        true
    };

    for axis in &axes_a {
        if !test_axis(*axis, false) {
            return None;
        }
    }
    for axis in &axes_b {
        if !test_axis(*axis, false) {
            return None;
        }
    }
    for a in &axes_a {
        for b in &axes_b {
            if !test_axis(a.cross(b), true) {
                return None;
            }
        }
    }

    let normal = if best_axis.dot(&t) >= 0.0 {
        best_axis
    } else {
        -best_axis
    };

    // Corner collection: B's corners inside A and A's corners inside B
    let margin = 1.0e-3;
    let mut points = Vec::new();
    let inside = |p: &Vec3, pose: &Pose, he: &Vec3| -> bool {
        let local = pose.orientation.inverse() * (p - pose.position);
        local.x.abs() <= he.x + margin
            && local.y.abs() <= he.y + margin
            && local.z.abs() <= he.z + margin
    };

    for corner in box_corners(&hb, pose_b) {
        if inside(&corner, pose_a, &ha) {
            points.push((corner, min_overlap));
        }
    }
    for corner in box_corners(&ha, pose_a) {
        if inside(&corner, pose_b, &hb) {
            points.push((corner, min_overlap));
        }
    }
    if points.is_empty() {
        points.push((pose_a.position + t * 0.5, min_overlap));
    }

    Some(ShapeContact { normal, points })
}

/// Box vs cylinder by sampling the cylinder boundary (cap centers plus
/// eight rim points per cap) against the box. Coarse, but deterministic
/// and adequate for resting and bumping contacts at this scale.
fn box_cylinder(cuboid: &Shape, pose_a: &Pose, cyl: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (
        Shape::Box { half_extents },
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
            ..
        },
    ) = (*cuboid, *cyl)
    else {
        return None;
    };

    let axis = pose_b.transform_direction(Vec3::y());
    let u = any_perpendicular(&axis);
    let v = axis.cross(&u);

    let mut samples = Vec::with_capacity(18);
    for (sign, radius) in [(-1.0, radius_bottom), (1.0, radius_top)] {
        let cap_center = pose_b.position + axis * (sign * 0.5 * height);
        samples.push(cap_center);
        for k in 0..8 {
            let angle = (k as Real) * std::f32::consts::FRAC_PI_4;
            samples.push(cap_center + (u * angle.cos() + v * angle.sin()) * radius);
        }
    }

    let mut deepest: Option<(Vec3, Real, Vec3)> = None;
    let mut points = Vec::new();
    for p in samples {
        let local = pose_a.orientation.inverse() * (p - pose_a.position);
        let dx = half_extents.x - local.x.abs();
        let dy = half_extents.y - local.y.abs();
        let dz = half_extents.z - local.z.abs();
        if dx < 0.0 || dy < 0.0 || dz < 0.0 {
            continue;
        }

        // Push the sample out through its nearest box face
        let (depth, face) = if dx <= dy && dx <= dz {
            (dx, Vec3::new(local.x.signum(), 0.0, 0.0))
        } else if dy <= dz {
            (dy, Vec3::new(0.0, local.y.signum(), 0.0))
        } else {
            (dz, Vec3::new(0.0, 0.0, local.z.signum()))
        };
        let face_out = pose_a.transform_direction(face);

        points.push((p, depth, face_out));
        match deepest {
            Some((_, best, _)) if best >= depth => {}
            _ => deepest = Some((p, depth, face_out)),
        }
    }

    let (_, _, normal) = deepest?;
    // Keep only points agreeing with the deepest sample's face so the
    // manifold shares one normal
    let filtered: Vec<(Vec3, Real)> = points
        .into_iter()
        .filter(|(_, _, f)| f.dot(&normal) > 0.99)
        .map(|(p, d, _)| (p, d))
        .collect();

    Some(ShapeContact {
        normal,
        points: filtered,
    })
}

/// Cylinder vs cylinder as two capped axis segments (capsule
/// approximation with each cylinder's mean radius). Cap-edge stacking
/// resolves through the rounded ends; good enough for glancing and side
/// contacts between upright bodies.
fn cylinder_cylinder(cyl_a: &Shape, pose_a: &Pose, cyl_b: &Shape, pose_b: &Pose) -> Option<ShapeContact> {
    let (
        Shape::Cylinder {
            radius_top: rta,
            radius_bottom: rba,
            height: height_a,
            ..
        },
        Shape::Cylinder {
            radius_top: rtb,
            radius_bottom: rbb,
            height: height_b,
            ..
        },
    ) = (*cyl_a, *cyl_b)
    else {
        return None;
    };

    let ra = 0.5 * (rta + rba);
    let rb = 0.5 * (rtb + rbb);

    let axis_a = pose_a.transform_direction(Vec3::y());
    let axis_b = pose_b.transform_direction(Vec3::y());
    let (a0, a1) = (
        pose_a.position - axis_a * (0.5 * height_a),
        pose_a.position + axis_a * (0.5 * height_a),
    );
    let (b0, b1) = (
        pose_b.position - axis_b * (0.5 * height_b),
        pose_b.position + axis_b * (0.5 * height_b),
    );

    let (qa, qb) = closest_points_on_segments(&a0, &a1, &b0, &b1);
    let delta = qb - qa;
    let dist = delta.norm();
    let penetration = ra + rb - dist;
    if penetration <= 0.0 {
        return None;
    }

    let normal = if dist > EPSILON {
        delta / dist
    } else {
        any_perpendicular(&axis_a)
    };
    let point = qa + normal * (ra - 0.5 * penetration);

    Some(ShapeContact {
        normal,
        points: vec![(point, penetration)],
    })
}
