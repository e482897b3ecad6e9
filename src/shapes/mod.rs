use crate::math::{Aabb, Mat3, Pose, Real, Vec3};

/// Discriminant of a [`Shape`] variant, used to key the narrowphase
/// contact-function lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Plane,
    Sphere,
    Box,
    Cylinder,
}

/// A collision shape. The set of variants is closed: the narrowphase
/// dispatches on pairs of [`ShapeTag`] values rather than on trait objects.
///
/// Shapes are immutable once constructed. A plane carries no parameters;
/// its local normal is +Z and the owning body's orientation aims it.
/// Cylinders are aligned with the local +Y axis; `segments` only controls
/// render tessellation, not collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// An infinite plane with local normal +Z
    Plane,

    /// A sphere centered at the local origin
    Sphere {
        /// The sphere radius
        radius: Real,
    },

    /// An axis-aligned box centered at the local origin
    Box {
        /// Half the box size along each local axis
        half_extents: Vec3,
    },

    /// A cylinder along the local +Y axis
    Cylinder {
        /// Radius of the top cap
        radius_top: Real,

        /// Radius of the bottom cap
        radius_bottom: Real,

        /// Full height along the local Y axis
        height: Real,

        /// Number of radial segments used when tessellating for rendering
        segments: u32,
    },
}

/// AABB half-size used for the unbounded extent of an infinite plane
const PLANE_BOUND: Real = 1000.0;

impl Shape {
    /// Creates a sphere shape
    pub fn sphere(radius: Real) -> Self {
        Self::Sphere {
            radius: radius.max(0.0),
        }
    }

    /// Creates a box shape from its half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    /// Creates a cylinder shape
    pub fn cylinder(radius_top: Real, radius_bottom: Real, height: Real, segments: u32) -> Self {
        Self::Cylinder {
            radius_top: radius_top.max(0.0),
            radius_bottom: radius_bottom.max(0.0),
            height: height.max(0.0),
            segments: segments.max(3),
        }
    }

    /// Returns the tag of this shape
    pub fn tag(&self) -> ShapeTag {
        match self {
            Self::Plane => ShapeTag::Plane,
            Self::Sphere { .. } => ShapeTag::Sphere,
            Self::Box { .. } => ShapeTag::Box,
            Self::Cylinder { .. } => ShapeTag::Cylinder,
        }
    }

    /// Returns the volume of the shape. An infinite plane reports zero.
    pub fn volume(&self) -> Real {
        match *self {
            Self::Plane => 0.0,
            Self::Sphere { radius } => (4.0 / 3.0) * std::f32::consts::PI * radius.powi(3),
            Self::Box { half_extents } => {
                8.0 * half_extents.x * half_extents.y * half_extents.z
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                // Volume of a conical frustum; collapses to the cylinder
                // formula when both radii match.
                let (rt, rb) = (radius_top, radius_bottom);
                std::f32::consts::PI * height * (rt * rt + rt * rb + rb * rb) / 3.0
            }
        }
    }

    /// Returns the inertia tensor of the shape in local space for the
    /// given mass. A plane has no meaningful tensor and reports zero.
    pub fn inertia_tensor(&self, mass: Real) -> Mat3 {
        match *self {
            Self::Plane => Mat3::zeros(),
            Self::Sphere { radius } => {
                let i = 0.4 * mass * radius * radius;
                Mat3::from_diagonal(&Vec3::new(i, i, i))
            }
            Self::Box { half_extents } => {
                let w = 2.0 * half_extents.x;
                let h = 2.0 * half_extents.y;
                let d = 2.0 * half_extents.z;
                let k = mass / 12.0;
                Mat3::from_diagonal(&Vec3::new(
                    k * (h * h + d * d),
                    k * (w * w + d * d),
                    k * (w * w + h * h),
                ))
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                // Mean-radius approximation of the frustum tensor
                let r = 0.5 * (radius_top + radius_bottom);
                let lateral = mass * (3.0 * r * r + height * height) / 12.0;
                let axial = 0.5 * mass * r * r;
                Mat3::from_diagonal(&Vec3::new(lateral, axial, lateral))
            }
        }
    }

    /// Returns the axis-aligned bounding box of the shape in local space
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Self::Plane => {
                // Half-space behind the local +Z face, clipped to a large finite box
                Aabb::new(
                    Vec3::new(-PLANE_BOUND, -PLANE_BOUND, -PLANE_BOUND),
                    Vec3::new(PLANE_BOUND, PLANE_BOUND, 0.0),
                )
            }
            Self::Sphere { radius } => Aabb::from_center_half_extents(
                Vec3::zeros(),
                Vec3::new(radius, radius, radius),
            ),
            Self::Box { half_extents } => {
                Aabb::from_center_half_extents(Vec3::zeros(), half_extents)
            }
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                Aabb::from_center_half_extents(Vec3::zeros(), Vec3::new(r, 0.5 * height, r))
            }
        }
    }

    /// Returns the axis-aligned bounding box of the shape in world space
    /// for the given pose
    pub fn world_bounds(&self, pose: &Pose) -> Aabb {
        match *self {
            // A sphere's bounds are rotation invariant
            Self::Sphere { radius } => Aabb::from_center_half_extents(
                pose.position,
                Vec3::new(radius, radius, radius),
            ),
            _ => {
                let local = self.local_bounds();
                let corners = [
                    Vec3::new(local.min.x, local.min.y, local.min.z),
                    Vec3::new(local.max.x, local.min.y, local.min.z),
                    Vec3::new(local.min.x, local.max.y, local.min.z),
                    Vec3::new(local.max.x, local.max.y, local.min.z),
                    Vec3::new(local.min.x, local.min.y, local.max.z),
                    Vec3::new(local.max.x, local.min.y, local.max.z),
                    Vec3::new(local.min.x, local.max.y, local.max.z),
                    Vec3::new(local.max.x, local.max.y, local.max.z),
                ];

                let world: Vec<Vec3> =
                    corners.iter().map(|c| pose.transform_point(*c)).collect();

                // The corner list is never empty, so the fallback is unreachable
                Aabb::from_points(&world).unwrap_or_else(|| {
                    Aabb::from_center_half_extents(pose.position, Vec3::zeros())
                })
            }
        }
    }
}
