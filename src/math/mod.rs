use nalgebra::{Matrix3, UnitQuaternion, Vector3};

/// Scalar type used throughout the engine
pub type Real = f32;

/// 3D vector alias
pub type Vec3 = Vector3<Real>;

/// Unit quaternion alias for orientations
pub type Quat = UnitQuaternion<Real>;

/// 3x3 matrix alias, used for inertia tensors
pub type Mat3 = Matrix3<Real>;

mod aabb;
mod pose;

pub use aabb::Aabb;
pub use pose::Pose;

/// Constant for a very small number, used for comparisons
pub const EPSILON: Real = 1.0e-6;

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: Real) -> bool {
    a.abs() < EPSILON
}

/// Returns true if every component of the vector is finite
#[inline]
pub fn vec_is_finite(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// A straight line segment with a display color, used by the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoLine {
    /// Start of the segment in world space
    pub start: Vec3,

    /// End of the segment in world space
    pub end: Vec3,

    /// Line color as linear RGB
    pub color: [Real; 3],
}

impl GizmoLine {
    /// Creates a new colored line segment
    pub fn new(start: Vec3, end: Vec3, color: [Real; 3]) -> Self {
        Self { start, end, color }
    }
}
