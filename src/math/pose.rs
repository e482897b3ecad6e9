use crate::math::{vec_is_finite, Quat, Vec3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A rigid-body pose: position plus orientation in world space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,

    /// Orientation as a unit quaternion
    pub orientation: Quat,
}

impl Pose {
    /// Creates a new pose from a position and orientation
    #[inline]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates the identity pose (origin, no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }

    /// Creates a pose from just a position
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::identity(),
        }
    }

    /// Transforms a local-space point into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.position
    }

    /// Rotates a local-space direction into world space, ignoring translation
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.orientation * direction
    }

    /// Composes this pose with a local translation offset
    #[inline]
    pub fn with_offset(&self, offset: Vec3) -> Self {
        Self {
            position: self.transform_point(offset),
            orientation: self.orientation,
        }
    }

    /// Returns true if all components are finite
    pub fn is_finite(&self) -> bool {
        let q = self.orientation.quaternion();
        vec_is_finite(&self.position)
            && q.w.is_finite()
            && q.i.is_finite()
            && q.j.is_finite()
            && q.k.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
