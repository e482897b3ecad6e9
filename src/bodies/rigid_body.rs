use crate::bodies::Material;
use crate::error::EngineError;
use crate::math::{vec_is_finite, Mat3, Pose, Real, Vec3};
use crate::shapes::Shape;
use crate::Result;

/// Description of a rigid body, consumed by
/// [`PhysicsWorld::create_body`](crate::core::PhysicsWorld::create_body).
///
/// A mass of zero marks the body static (infinite mass, never displaced).
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Body mass in kilograms; 0 means static
    pub mass: Real,

    /// Material tag used for contact-rule lookup
    pub material: Material,

    /// Initial pose in world space
    pub pose: Pose,

    /// Collision shapes with their local translation offsets, in order.
    /// A body must carry at least one shape.
    pub shapes: Vec<(Shape, Vec3)>,

    /// Linear damping coefficient in [0, 1]
    pub linear_damping: Real,

    /// Initial linear velocity
    pub linear_velocity: Vec3,

    /// Initial angular velocity
    pub angular_velocity: Vec3,
}

impl BodyDesc {
    /// Creates a description with the given mass and a single shape at the
    /// body origin
    pub fn new(mass: Real, material: Material, pose: Pose, shape: Shape) -> Self {
        Self {
            mass,
            material,
            pose,
            shapes: vec![(shape, Vec3::zeros())],
            linear_damping: 0.0,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }

    /// Creates a description with no shapes; add them with
    /// [`with_shape`](Self::with_shape) before creating the body
    pub fn empty(mass: Real, material: Material, pose: Pose) -> Self {
        Self {
            mass,
            material,
            pose,
            shapes: Vec::new(),
            linear_damping: 0.0,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }

    /// Appends a shape at the given local offset
    pub fn with_shape(mut self, shape: Shape, offset: Vec3) -> Self {
        self.shapes.push((shape, offset));
        self
    }

    /// Sets the linear damping coefficient
    pub fn with_linear_damping(mut self, damping: Real) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Sets the initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Checks the description for configuration errors. These are
    /// setup-time faults and fail fast rather than surfacing mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.shapes.is_empty() {
            return Err(EngineError::InvalidBody(
                "body must carry at least one shape".into(),
            ));
        }
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(EngineError::InvalidBody(format!(
                "mass must be finite and >= 0, got {}",
                self.mass
            )));
        }
        if !self.linear_damping.is_finite()
            || !(0.0..=1.0).contains(&self.linear_damping)
        {
            return Err(EngineError::InvalidBody(format!(
                "linear damping must lie in [0, 1], got {}",
                self.linear_damping
            )));
        }
        if !self.pose.is_finite() {
            return Err(EngineError::InvalidBody(
                "initial pose contains non-finite values".into(),
            ));
        }
        if !vec_is_finite(&self.linear_velocity) || !vec_is_finite(&self.angular_velocity) {
            return Err(EngineError::InvalidBody(
                "initial velocity contains non-finite values".into(),
            ));
        }
        for (_, offset) in &self.shapes {
            if !vec_is_finite(offset) {
                return Err(EngineError::InvalidBody(
                    "shape offset contains non-finite values".into(),
                ));
            }
        }
        Ok(())
    }
}

/// A rigid body owned by the physics world.
///
/// Bodies are created once at world-setup time and mutated in place by the
/// integrator every step; there is no despawn path.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pose: Pose,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    material: Material,
    shapes: Vec<(Shape, Vec3)>,
    mass: Real,
    inv_mass: Real,
    inv_inertia_local: Mat3,
    inv_inertia_world: Mat3,
    linear_damping: Real,
}

impl RigidBody {
    /// Builds a body from a validated description
    pub(crate) fn from_desc(desc: BodyDesc) -> Self {
        let inv_mass = if desc.mass > 0.0 { 1.0 / desc.mass } else { 0.0 };
        let inv_inertia_local = if desc.mass > 0.0 {
            let inertia = compound_inertia(desc.mass, &desc.shapes);
            inertia.try_inverse().unwrap_or_else(Mat3::zeros)
        } else {
            Mat3::zeros()
        };

        let mut body = Self {
            pose: desc.pose,
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            material: desc.material,
            shapes: desc.shapes,
            mass: desc.mass,
            inv_mass,
            inv_inertia_local,
            inv_inertia_world: Mat3::zeros(),
            linear_damping: desc.linear_damping,
        };
        body.update_inertia_world();
        body
    }

    /// Returns whether the body is static (mass 0, never displaced)
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Returns the body's pose
    pub fn get_pose(&self) -> Pose {
        self.pose
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vec3 {
        self.pose.position
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }

    /// Returns the body's material
    pub fn get_material(&self) -> &Material {
        &self.material
    }

    /// Returns the body's shapes with their local offsets, in insertion order
    pub fn get_shapes(&self) -> &[(Shape, Vec3)] {
        &self.shapes
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> Real {
        self.mass
    }

    /// Returns the body's inverse mass (zero for static bodies)
    pub fn get_inverse_mass(&self) -> Real {
        self.inv_mass
    }

    /// Returns the body's inverse inertia tensor in world space
    pub fn get_inverse_inertia_world(&self) -> &Mat3 {
        &self.inv_inertia_world
    }

    /// Returns the body's linear damping coefficient
    pub fn get_linear_damping(&self) -> Real {
        self.linear_damping
    }

    /// Returns the world-space bounding box enclosing all the body's shapes
    pub fn world_bounds(&self) -> crate::math::Aabb {
        let mut bounds: Option<crate::math::Aabb> = None;
        for (shape, offset) in &self.shapes {
            let shape_pose = self.pose.with_offset(*offset);
            let b = shape.world_bounds(&shape_pose);
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
        // Validation guarantees at least one shape
        bounds.unwrap_or_else(|| {
            crate::math::Aabb::from_center_half_extents(self.pose.position, Vec3::zeros())
        })
    }

    /// Applies gravity and damping to the velocity, then nothing else:
    /// the contact solver adjusts velocities before positions move.
    /// Damping uses the `(1 - d)^dt` form so its strength is independent
    /// of the step size.
    pub(crate) fn integrate_forces(&mut self, gravity: &Vec3, dt: Real) {
        if self.is_static() {
            return;
        }

        self.linear_velocity += gravity * dt;

        if self.linear_damping > 0.0 {
            self.linear_velocity *= (1.0 - self.linear_damping).powf(dt);
        }
    }

    /// Applies an impulse at a world-space point, updating both linear and
    /// angular velocity
    pub(crate) fn apply_impulse_at_point(&mut self, impulse: Vec3, point: Vec3) {
        if self.is_static() {
            return;
        }

        self.linear_velocity += impulse * self.inv_mass;
        let r = point - self.pose.position;
        self.angular_velocity += self.inv_inertia_world * r.cross(&impulse);
    }

    /// Shifts the position directly, used by the solver's position
    /// correction pass
    pub(crate) fn apply_position_correction(&mut self, correction: Vec3) {
        if self.is_static() {
            return;
        }
        self.pose.position += correction;
    }

    /// Semi-implicit Euler: the (already updated) velocities advance the
    /// pose over `dt`
    pub(crate) fn integrate_velocity(&mut self, dt: Real) {
        if self.is_static() {
            return;
        }

        self.pose.position += self.linear_velocity * dt;

        let omega = self.angular_velocity;
        let angle = omega.norm() * dt;
        if angle > crate::math::EPSILON {
            let axis = nalgebra::Unit::new_normalize(omega);
            let rotation = crate::math::Quat::from_axis_angle(&axis, angle);
            self.pose.orientation = rotation * self.pose.orientation;
            self.update_inertia_world();
        }
    }

    /// Re-derives the world-space inverse inertia tensor from the
    /// current orientation
    fn update_inertia_world(&mut self) {
        if self.is_static() {
            self.inv_inertia_world = Mat3::zeros();
            return;
        }
        let r = self.pose.orientation.to_rotation_matrix();
        self.inv_inertia_world = r.matrix() * self.inv_inertia_local * r.matrix().transpose();
    }

    /// Zeroes the velocities in place. Used by the post-step sanity check
    /// when a non-finite value is detected.
    pub(crate) fn reset_velocities(&mut self) {
        self.linear_velocity = Vec3::zeros();
        self.angular_velocity = Vec3::zeros();
    }

    /// Overwrites the pose, used only by the instability recovery path
    pub(crate) fn restore_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.update_inertia_world();
    }
}

/// Combined local inertia tensor of a compound body. The body mass is
/// split across shapes in proportion to volume, and each contribution is
/// shifted by its offset with the parallel-axis theorem. Bodies whose
/// shapes all have zero volume fall back to an even mass split over unit
/// sphere tensors so a dynamic body always has finite angular response.
fn compound_inertia(mass: Real, shapes: &[(Shape, Vec3)]) -> Mat3 {
    let total_volume: Real = shapes.iter().map(|(s, _)| s.volume()).sum();

    let mut inertia = Mat3::zeros();
    for (shape, offset) in shapes {
        let share = if total_volume > crate::math::EPSILON {
            shape.volume() / total_volume
        } else {
            1.0 / shapes.len() as Real
        };
        let shape_mass = mass * share;

        let local = if total_volume > crate::math::EPSILON {
            shape.inertia_tensor(shape_mass)
        } else {
            Shape::sphere(1.0).inertia_tensor(shape_mass)
        };

        // Parallel-axis shift: I + m (|d|^2 E - d d^T)
        let d = offset;
        let shift = (d.dot(d) * Mat3::identity()) - (d * d.transpose());
        inertia += local + shift * shape_mass;
    }
    inertia
}
