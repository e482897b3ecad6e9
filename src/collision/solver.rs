use crate::bodies::{ContactTable, RigidBody};
use crate::collision::contact::ContactManifold;
use crate::core::BodyStorage;
use crate::math::{Real, Vec3};

/// Iterative impulse-based contact solver.
///
/// Velocity constraints are relaxed sequentially per contact with normal
/// and friction impulses; a separate position pass bleeds off remaining
/// penetration beyond the slop. Zero-mass bodies have zero inverse mass
/// and inertia, so they absorb impulses without ever moving.
pub struct ImpulseSolver {
    bias_factor: Real,
    penetration_slop: Real,
    max_bias_speed: Real,
    restitution_threshold: Real,
}

impl ImpulseSolver {
    /// Creates a solver with the given stabilization parameters
    pub fn new(
        bias_factor: Real,
        penetration_slop: Real,
        max_bias_speed: Real,
        restitution_threshold: Real,
    ) -> Self {
        Self {
            bias_factor,
            penetration_slop,
            max_bias_speed,
            restitution_threshold,
        }
    }

    /// Fills in each manifold's friction and restitution from the
    /// contact table
    pub fn prepare(&self, manifolds: &mut [ContactManifold], bodies: &BodyStorage<RigidBody>, table: &ContactTable) {
        for manifold in manifolds {
            let (Ok(body_a), Ok(body_b)) =
                (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            else {
                continue;
            };
            let rule = table.lookup(body_a.get_material(), body_b.get_material());
            manifold.friction = rule.friction;
            manifold.restitution = rule.restitution;
        }
    }

    /// One relaxation sweep over all velocity constraints
    pub fn solve_velocity(
        &self,
        manifolds: &[ContactManifold],
        bodies: &mut BodyStorage<RigidBody>,
        dt: Real,
    ) {
        for manifold in manifolds {
            let (Ok(a), Ok(b)) = (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            else {
                continue;
            };

            let inv_mass_a = a.get_inverse_mass();
            let inv_mass_b = b.get_inverse_mass();
            let inv_inertia_a = *a.get_inverse_inertia_world();
            let inv_inertia_b = *b.get_inverse_inertia_world();
            let (vel_a, ang_a, pos_a) = (
                a.get_linear_velocity(),
                a.get_angular_velocity(),
                a.get_position(),
            );
            let (vel_b, ang_b, pos_b) = (
                b.get_linear_velocity(),
                b.get_angular_velocity(),
                b.get_position(),
            );

            if inv_mass_a == 0.0 && inv_mass_b == 0.0 {
                continue;
            }

            let normal = manifold.normal;
            let tangent = {
                let up_cross = normal.cross(&Vec3::y());
                if up_cross.norm_squared() > 0.01 {
                    up_cross.normalize()
                } else {
                    normal.cross(&Vec3::x()).normalize()
                }
            };
            let bitangent = normal.cross(&tangent);

            let mut impulses_a: Vec<(Vec3, Vec3)> = Vec::new();
            let mut impulses_b: Vec<(Vec3, Vec3)> = Vec::new();

            for contact in &manifold.contacts {
                let r_a = contact.position - pos_a;
                let r_b = contact.position - pos_b;

                let rel_vel = vel_b + ang_b.cross(&r_b) - vel_a - ang_a.cross(&r_a);
                let normal_vel = rel_vel.dot(&normal);
                if normal_vel > 0.0 {
                    continue; // Separating
                }

                let angular_term = |r: &Vec3, inv_inertia: &crate::math::Mat3, dir: &Vec3| {
                    let rxd = r.cross(dir);
                    rxd.dot(&(inv_inertia * rxd))
                };

                let normal_mass = inv_mass_a
                    + inv_mass_b
                    + angular_term(&r_a, &inv_inertia_a, &normal)
                    + angular_term(&r_b, &inv_inertia_b, &normal);
                if normal_mass <= 0.0 {
                    continue;
                }

                let restitution = if normal_vel.abs() < self.restitution_threshold {
                    0.0
                } else {
                    manifold.restitution
                };

                // Baumgarte velocity bias recovers penetration beyond the slop
                let bias = (self.bias_factor
                    * (contact.penetration - self.penetration_slop).max(0.0)
                    / dt)
                    .min(self.max_bias_speed);

                let j_n = (-(1.0 + restitution) * normal_vel + bias) / normal_mass;
                if j_n <= 0.0 {
                    continue;
                }
                let normal_impulse = normal * j_n;

                // Friction along the two tangent directions; the combined
                // impulse is clamped to the cone |j_t| <= mu * j_n, so the
                // clamp cannot favor one axis over the other
                let mut tangent_impulse = Vec3::zeros();
                for dir in [&tangent, &bitangent] {
                    let tangent_vel = rel_vel.dot(dir);
                    let tangent_mass = inv_mass_a
                        + inv_mass_b
                        + angular_term(&r_a, &inv_inertia_a, dir)
                        + angular_term(&r_b, &inv_inertia_b, dir);
                    if tangent_mass <= 0.0 {
                        continue;
                    }
                    tangent_impulse += *dir * (-tangent_vel / tangent_mass);
                }
                let max_friction = manifold.friction * j_n;
                let tangent_norm = tangent_impulse.norm();
                if tangent_norm > max_friction {
                    tangent_impulse *= max_friction / tangent_norm;
                }

                let impulse = normal_impulse + tangent_impulse;
                impulses_a.push((-impulse, contact.position));
                impulses_b.push((impulse, contact.position));
            }

            if !impulses_a.is_empty() {
                if let Ok(body_a) = bodies.get_mut(manifold.body_a) {
                    for (impulse, point) in &impulses_a {
                        body_a.apply_impulse_at_point(*impulse, *point);
                    }
                }
                if let Ok(body_b) = bodies.get_mut(manifold.body_b) {
                    for (impulse, point) in &impulses_b {
                        body_b.apply_impulse_at_point(*impulse, *point);
                    }
                }
            }
        }
    }

    /// One sweep of direct position correction for remaining penetration
    pub fn solve_position(&self, manifolds: &[ContactManifold], bodies: &mut BodyStorage<RigidBody>) {
        for manifold in manifolds {
            let (Ok(a), Ok(b)) = (bodies.get(manifold.body_a), bodies.get(manifold.body_b))
            else {
                continue;
            };
            let inv_mass_a = a.get_inverse_mass();
            let inv_mass_b = b.get_inverse_mass();
            let inv_sum = inv_mass_a + inv_mass_b;
            if inv_sum == 0.0 {
                continue;
            }

            let penetration = manifold.max_penetration();
            let depth = (penetration - self.penetration_slop).max(0.0);
            if depth == 0.0 {
                continue;
            }

            let correction = manifold.normal * (self.bias_factor * depth / inv_sum);

            if let Ok(body_a) = bodies.get_mut(manifold.body_a) {
                body_a.apply_position_correction(-correction * inv_mass_a);
            }
            if let Ok(body_b) = bodies.get_mut(manifold.body_b) {
                body_b.apply_position_correction(correction * inv_mass_b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyDesc;
    use crate::bodies::Material;
    use crate::core::ContactPoint;
    use crate::math::Pose;
    use crate::shapes::Shape;

    #[test]
    fn combined_friction_stays_inside_the_cone() {
        let mut bodies = BodyStorage::new();
        let floor = bodies.add(RigidBody::from_desc(BodyDesc::new(
            0.0,
            Material::default(),
            Pose::identity(),
            Shape::cuboid(Vec3::new(10.0, 0.5, 10.0)),
        )));
        let ball = bodies.add(RigidBody::from_desc(BodyDesc::new(
            1.0,
            Material::default(),
            Pose::from_position(Vec3::new(0.0, 1.5, 0.0)),
            Shape::sphere(1.0),
        )));

        // Sliding diagonally while approaching the floor at 1 unit/s
        bodies
            .get_mut(ball)
            .unwrap()
            .set_linear_velocity(Vec3::new(3.0, -1.0, 3.0));

        let mut manifold = ContactManifold::new(floor, ball);
        manifold.normal = Vec3::y();
        manifold.friction = 0.5;
        manifold.restitution = 0.0;
        manifold.add_contact(ContactPoint {
            // Through the ball's center, so no angular terms interfere
            position: Vec3::new(0.0, 1.5, 0.0),
            normal: Vec3::y(),
            penetration: 0.0,
        });

        let solver = ImpulseSolver::new(0.2, 0.005, 0.4, 0.5);
        solver.solve_velocity(&[manifold], &mut bodies, 1.0 / 60.0);

        let v = bodies.get(ball).unwrap().get_linear_velocity();
        // The normal impulse wipes the approach speed of 1, so the
        // tangential change is capped at 0.5 * 1 in combined magnitude
        assert!(v.y.abs() < 1e-4);
        let before = Vec3::new(3.0, 0.0, 3.0);
        let after = Vec3::new(v.x, 0.0, v.z);
        assert!(
            (before - after).norm() <= 0.5 + 1e-4,
            "friction impulse left the cone: {:?}",
            before - after
        );
        // Friction opposes the slide without bending its direction
        assert!((v.x - v.z).abs() < 1e-4);
    }
}
