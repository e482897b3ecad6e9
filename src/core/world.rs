use crate::bodies::{BodyDesc, ContactRule, ContactTable, Material, RigidBody};
use crate::collision::{candidate_pairs, generate_manifolds, ImpulseSolver};
use crate::core::{BodyId, BodyStorage, WorldConfig};
use crate::math::{vec_is_finite, Pose, Real, Vec3};
use crate::Result;

use log::{debug, warn};

/// The physics world: sole owner of all rigid bodies plus the fixed-step
/// simulation pipeline.
///
/// Stepping is deterministic: the same configuration, body set and
/// insertion order always reproduce the same trajectory. Callers address
/// bodies only through [`BodyId`] values handed out at creation.
pub struct PhysicsWorld {
    bodies: BodyStorage<RigidBody>,
    contacts: ContactTable,
    config: WorldConfig,
    time: Real,
}

impl PhysicsWorld {
    /// Creates a world with default configuration
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world with the given configuration
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            contacts: ContactTable::default(),
            config,
            time: 0.0,
        }
    }

    /// Returns the fixed timestep in seconds
    pub fn timestep(&self) -> Real {
        self.config.timestep
    }

    /// Returns the total simulated time
    pub fn get_time(&self) -> Real {
        self.time
    }

    /// Sets the global gravity vector
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Returns the current gravity vector
    pub fn get_gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Returns a reference to the configuration
    pub fn get_config(&self) -> &WorldConfig {
        &self.config
    }

    /// Validates a body description and adds the body to the world.
    ///
    /// Configuration errors (no shapes, negative or non-finite mass,
    /// damping outside [0, 1], non-finite pose) fail fast here; nothing
    /// is added on error. Bodies live for the rest of the run.
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyId> {
        desc.validate()?;
        let body = RigidBody::from_desc(desc);
        let id = self.bodies.add(body);
        debug!("created body {:?} ({} total)", id, self.bodies.len());
        Ok(id)
    }

    /// Returns the pose of a body
    pub fn get_pose(&self, id: BodyId) -> Result<Pose> {
        Ok(self.bodies.get(id)?.get_pose())
    }

    /// Returns a reference to a body
    pub fn get_body(&self, id: BodyId) -> Result<&RigidBody> {
        self.bodies.get(id)
    }

    /// Returns a mutable reference to a body
    pub fn get_body_mut(&mut self, id: BodyId) -> Result<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Registers a pair-specific contact rule
    pub fn add_contact_rule(&mut self, a: &Material, b: &Material, rule: ContactRule) {
        self.contacts.add_rule(a, b, rule);
    }

    /// Advances the simulation by exactly one fixed timestep.
    ///
    /// The pipeline: apply gravity and damping to velocities, pair up
    /// bodies in the naive all-pairs broadphase, generate contact
    /// manifolds in the narrowphase, relax contacts with the iterative
    /// impulse solver, then integrate velocities into poses with
    /// semi-implicit Euler. A post-step sanity check catches non-finite
    /// state before it can spread to later frames.
    pub fn step(&mut self) {
        let dt = self.config.timestep;
        let gravity = self.config.gravity;

        let snapshot: Vec<Pose> = self.bodies.iter().map(|(_, b)| b.get_pose()).collect();

        for (_, body) in self.bodies.iter_mut() {
            body.integrate_forces(&gravity, dt);
        }

        let pairs = candidate_pairs(&self.bodies);
        let mut manifolds = generate_manifolds(&self.bodies, &pairs);

        let solver = ImpulseSolver::new(
            self.config.bias_factor,
            self.config.penetration_slop,
            self.config.max_bias_speed,
            self.config.restitution_threshold,
        );
        solver.prepare(&mut manifolds, &self.bodies, &self.contacts);
        for _ in 0..self.config.solver_iterations {
            solver.solve_velocity(&manifolds, &mut self.bodies, dt);
        }

        for (_, body) in self.bodies.iter_mut() {
            body.integrate_velocity(dt);
        }

        for _ in 0..self.config.position_iterations {
            solver.solve_position(&manifolds, &mut self.bodies);
        }

        self.sanity_check(&snapshot);

        self.time += dt;
    }

    /// Detects non-finite velocity or position after a step (degenerate
    /// contact geometry can produce one) and recovers by zeroing the
    /// offending body's velocities, restoring its pre-step pose when the
    /// pose itself went bad. The event is logged rather than silently
    /// freezing the scene.
    fn sanity_check(&mut self, snapshot: &[Pose]) {
        for (id, body) in self.bodies.iter_mut() {
            let velocity_ok = vec_is_finite(&body.get_linear_velocity())
                && vec_is_finite(&body.get_angular_velocity());
            let pose_ok = body.get_pose().is_finite();

            if velocity_ok && pose_ok {
                continue;
            }

            warn!(
                "non-finite state on body {:?} after step {} (velocity ok: {}, pose ok: {}); resetting velocity",
                id, self.time, velocity_ok, pose_ok
            );

            body.reset_velocities();
            if !pose_ok {
                if let Some(previous) = snapshot.get(id.index()) {
                    body.restore_pose(*previous);
                }
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
