use crate::math::{Real, Vec3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for the physics world.
///
/// The timestep is fixed for the process lifetime: stepping with the same
/// body set, insertion order and timestep reproduces the same trajectory.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// The fixed simulation timestep in seconds
    pub timestep: Real,

    /// The global gravity vector
    pub gravity: Vec3,

    /// Iterations of the velocity impulse solver per step
    pub solver_iterations: u32,

    /// Iterations of the position correction pass per step
    pub position_iterations: u32,

    /// Baumgarte bias factor for penetration recovery
    pub bias_factor: Real,

    /// Penetration depth tolerated before position correction kicks in
    pub penetration_slop: Real,

    /// Upper bound on the bias velocity, so a deep overlap is recovered
    /// over several steps instead of launching the body
    pub max_bias_speed: Real,

    /// Relative normal speed below which restitution is ignored,
    /// letting stacked bodies come to rest instead of jittering
    pub restitution_threshold: Real,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            solver_iterations: 10,
            position_iterations: 4,
            bias_factor: 0.2,
            penetration_slop: 0.005,
            max_bias_speed: 0.4,
            restitution_threshold: 0.5,
        }
    }
}
