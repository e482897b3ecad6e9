pub mod config;
pub mod storage;
pub mod world;

pub use self::config::WorldConfig;
pub use self::storage::BodyStorage;
pub use self::world::PhysicsWorld;

use crate::math::Vec3;

/// A unique identifier for a body in the physics world.
///
/// Ids are dense indices into insertion-ordered storage; callers hold ids,
/// never direct body references, so the world may reorganize storage freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) u32);

impl BodyId {
    /// Returns the raw index value
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A contact point between two bodies
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// The position of the contact point in world space
    pub position: Vec3,

    /// The contact normal, pointing from body A toward body B
    pub normal: Vec3,

    /// The penetration depth of the contact
    pub penetration: f32,
}
