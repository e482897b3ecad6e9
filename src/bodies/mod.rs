mod material;
mod rigid_body;

pub use self::material::{ContactRule, ContactTable, Material};
pub use self::rigid_body::{BodyDesc, RigidBody};
