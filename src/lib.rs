pub mod math;
pub mod shapes;
pub mod bodies;
pub mod core;
pub mod collision;
pub mod scene;
pub mod driver;

/// Re-export common types for easier usage
pub use crate::core::{BodyId, PhysicsWorld, WorldConfig};
pub use crate::bodies::{BodyDesc, ContactRule, Material, RigidBody};
pub use crate::shapes::Shape;
pub use crate::scene::{CameraController, CameraState, DebugFlags, SceneGraph};
pub use crate::driver::{RenderFrame, RenderLoopDriver, Renderer};

/// Error types for the engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum EngineError {
        #[error("Invalid body description: {0}")]
        InvalidBody(String),

        #[error("Body not found: {0:?}")]
        BodyNotFound(crate::core::BodyId),

        #[error("Simulation instability: {0}")]
        Unstable(String),

        #[error("Render surface lost: {0}")]
        SurfaceLost(String),
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, error::EngineError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
