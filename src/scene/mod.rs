mod camera;
mod graph;
mod overlay;

pub use self::camera::{CameraController, CameraState, OrbitParams, PointerEvent};
pub use self::graph::{Geometry, NodeTransform, SceneGraph, SceneNode};
pub use self::overlay::{overlay_lines, DebugFlags};
