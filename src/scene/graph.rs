use crate::core::{BodyId, PhysicsWorld};
use crate::math::{Quat, Real, Vec3};
use crate::shapes::Shape;
use crate::Result;

/// Renderable geometry carried by a scene node
#[derive(Debug, Clone)]
pub enum Geometry {
    /// A mesh tessellated from a collision shape
    FromShape(Shape),

    /// Decorative box geometry with no physics counterpart
    /// (e.g. a backdrop wall), given as half extents
    DecorBox(Vec3),
}

/// A node's visual transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Position in world space
    pub position: Vec3,

    /// Orientation as a unit quaternion
    pub orientation: Quat,

    /// Per-axis scale
    pub scale: Vec3,
}

impl NodeTransform {
    /// Identity transform with unit scale
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Transform from a position with no rotation and unit scale
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }
}

/// A renderable proxy in the scene.
///
/// For nodes bound to a body, the transform is a derived, read-only
/// mirror of the body's pose: pose sync overwrites it after every tick
/// and nothing else may edit it. The binding is a [`BodyId`]
/// back-reference, never an owning handle.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// What to draw
    pub geometry: Geometry,

    /// The node's world transform
    pub transform: NodeTransform,

    /// Id of the mirrored physics body, if any. Unbound nodes keep the
    /// transform they were created with.
    pub body: Option<BodyId>,

    /// Display color as linear RGB
    pub color: [Real; 3],
}

/// Owns the renderable proxies and mirrors body poses into them
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Creates an empty scene graph
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds a free (unbound) node and returns its index
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Adds a node mirroring the given body. Its transform starts at
    /// identity and is overwritten on the first pose sync.
    pub fn bind(&mut self, body: BodyId, geometry: Geometry, color: [Real; 3]) -> usize {
        self.add_node(SceneNode {
            geometry,
            transform: NodeTransform::identity(),
            body: Some(body),
            color,
        })
    }

    /// Returns the nodes in creation order
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Copies every bound body's pose into its node transform.
    ///
    /// The sync is strictly one-directional (physics to visuals); scale
    /// is left untouched. Unbound nodes are never written. Runs after
    /// the physics steps of a tick, so transforms always reflect the
    /// most recently completed step.
    pub fn sync_poses(&mut self, world: &PhysicsWorld) -> Result<()> {
        for node in &mut self.nodes {
            if let Some(body) = node.body {
                let pose = world.get_pose(body)?;
                node.transform.position = pose.position;
                node.transform.orientation = pose.orientation;
            }
        }
        Ok(())
    }
}
