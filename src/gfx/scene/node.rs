use cgmath::{Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::gfx::picking::AABB;

/// Index of a node inside a [`SceneGraph`](super::SceneGraph) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node every graph starts with
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform of a scene node.
///
/// Rotation is an Euler triple in radians applied in XYZ order, which is the
/// layout exported by the room models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Compose translation * rotation(XYZ) * scale
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let rotation = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));

        Matrix4::from_translation(self.position)
            * rotation
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A named node of the loaded room model
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    /// Mesh bounds in local space, `None` for pure grouping nodes
    pub local_bounds: Option<AABB>,
    /// Cached world matrix, refreshed by `SceneGraph::update_world_transforms`
    pub world: Matrix4<f32>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, transform: Transform, local_bounds: Option<AABB>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform,
            local_bounds,
            world: Matrix4::identity(),
        }
    }

    /// Only mesh nodes take part in registration and ray casting
    pub fn is_mesh(&self) -> bool {
        self.local_bounds.is_some()
    }

    pub fn world_bounds(&self) -> Option<AABB> {
        self.local_bounds.map(|aabb| aabb.transform(&self.world))
    }
}
