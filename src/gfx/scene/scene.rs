use std::path::Path;

use cgmath::Vector3;

use super::node::{NodeId, SceneNode, Transform};
use crate::{error::SceneError, gfx::picking::AABB};

/// Arena-backed scene graph of the loaded room model.
///
/// Nodes are appended after their parent, so index order is always a valid
/// parent-before-child order for transform propagation.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Creates a graph holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("Scene", Transform::identity(), None)],
        }
    }

    /// Loads an OBJ file, one mesh node per OBJ model under the root.
    ///
    /// Model names are kept verbatim since they carry the interaction tags
    /// (`Hover`, `Pointer`, role names) the registry looks for.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| SceneError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        if models.is_empty() {
            return Err(SceneError::Empty {
                path: path.to_path_buf(),
            });
        }

        let mut graph = Self::new();
        for model in &models {
            let vertices: Vec<[f32; 3]> = model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();

            // Pivot each mesh on its own centre so scale and spin stay in place
            let bounds = AABB::from_vertices(&vertices);
            let center = bounds.center();
            graph.add_node(
                NodeId::ROOT,
                model.name.clone(),
                Transform::from_position(center),
                Some(AABB::new(bounds.min - center, bounds.max - center)),
            );
        }

        log::info!("Loaded {} meshes from {}", models.len(), path.display());
        graph.update_world_transforms();
        Ok(graph)
    }

    /// Appends a node under `parent` and returns its id
    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        local_bounds: Option<AABB>,
    ) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "parent node does not exist");

        let id = NodeId(self.nodes.len());
        let mut node = SceneNode::new(name, transform, local_bounds);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// First node whose name matches exactly
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// Depth-first pre-order walk starting at the root
    pub fn walk_depth_first(&self) -> Vec<NodeId> {
        self.descendants_inclusive(NodeId::ROOT)
    }

    /// `id` followed by all of its descendants, depth-first
    pub fn descendants_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.node(id).is_none() {
            return order;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            // Reverse so the first child is visited first
            for &child in self.nodes[current.index()].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Recomputes every node's world matrix from its local transform
    pub fn update_world_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].transform.to_matrix();
            let world = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent.index()].world * local,
                None => local,
            };
            self.nodes[i].world = world;
        }
    }

    /// Union of all mesh bounds in world space
    pub fn bounding_box(&self) -> Option<AABB> {
        self.nodes
            .iter()
            .filter_map(SceneNode::world_bounds)
            .reduce(|acc, aabb| acc.union(&aabb))
    }

    /// Shifts the root so the model's bounding box is centred on the origin
    pub fn center_on_origin(&mut self) {
        self.update_world_transforms();
        let Some(bounds) = self.bounding_box() else {
            return;
        };

        let center = bounds.center();
        self.nodes[NodeId::ROOT.index()].transform.position -= center;
        self.update_world_transforms();
        log::debug!("Centred model, offset {:?}", -center);
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vector3<f32>> {
        self.node(id).map(|node| node.world.w.truncate())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cgmath::InnerSpace;

    /// Writes an OBJ with one unit cube per `(name, center)` to a temp file
    pub(crate) fn write_cube_obj(file: &str, cubes: &[(&str, [f32; 3])]) -> std::path::PathBuf {
        let mut obj = String::new();
        for (i, (name, [cx, cy, cz])) in cubes.iter().enumerate() {
            obj.push_str(&format!("o {name}\n"));
            for corner in 0..8 {
                let x = cx + if corner & 1 == 0 { -0.5 } else { 0.5 };
                let y = cy + if corner & 2 == 0 { -0.5 } else { 0.5 };
                let z = cz + if corner & 4 == 0 { -0.5 } else { 0.5 };
                obj.push_str(&format!("v {x} {y} {z}\n"));
            }
            let base = i * 8;
            for [a, b, c] in [[1, 2, 4], [1, 4, 3], [5, 6, 8], [5, 8, 7]] {
                obj.push_str(&format!("f {} {} {}\n", base + a, base + b, base + c));
            }
        }

        let path = std::env::temp_dir().join(format!("{}_{file}.obj", std::process::id()));
        std::fs::write(&path, obj).unwrap();
        path
    }

    fn unit_box() -> Option<AABB> {
        Some(AABB::new(
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new(0.5, 0.5, 0.5),
        ))
    }

    #[test]
    fn test_depth_first_order() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(NodeId::ROOT, "a", Transform::identity(), None);
        let b = graph.add_node(NodeId::ROOT, "b", Transform::identity(), None);
        let a1 = graph.add_node(a, "a1", Transform::identity(), unit_box());
        let b1 = graph.add_node(b, "b1", Transform::identity(), unit_box());

        assert_eq!(graph.walk_depth_first(), vec![NodeId::ROOT, a, a1, b, b1]);
    }

    #[test]
    fn test_world_transform_propagates() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_node(
            NodeId::ROOT,
            "parent",
            Transform::from_position(Vector3::new(1.0, 0.0, 0.0)),
            None,
        );
        let child = graph.add_node(
            parent,
            "child",
            Transform::from_position(Vector3::new(0.0, 2.0, 0.0)),
            unit_box(),
        );
        graph.update_world_transforms();

        let position = graph.world_position(child).unwrap();
        assert!((position.x - 1.0).abs() < 1e-5);
        assert!((position.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_on_origin() {
        let mut graph = SceneGraph::new();
        graph.add_node(
            NodeId::ROOT,
            "left",
            Transform::from_position(Vector3::new(10.0, 0.0, 0.0)),
            unit_box(),
        );
        graph.add_node(
            NodeId::ROOT,
            "right",
            Transform::from_position(Vector3::new(20.0, 4.0, 0.0)),
            unit_box(),
        );

        graph.center_on_origin();
        let center = graph.bounding_box().unwrap().center();
        assert!(center.x.abs() < 1e-4);
        assert!(center.y.abs() < 1e-4);
        assert!(center.z.abs() < 1e-4);
    }

    #[test]
    fn test_loaded_meshes_pivot_on_their_centre() {
        let path = write_cube_obj(
            "pivot",
            &[("Mug", [3.0, 1.0, -2.0]), ("Lamp", [-5.0, 0.0, 0.0])],
        );
        let graph = SceneGraph::load_obj(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let mug = graph.node(graph.find_by_name("Mug").unwrap()).unwrap();
        assert!((mug.transform.position - Vector3::new(3.0, 1.0, -2.0)).magnitude() < 1e-5);
        let local = mug.local_bounds.unwrap();
        assert!(local.center().magnitude() < 1e-5);
        assert!((local.max - Vector3::new(0.5, 0.5, 0.5)).magnitude() < 1e-5);

        // World bounds still sit where the vertices were
        let world = mug.world_bounds().unwrap();
        assert!((world.center() - Vector3::new(3.0, 1.0, -2.0)).magnitude() < 1e-5);
    }
}
