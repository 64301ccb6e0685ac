//! # Object Picking System
//!
//! Pointer ray casting against the room's interactive meshes.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Convert normalized device coordinates to a world-space ray
//! 2. **Ray-Object Intersection**: Test the ray against world-space bounding boxes,
//!    descending into each candidate's child geometry
//! 3. **Ordering**: Return every hit sorted nearest first
//!
//! ## Usage
//!
//! ```no_run
//! use roomfolio::gfx::picking::ObjectPicker;
//! # use roomfolio::gfx::{OrbitCamera, scene::SceneGraph};
//! # let camera = OrbitCamera::new(5.0, 0.4, 0.2, cgmath::Vector3::new(0.0, 0.0, 0.0), 1.0);
//! # let scene = SceneGraph::new();
//! let picker = ObjectPicker::new();
//! let ray = picker.ray_from_ndc((0.0, 0.0), &camera);
//! if let Some(hit) = picker.intersect(&ray, &scene, &[]).first() {
//!     println!("Nearest node: {:?}", hit.node);
//! }
//! ```

use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{NodeId, SceneGraph},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Tightest box around `vertices`, empty input gives a zero box at the origin
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some((first, rest)) = vertices.split_first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let start = Vector3::from(*first);
        rest.iter().fold(Self::new(start, start), |bounds, vertex| {
            let point = Vector3::from(*vertex);
            bounds.union(&Self::new(point, point))
        })
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// World box enclosing this box's eight corners after `matrix`
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|bits| {
                let corner = Vector4::new(
                    if bits & 1 == 0 { self.min.x } else { self.max.x },
                    if bits & 2 == 0 { self.min.y } else { self.max.y },
                    if bits & 4 == 0 { self.min.z } else { self.max.z },
                    1.0,
                );
                let moved = matrix * corner;
                (moved.truncate() / moved.w).into()
            })
            .collect();

        Self::from_vertices(&corners)
    }

    /// True when every axis has zero extent, as for a node scaled to zero
    pub fn is_degenerate(&self) -> bool {
        let extent = self.max - self.min;
        extent.x <= f32::EPSILON && extent.y <= f32::EPSILON && extent.z <= f32::EPSILON
    }
}

/// One ray hit against a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The node whose geometry was hit (a candidate or one of its descendants)
    pub node: NodeId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Ray caster for pointer hover and click resolution
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectPicker;

impl ObjectPicker {
    pub fn new() -> Self {
        Self
    }

    /// Convert normalized device coordinates (both axes in [-1, 1], +y up) to a world-space ray
    pub fn ray_from_ndc(&self, ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
        let (ndc_x, ndc_y) = ndc;

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix =
            cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let view_proj_matrix = proj_matrix * view_matrix;
        let inv_view_proj = view_proj_matrix
            .invert()
            .unwrap_or(Matrix4::from_scale(1.0));

        // Near and far plane points in OpenGL clip space
        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Intersects `ray` with every candidate and its child geometry.
    ///
    /// Hits are sorted by distance, nearest first. A node reachable from two
    /// candidates is reported once.
    pub fn intersect(
        &self,
        ray: &Ray,
        scene: &SceneGraph,
        candidates: &[NodeId],
    ) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = Vec::new();

        for &candidate in candidates {
            for id in scene.descendants_inclusive(candidate) {
                if hits.iter().any(|hit| hit.node == id) {
                    continue;
                }
                let Some(bounds) = scene.node(id).and_then(|node| node.world_bounds()) else {
                    continue;
                };
                // Nodes hidden at scale zero are not pickable
                if bounds.is_degenerate() {
                    continue;
                }
                if let Some(distance) = bounds.intersect_ray(ray) {
                    hits.push(Intersection {
                        node: id,
                        distance,
                        point: ray.point_at(distance),
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        // Ray hitting the box
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        // Ray missing the box
        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    fn unit_box() -> Option<AABB> {
        Some(AABB::new(
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new(0.5, 0.5, 0.5),
        ))
    }

    #[test]
    fn test_intersections_sorted_nearest_first() {
        let mut scene = SceneGraph::new();
        let far = scene.add_node(
            NodeId::ROOT,
            "far",
            Transform::from_position(Vector3::new(0.0, 0.0, 10.0)),
            unit_box(),
        );
        let near = scene.add_node(
            NodeId::ROOT,
            "near",
            Transform::from_position(Vector3::new(0.0, 0.0, 3.0)),
            unit_box(),
        );
        scene.update_world_transforms();

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let hits = ObjectPicker::new().intersect(&ray, &scene, &[far, near]);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
    }

    #[test]
    fn test_intersection_descends_into_children() {
        let mut scene = SceneGraph::new();
        let group = scene.add_node(NodeId::ROOT, "group", Transform::identity(), None);
        let child = scene.add_node(
            group,
            "child",
            Transform::from_position(Vector3::new(0.0, 0.0, 5.0)),
            unit_box(),
        );
        scene.update_world_transforms();

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let hits = ObjectPicker::new().intersect(&ray, &scene, &[group]);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, child);
    }

    #[test]
    fn test_zero_scale_is_not_pickable() {
        let mut scene = SceneGraph::new();
        let hidden = scene.add_node(
            NodeId::ROOT,
            "hidden",
            Transform {
                position: Vector3::new(0.0, 0.0, 5.0),
                rotation: Vector3::zero(),
                scale: Vector3::zero(),
            },
            unit_box(),
        );
        scene.update_world_transforms();

        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(ObjectPicker::new().intersect(&ray, &scene, &[hidden]).is_empty());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let ray = ObjectPicker::new().ray_from_ndc((0.0, 0.0), &camera);

        let to_target = (camera.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }
}
