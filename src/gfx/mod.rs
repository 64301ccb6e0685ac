//! # Graphics Module
//!
//! Spatial side of the viewer: the scene graph loaded from the model, the
//! orbit camera that looks at it, and the ray caster that finds what the
//! pointer is over.
//!
//! - **Camera System** ([`camera`]) - Damped orbit camera with distance and clamp-box bounds
//! - **Picking** ([`picking`]) - Ray construction from NDC and ray/AABB tests
//! - **Scene Management** ([`scene`]) - Named node hierarchy with local transforms

pub mod camera;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use picking::ObjectPicker;
pub use scene::SceneGraph;
