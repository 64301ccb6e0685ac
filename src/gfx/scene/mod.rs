//! # Scene Management Module
//!
//! An arena of named nodes, each with a local [`Transform`] and optional mesh
//! bounds. Models are loaded from OBJ files with one node per mesh.
//!
//! ## Usage
//!
//! ```no_run
//! use roomfolio::gfx::scene::SceneGraph;
//!
//! let mut scene = SceneGraph::load_obj("room.obj")?;
//! scene.center_on_origin();
//! let mug = scene.find_by_name("Coffee_Mug_Pointer_Hover");
//! # Ok::<(), roomfolio::error::SceneError>(())
//! ```

pub mod node;
pub mod scene;

pub use node::{NodeId, SceneNode, Transform};
pub use scene::SceneGraph;
