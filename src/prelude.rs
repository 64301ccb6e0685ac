//! # Roomfolio Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use roomfolio::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     let config = ViewerConfig::load("viewer.toml")?;
//!     let mut app = RoomViewerApp::new(&config)?;
//!     app.load_model("room.obj")?;
//!     app.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::{RoomViewerApp, SceneRenderer};
pub use crate::config::{CameraConfig, ViewerConfig};
pub use crate::error::{ConfigError, RegistryError, SceneError, ViewerError};
pub use crate::viewer::Viewer;
pub use crate::world::{PanelId, PanelVisual, World};

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraManager, CameraUniform};
pub use crate::gfx::scene::{NodeId, SceneGraph, Transform};

// Re-export interaction types
pub use crate::interaction::{
    CursorStyle, HoverState, IntroPhase, ModalState, RecordedEffects, ViewerEffects,
    WorldVariant,
};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
