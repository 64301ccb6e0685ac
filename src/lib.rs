// src/lib.rs
//! Roomfolio
//!
//! An interactive 3D portfolio room: ray-cast hover feedback, click actions,
//! modal info panels and a choreographed intro, driven by winit and cgmath.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
pub mod viewer;
pub mod world;

// Re-export main types for convenience
pub use app::{RoomViewerApp, SceneRenderer};
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use viewer::Viewer;
