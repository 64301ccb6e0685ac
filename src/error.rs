//! Error types for loading, configuration and registration.

use std::path::PathBuf;

use crate::interaction::roles::Group;

/// Failure to produce a scene graph from a model file
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to load OBJ model {path}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("model {path} contains no meshes")]
    Empty { path: PathBuf },
}

/// Failure to read or interpret the viewer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
    #[error("unknown world variant `{0}` (expected `room` or `studio`)")]
    UnknownVariant(String),
}

/// Failure to order a registry group
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("`{name}` in group {group:?} has no number to sort by")]
    MissingNumericSuffix { group: Group, name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),
}
