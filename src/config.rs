//! Viewer configuration, read from TOML.
//!
//! Every section is optional; missing values fall back to the tuned defaults
//! of the room layout.
//!
//! ```toml
//! variant = "studio"
//! intro_delay = 0.1
//! ordering = "lenient"
//!
//! [camera]
//! eye = [16.4, -6.6, 8.9]
//! target = [2.8, -15.1, 0.8]
//!
//! [hover]
//! scale_factor = 1.4
//!
//! [social_links]
//! github = "https://github.com/someone"
//! ```

use std::{collections::BTreeMap, path::Path};

use cgmath::{Deg, Rad, Vector3};
use serde::Deserialize;

use crate::{
    error::ConfigError,
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera, OrbitCameraBounds},
        picking::AABB,
    },
    interaction::{
        actions::ActionTable, hover::HoverProfile, modal::ModalStyle, registry::OrderingPolicy,
        variants::WorldVariant,
    },
};

/// Axis-aligned clamp box, `[x, y, z]` corners
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoxConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl From<BoxConfig> for AABB {
    fn from(config: BoxConfig) -> Self {
        AABB::new(config.min.into(), config.max.into())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of pending orbit motion applied per frame
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub target_box: Option<BoxConfig>,
    pub eye_box: Option<BoxConfig>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [-7.0, -8.5, 11.5],
            target: [-2.2, -10.3, 6.45],
            fov: 45.0,
            min_distance: 6.0,
            max_distance: 50.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            target_box: Some(BoxConfig {
                min: [-3.0, -12.0, 4.0],
                max: [1.0, -8.0, 8.0],
            }),
            eye_box: Some(BoxConfig {
                min: [-8.0, -16.0, 4.0],
                max: [2.0, -6.0, 16.0],
            }),
        }
    }
}

impl CameraConfig {
    /// Orbit camera and damped controller for a viewport of `aspect`
    pub fn camera_manager(&self, aspect: f32) -> CameraManager {
        let eye: Vector3<f32> = self.eye.into();
        let target: Vector3<f32> = self.target.into();

        let mut camera = OrbitCamera::looking_at(eye, target, aspect);
        camera.fovy = Rad::from(Deg(self.fov));
        camera.set_bounds(OrbitCameraBounds {
            min_distance: Some(self.min_distance),
            max_distance: Some(self.max_distance),
            target_box: self.target_box.map(AABB::from),
            eye_box: self.eye_box.map(AABB::from),
            ..OrbitCameraBounds::default()
        });
        camera.update_view_proj();

        let controller =
            CameraController::new(self.rotate_speed, self.zoom_speed).with_damping(self.damping);
        CameraManager::new(camera, controller)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// World layout, `room` or `studio`
    pub variant: String,
    pub camera: CameraConfig,
    pub hover: HoverProfile,
    pub modal: ModalStyle,
    /// Seconds between model load and the start of the intro
    pub intro_delay: f32,
    pub ordering: OrderingPolicy,
    /// Icon name (`github`, `linkedin`, `instagram`, `boba`) to URL
    pub social_links: BTreeMap<String, String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            variant: "room".to_string(),
            camera: CameraConfig::default(),
            hover: HoverProfile::default(),
            modal: ModalStyle::default(),
            intro_delay: 0.1,
            ordering: OrderingPolicy::default(),
            social_links: BTreeMap::from([
                (
                    "github".to_string(),
                    "https://github.com/ThomasShikalepo".to_string(),
                ),
                (
                    "linkedin".to_string(),
                    "https://www.linkedin.com/in/thomas-shikalepo".to_string(),
                ),
                (
                    "instagram".to_string(),
                    "https://www.instagram.com/thomas__deon/".to_string(),
                ),
            ]),
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn world_variant(&self) -> Result<WorldVariant, ConfigError> {
        WorldVariant::by_name(&self.variant)
    }

    pub fn action_table(&self) -> ActionTable {
        ActionTable::from_links(&self.social_links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::roles::SocialIcon;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.world_variant().unwrap().name, "room");
        assert_eq!(
            config.action_table().link(SocialIcon::LinkedIn),
            Some("https://www.linkedin.com/in/thomas-shikalepo")
        );
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            variant = "studio"
            ordering = "lenient"

            [hover]
            scale_factor = 1.4

            [camera]
            min_distance = 8.0
            "#,
        )
        .unwrap();

        assert_eq!(config.ordering, OrderingPolicy::Lenient);
        assert_eq!(config.hover.scale_factor, 1.4);
        assert_eq!(config.hover.exit_duration, 0.3);
        assert_eq!(config.camera.min_distance, 8.0);
        assert_eq!(config.camera.max_distance, 50.0);
        assert_eq!(config.world_variant().unwrap().name, "studio");
    }

    #[test]
    fn test_social_links_replace_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [social_links]
            github = "https://github.com/other"
            "#,
        )
        .unwrap();
        let table = config.action_table();
        assert_eq!(table.link(SocialIcon::GitHub), Some("https://github.com/other"));
        assert_eq!(table.link(SocialIcon::Instagram), None);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            ViewerConfig::from_toml_str("intro_delay = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ViewerConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Read { .. })
        ));

        let config = ViewerConfig::from_toml_str("variant = \"attic\"").unwrap();
        assert!(matches!(
            config.world_variant(),
            Err(ConfigError::UnknownVariant(_))
        ));
    }

    #[test]
    fn test_camera_starts_inside_clamp_boxes() {
        let manager = CameraConfig::default().camera_manager(16.0 / 9.0);
        let camera = &manager.camera;
        assert!((camera.fovy.0 - 45f32.to_radians()).abs() < 1e-5);
        assert!(camera.distance >= 6.0 && camera.distance <= 50.0);
        assert!((camera.target - Vector3::new(-2.2, -10.3, 6.45)).x.abs() < 1e-4);
    }
}
