use crate::states::ControlMode;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `PANOVIEW__PANORAMA__IMAGE_PATH`.
const ENV_PREFIX: &str = "PANOVIEW";
const ENV_SEPARATOR: &str = "__";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub panorama: PanoramaConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub window: WindowConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PanoramaConfig {
    /// Equirectangular image, relative to the asset directory.
    pub image_path: String,
    pub sphere_radius: f32,
    pub sphere_sectors: u32,
    pub sphere_stacks: u32,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            image_path: "panoramas/default.jpg".to_string(),
            sphere_radius: 500.0,
            sphere_sectors: 64,
            sphere_stacks: 32,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    /// Distance the swipe controller keeps from the sphere's center.
    pub orbit_radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            orbit_radius: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub initial_mode: ControlMode,
    pub swipe_sensitivity: f32,
    pub touch_enabled: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            initial_mode: ControlMode::default(),
            swipe_sensitivity: 1.0,
            touch_enabled: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub start_fullscreen: bool,
    /// CSS selector of the canvas to render into on the web.
    pub canvas: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Panoview".to_string(),
            start_fullscreen: false,
            canvas: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized.
    Load(config::ConfigError),
    /// The configuration could not be rendered as TOML.
    Serialize(toml::ser::Error),
    /// The configuration file could not be written.
    Write(std::io::Error),
    /// A value is outside the range the viewer can work with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(err) => write!(f, "failed to load configuration: {err}"),
            ConfigError::Serialize(err) => write!(f, "failed to serialize configuration: {err}"),
            ConfigError::Write(err) => write!(f, "failed to write configuration: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            ConfigError::Write(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

impl ViewerConfig {
    /// Location of the per-user configuration file, if the platform has one.
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "Panoview", "panoview")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads defaults, then the user config file, then environment overrides.
    ///
    /// Any failure is logged and the defaults are used instead.
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Builds the layered configuration. A missing file is not an error.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(?path, "Reading configuration file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Write)?;
        info!(?path, "Saved configuration");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let panorama = &self.panorama;
        if panorama.image_path.trim().is_empty() {
            return Err(ConfigError::Invalid("panorama.image_path is empty".into()));
        }
        if !(panorama.sphere_radius > self.camera.orbit_radius) {
            return Err(ConfigError::Invalid(format!(
                "panorama.sphere_radius ({}) must exceed camera.orbit_radius ({})",
                panorama.sphere_radius, self.camera.orbit_radius
            )));
        }
        if panorama.sphere_sectors < 3 || panorama.sphere_stacks < 2 {
            return Err(ConfigError::Invalid(
                "sphere needs at least 3 sectors and 2 stacks".into(),
            ));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees ({}) must be between 0 and 180",
                self.camera.fov_degrees
            )));
        }
        if !(self.camera.orbit_radius > 0.0) {
            return Err(ConfigError::Invalid(
                "camera.orbit_radius must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("panoview-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [panorama]
            image_path = "panoramas/cloud_forest.jpg"

            [controls]
            initial_mode = "gyro"
            "#,
        )
        .unwrap();

        assert_eq!(config.panorama.image_path, "panoramas/cloud_forest.jpg");
        assert_eq!(config.panorama.sphere_radius, 500.0);
        assert_eq!(config.controls.initial_mode, ControlMode::Gyro);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_validate_rejects_camera_outside_sphere() {
        let mut config = ViewerConfig::default();
        config.panorama.sphere_radius = 0.05;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_degenerate_fov() {
        let mut config = ViewerConfig::default();
        config.camera.fov_degrees = 180.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let path = temp_path("save.toml");
        let mut config = ViewerConfig::default();
        config.panorama.image_path = "panoramas/reef.png".into();
        config.window.start_fullscreen = true;

        config.save(&path).unwrap();
        let loaded = ViewerConfig::load_layered(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_load_layered_reads_file_over_defaults() {
        let path = temp_path("layered.toml");
        std::fs::write(&path, "[camera]\nfov_degrees = 90.0\n").unwrap();

        let loaded = ViewerConfig::load_layered(Some(&path));
        let _ = std::fs::remove_file(&path);

        let loaded = loaded.unwrap();
        assert_eq!(loaded.camera.fov_degrees, 90.0);
        assert_eq!(loaded.panorama, PanoramaConfig::default());
    }

    #[test]
    fn test_load_layered_without_file_is_default() {
        let path = temp_path("absent.toml");
        assert_eq!(
            ViewerConfig::load_layered(Some(&path)).unwrap(),
            ViewerConfig::default()
        );
    }
}
