//! Configuration structs with defaults matching the classic sun/earth/moon scene.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera intrinsics and starting orbit.
    pub camera: CameraConfig,
    /// Body constants and clock settings.
    pub simulation: SimulationConfig,
    /// Texture image paths.
    pub textures: TextureConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Latitude/longitude subdivisions of the shared sphere mesh.
    pub sphere_resolution: u32,
    /// Background clear color (linear RGB).
    pub clear_color: [f64; 3],
    /// Start in wireframe mode.
    pub wireframe: bool,
}

/// Camera configuration. Angles are stored in degrees for readability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Starting free-orbit radius.
    pub radius: f32,
    /// Starting polar angle in degrees.
    pub polar_degrees: f32,
    /// Starting azimuth in degrees.
    pub azimuth_degrees: f32,
    /// Radius change per key press.
    pub radius_step: f32,
    /// Angle change per key press, in degrees.
    pub angle_step_degrees: f32,
}

/// Physical constants of one body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Uniform scale applied to the unit sphere.
    pub size: f32,
    /// Distance from the orbit center.
    pub orbit_radius: f32,
    /// Seconds per revolution around the orbit center.
    pub orbit_period: f32,
    /// Seconds per revolution around the body's own axis.
    pub rotation_period: f32,
    /// Tilt of the rotation axis away from +Z, in degrees.
    pub axial_tilt_degrees: f32,
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier applied to wall-clock seconds.
    pub time_scale: f64,
    /// Color of the light emitted by the sun.
    pub light_color: [f32; 3],
    /// The sun.
    pub sun: BodyConfig,
    /// The earth.
    pub earth: BodyConfig,
    /// The moon.
    pub moon: BodyConfig,
}

/// Texture paths, resolved relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    pub sun: PathBuf,
    pub earth: PathBuf,
    pub moon: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            vsync: true,
            title: "Orrery - Simple Solar System".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_resolution: 32,
            clear_color: [0.0, 0.0, 0.0],
            wireframe: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 80.1,
            radius: 25.0,
            polar_degrees: 90.0,
            azimuth_degrees: 0.0,
            radius_step: 1.0,
            angle_step_degrees: 1.0,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            orbit_radius: 0.0,
            orbit_period: 0.0,
            rotation_period: 0.0,
            axial_tilt_degrees: 0.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let earth_orbit_period = 30.0;
        let earth_rotation_period = 0.5 * earth_orbit_period;
        let moon_period = 0.5 * earth_rotation_period;
        Self {
            time_scale: 1.0,
            light_color: [1.0, 1.0, 0.7],
            sun: BodyConfig::default(),
            earth: BodyConfig {
                size: 0.5,
                orbit_radius: 10.0,
                orbit_period: earth_orbit_period,
                rotation_period: earth_rotation_period,
                axial_tilt_degrees: 23.5,
            },
            moon: BodyConfig {
                size: 0.25,
                orbit_radius: 2.0,
                orbit_period: moon_period,
                rotation_period: moon_period,
                axial_tilt_degrees: 0.0,
            },
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            sun: PathBuf::from("res/media/sun.jpg"),
            earth: PathBuf::from("res/media/earth.jpg"),
            moon: PathBuf::from("res/media/moon.jpg"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1024"));
        assert!(ron_str.contains("sphere_resolution: 32"));
    }

    #[test]
    fn test_default_periods_follow_earth_orbit() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.earth.orbit_period, 30.0);
        assert_eq!(sim.earth.rotation_period, 15.0);
        assert_eq!(sim.moon.orbit_period, 7.5);
        assert_eq!(sim.moon.rotation_period, sim.moon.orbit_period);
    }

    #[test]
    fn test_default_camera_matches_initial_view() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_degrees, 45.0);
        assert_eq!(camera.radius, 25.0);
        assert!(camera.near < camera.far);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: (sphere_resolution: 8))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.render.sphere_resolution, 8);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.simulation.earth.orbit_radius = 12.0;
        config.textures.earth = PathBuf::from("assets/earth_8k.png");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_errors_name_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "(window: (width: \"wide\"))").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        match &err {
            ConfigError::Parse { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
