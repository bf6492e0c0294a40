//! Command-line argument parsing for the orrery viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Interactive sun/earth/moon orrery")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Sphere mesh resolution (latitude/longitude subdivisions).
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Simulation speed multiplier.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Start in wireframe mode.
    #[arg(long)]
    pub wireframe: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(resolution) = args.resolution {
            self.render.sphere_resolution = resolution;
        }
        if let Some(scale) = args.time_scale {
            self.simulation.time_scale = scale;
        }
        if args.wireframe {
            self.render.wireframe = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            resolution: Some(64),
            wireframe: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.render.sphere_resolution, 64);
        assert!(config.render.wireframe);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 768);
        assert_eq!(config.simulation.time_scale, 1.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--time-scale",
            "2.5",
            "--log-level",
            "debug",
            "--config",
            "/tmp/orrery",
        ]);
        assert_eq!(args.time_scale, Some(2.5));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/orrery")));
        assert!(!args.wireframe);
    }
}
