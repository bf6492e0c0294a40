//! Configuration system for the orrery viewer.
//!
//! Settings persist to disk as a RON file, every section falls back to its
//! defaults when missing, and CLI arguments (clap) override loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BodyConfig, CameraConfig, Config, DebugConfig, RenderConfig, SimulationConfig,
    TextureConfig, WindowConfig,
};
pub use error::ConfigError;
