//! Orrery viewer: the sun, earth and moon in one window.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p orrery-app -- --resolution 64 --wireframe`.

use clap::Parser;
use orrery_app::PlatformDirs;
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve config directory: {e}");
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = dirs.create_all() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        "Starting orrery: {}x{}, sphere resolution {}, time scale {}",
        config.window.width,
        config.window.height,
        config.render.sphere_resolution,
        config.simulation.time_scale
    );

    if let Err(e) = orrery_app::run(config) {
        error!("Orrery exited with error: {e}");
        std::process::exit(1);
    }
}
