//! Orrery application framework.
//!
//! Window creation, keyboard controls, the simulation clock and the wiring
//! from the loaded configuration into the scene and renderer.

pub mod clock;
pub mod controls;
pub mod platform;
pub mod setup;
pub mod window;

pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use controls::{Control, ControlSteps, RawKeyEvent, ViewCommand, map_key};
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppError, AppState, run};
