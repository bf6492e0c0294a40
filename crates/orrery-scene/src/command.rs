//! User intents that mutate the scene between frames.

use crate::body::Body;

/// A single camera command, decoded from input by the application.
///
/// Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneCommand {
    AdjustRadius(f32),
    AdjustPolar(f32),
    AdjustAzimuth(f32),
    /// Look at a body, keeping the eye anchor.
    LookAt(Body),
    /// Pin the eye to a body, keeping the look-at target.
    AnchorEye(Body),
    /// Orbit freely around the current look-at target.
    FreeOrbit,
}

impl SceneCommand {
    /// Orbit adjustments only take effect while the camera orbits freely.
    pub fn is_orbit_adjustment(&self) -> bool {
        matches!(
            self,
            SceneCommand::AdjustRadius(_)
                | SceneCommand::AdjustPolar(_)
                | SceneCommand::AdjustAzimuth(_)
        )
    }
}
