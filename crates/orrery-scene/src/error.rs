//! Scene error types.

use crate::body::Body;

/// Errors raised by the orbital model and the camera.
///
/// Every variant is detected before any state is modified, so the caller can
/// keep using the previous configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// A periodic motion was configured with a zero period.
    #[error("period must be non-zero")]
    DivideByZero,

    /// The camera cannot produce a view or projection matrix.
    #[error("degenerate camera: {reason}")]
    DegenerateCamera { reason: &'static str },

    /// Eye anchor and look-at target would resolve to the same body.
    #[error("camera cannot use {eye:?} as eye anchor while looking at {look_at:?}")]
    InvalidCameraTarget { eye: Body, look_at: Body },

    /// The body has no orbital placement of its own.
    #[error("{0:?} is not an orbiting body")]
    InvalidBody(Body),
}
