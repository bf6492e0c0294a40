//! Scene model for the orrery: closed-form orbital placement of the sun,
//! earth and moon, and a spherical camera that can be anchored to a body or
//! orbit freely around one.
//!
//! Everything here is pure CPU math over [`glam`] types; the renderer only
//! consumes the resulting matrices.

pub mod body;
pub mod camera;
pub mod command;
pub mod error;
pub mod orbit;
pub mod scene;

pub use body::{Body, BodyTransforms};
pub use camera::{
    AnchorPair, CameraMode, MAX_POLAR, MIN_POLAR, MIN_RADIUS, SphericalCamera,
};
pub use command::SceneCommand;
pub use error::SceneError;
pub use orbit::{BodyConstants, SystemConstants, Transform, compute_body_transform, compute_phase};
pub use scene::SceneState;
