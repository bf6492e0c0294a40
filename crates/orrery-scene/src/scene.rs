//! Per-frame scene state: body transforms and the camera that views them.

use glam::Mat4;

use crate::body::{Body, BodyTransforms};
use crate::camera::{CameraMode, SphericalCamera};
use crate::command::SceneCommand;
use crate::error::SceneError;
use crate::orbit::{SystemConstants, Transform, compute_body_transform};

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug)]
pub struct SceneState {
    constants: SystemConstants,
    transforms: BodyTransforms,
    pub camera: SphericalCamera,
}

impl SceneState {
    /// Build a scene, rejecting constants with a zero period and unusable
    /// camera intrinsics up front.
    pub fn new(constants: SystemConstants, camera: SphericalCamera) -> Result<Self, SceneError> {
        constants.validate()?;
        camera.compute_projection_matrix()?;
        Ok(Self {
            constants,
            transforms: BodyTransforms::identity(),
            camera,
        })
    }

    pub fn constants(&self) -> &SystemConstants {
        &self.constants
    }

    pub fn transforms(&self) -> &BodyTransforms {
        &self.transforms
    }

    /// Model matrix of a node for the current frame.
    pub fn model_matrix(&self, body: Body) -> Mat4 {
        self.transforms[body].to_matrix()
    }

    /// Recompute every body transform for `time` seconds, then place the
    /// camera. Nothing is written if any transform fails.
    pub fn update(&mut self, time: f32) -> Result<(), SceneError> {
        let c = &self.constants;
        let sun = compute_body_transform(Body::Sun, &c.sun, time, None)?;
        let earth = compute_body_transform(Body::Earth, &c.earth, time, None)?;
        let moon = compute_body_transform(Body::Moon, &c.moon, time, Some(&earth))?;

        self.transforms[Body::Sun] = sun;
        self.transforms[Body::Earth] = earth;
        self.transforms[Body::Moon] = moon;

        let mode = self.camera.mode();
        let target = self.transforms.origin(mode.look_at());
        let anchor = self.camera.compute_eye_position(target);
        self.transforms[Body::FreeAnchor] = Transform::from_translation(anchor);

        let eye = self.transforms.origin(mode.eye_anchor());
        self.camera.set_view(eye, target);
        Ok(())
    }

    /// Apply a user command to the camera.
    ///
    /// Orbit adjustments are ignored unless the camera orbits freely.
    /// Targeting errors leave the camera mode untouched.
    pub fn apply(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        if command.is_orbit_adjustment() && !self.camera.mode().is_free_orbit() {
            tracing::trace!(?command, "orbit adjustment ignored while anchored");
            return Ok(());
        }
        match command {
            SceneCommand::AdjustRadius(delta) => self.camera.adjust_radius(delta),
            SceneCommand::AdjustPolar(delta) => self.camera.adjust_polar(delta),
            SceneCommand::AdjustAzimuth(delta) => self.camera.adjust_azimuth(delta),
            SceneCommand::LookAt(body) => self.camera.set_look_at(body)?,
            SceneCommand::AnchorEye(body) => self.camera.set_eye_anchor(body)?,
            SceneCommand::FreeOrbit => self.camera.set_free_orbit(),
        }
        if let CameraMode::Anchored(pair) = self.camera.mode() {
            tracing::trace!(eye = pair.eye().name(), look_at = pair.look_at().name(), "camera anchored");
        }
        Ok(())
    }
}
