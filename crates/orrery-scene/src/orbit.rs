//! Closed-form orbital and rotational placement of bodies.
//!
//! Orbits are circles in the XY plane parameterized by elapsed time; nothing
//! is integrated. A body's transform is composed as
//! translate(orbit position) · rotate(self axis, phase) · scale(size).

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};

use crate::body::Body;
use crate::error::SceneError;

/// Angle swept by a periodic motion of `period` seconds after `time` seconds.
///
/// Returns [`SceneError::DivideByZero`] when `period` is zero.
pub fn compute_phase(period: f32, time: f32) -> Result<f32, SceneError> {
    if period == 0.0 {
        return Err(SceneError::DivideByZero);
    }
    Ok(TAU * time / period)
}

/// Decomposed local-to-world transform of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// A pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// The model matrix `T · R · S`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }

    /// World position of the local origin, i.e. `M · (0, 0, 0, 1)`.
    pub fn origin(&self) -> Vec3 {
        self.translation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Physical constants of one body. Periods are in seconds, angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyConstants {
    pub size: f32,
    pub orbit_radius: f32,
    pub orbit_period: f32,
    pub rotation_period: f32,
    /// Tilt of the self-rotation axis away from +Z, towards +X.
    pub axial_tilt: f32,
}

impl BodyConstants {
    /// Unit self-rotation axis `(sin tilt, 0, cos tilt)`.
    pub fn rotation_axis(&self) -> Vec3 {
        Vec3::new(self.axial_tilt.sin(), 0.0, self.axial_tilt.cos())
    }

    /// Position on the orbit circle relative to the orbit center.
    pub fn orbit_offset(&self, time: f32) -> Result<Vec3, SceneError> {
        let phase = compute_phase(self.orbit_period, time)?;
        Ok(Vec3::new(
            self.orbit_radius * phase.cos(),
            self.orbit_radius * phase.sin(),
            0.0,
        ))
    }
}

/// Constants for the whole system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SystemConstants {
    pub sun: BodyConstants,
    pub earth: BodyConstants,
    pub moon: BodyConstants,
}

impl SystemConstants {
    /// Constants of a celestial body, `None` for the free anchor.
    pub fn get(&self, body: Body) -> Option<&BodyConstants> {
        match body {
            Body::Sun => Some(&self.sun),
            Body::Earth => Some(&self.earth),
            Body::Moon => Some(&self.moon),
            Body::FreeAnchor => None,
        }
    }

    /// Reject zero periods on every motion that is evaluated each frame.
    ///
    /// The sun neither orbits nor spins, so its periods are not inspected.
    pub fn validate(&self) -> Result<(), SceneError> {
        for constants in [&self.earth, &self.moon] {
            compute_phase(constants.orbit_period, 0.0)?;
            compute_phase(constants.rotation_period, 0.0)?;
        }
        Ok(())
    }
}

impl Default for SystemConstants {
    fn default() -> Self {
        let earth_orbit_period = 30.0;
        let earth_rotation_period = 0.5 * earth_orbit_period;
        let moon_period = 0.5 * earth_rotation_period;
        Self {
            sun: BodyConstants {
                size: 1.0,
                orbit_radius: 0.0,
                orbit_period: 0.0,
                rotation_period: 0.0,
                axial_tilt: 0.0,
            },
            earth: BodyConstants {
                size: 0.5,
                orbit_radius: 10.0,
                orbit_period: earth_orbit_period,
                rotation_period: earth_rotation_period,
                axial_tilt: 23.5_f32.to_radians(),
            },
            moon: BodyConstants {
                size: 0.25,
                orbit_radius: 2.0,
                orbit_period: moon_period,
                rotation_period: moon_period,
                axial_tilt: 0.0,
            },
        }
    }
}

/// Compute a body's transform at `time` seconds.
///
/// - Sun: fixed at the origin, unrotated, scaled by `size`.
/// - Earth: orbits the world origin and spins about its tilted axis. `parent`
///   is ignored.
/// - Moon: orbits the *translation* of `parent` (the world origin when absent)
///   and spins about world +Z. The parent's rotation and scale never reach the
///   moon, so its orbital plane stays independent of the earth's tilt.
/// - Free anchor: [`SceneError::InvalidBody`]; the camera places it.
pub fn compute_body_transform(
    body: Body,
    constants: &BodyConstants,
    time: f32,
    parent: Option<&Transform>,
) -> Result<Transform, SceneError> {
    match body {
        Body::Sun => Ok(Transform {
            scale: constants.size,
            ..Transform::IDENTITY
        }),
        Body::Earth => {
            let translation = constants.orbit_offset(time)?;
            let spin = compute_phase(constants.rotation_period, time)?;
            Ok(Transform {
                translation,
                rotation: Quat::from_axis_angle(constants.rotation_axis(), spin),
                scale: constants.size,
            })
        }
        Body::Moon => {
            let center = parent.map_or(Vec3::ZERO, |p| p.translation);
            let translation = center + constants.orbit_offset(time)?;
            let spin = compute_phase(constants.rotation_period, time)?;
            Ok(Transform {
                translation,
                rotation: Quat::from_rotation_z(spin),
                scale: constants.size,
            })
        }
        Body::FreeAnchor => Err(SceneError::InvalidBody(body)),
    }
}
