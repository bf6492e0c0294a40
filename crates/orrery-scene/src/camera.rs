//! Spherical-coordinate camera that is either pinned to a body or orbits
//! freely around the body it looks at.
//!
//! Angles follow the physics convention: the polar angle θ is measured from
//! +Z (the up axis) and the azimuth φ from +X in the XY orbital plane.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::body::Body;
use crate::error::SceneError;

/// Smallest orbit radius the camera can be pulled in to.
pub const MIN_RADIUS: f32 = 1.0;
/// Polar angle limit near the +Z pole (5°).
pub const MIN_POLAR: f32 = 5.0 * PI / 180.0;
/// Polar angle limit near the -Z pole (175°).
pub const MAX_POLAR: f32 = 175.0 * PI / 180.0;

const DEGENERATE_EPSILON: f32 = 1e-6;

/// An eye anchor and a look-at target that are guaranteed to be distinct
/// celestial bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorPair {
    eye: Body,
    look_at: Body,
}

impl AnchorPair {
    /// Pair two bodies, rejecting identical bodies and the free anchor.
    pub fn new(eye: Body, look_at: Body) -> Result<Self, SceneError> {
        if eye == look_at || !eye.is_celestial() || !look_at.is_celestial() {
            return Err(SceneError::InvalidCameraTarget { eye, look_at });
        }
        Ok(Self { eye, look_at })
    }

    pub fn eye(&self) -> Body {
        self.eye
    }

    pub fn look_at(&self) -> Body {
        self.look_at
    }
}

/// How the camera's eye and look-at point are derived each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Eye sits at one body's origin, looking at another's.
    Anchored(AnchorPair),
    /// Eye is placed on a sphere around the look-at body.
    FreeOrbit { look_at: Body },
}

impl CameraMode {
    /// The body whose origin is the look-at point.
    pub fn look_at(&self) -> Body {
        match self {
            CameraMode::Anchored(pair) => pair.look_at(),
            CameraMode::FreeOrbit { look_at } => *look_at,
        }
    }

    /// The node whose origin is the eye; the free anchor while orbiting.
    pub fn eye_anchor(&self) -> Body {
        match self {
            CameraMode::Anchored(pair) => pair.eye(),
            CameraMode::FreeOrbit { .. } => Body::FreeAnchor,
        }
    }

    pub fn is_free_orbit(&self) -> bool {
        matches!(self, CameraMode::FreeOrbit { .. })
    }
}

/// Perspective camera with a spherical free-orbit parameterization.
///
/// Radius and polar angle are kept inside their limits by every mutator; the
/// intrinsics are public and validated when the projection is built.
#[derive(Clone, Debug)]
pub struct SphericalCamera {
    radius: f32,
    polar: f32,
    azimuth: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    eye: Vec3,
    look_at_point: Vec3,
    up: Vec3,
    mode: CameraMode,
}

impl Default for SphericalCamera {
    /// 45° fov on a 1024×768 window, 25 units out in the orbital plane, pinned
    /// to the earth and looking at the moon.
    fn default() -> Self {
        let mode = CameraMode::Anchored(AnchorPair {
            eye: Body::Earth,
            look_at: Body::Moon,
        });
        Self::new(45f32.to_radians(), 1024.0 / 768.0, 0.1, 80.1, mode)
    }
}

impl SphericalCamera {
    /// Create a camera at radius 25, θ = 90°, φ = 0 with the given intrinsics.
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32, mode: CameraMode) -> Self {
        Self {
            radius: 25.0,
            polar: PI / 2.0,
            azimuth: 0.0,
            fov_y,
            aspect,
            near,
            far,
            eye: Vec3::ZERO,
            look_at_point: Vec3::ZERO,
            up: Vec3::Z,
            mode,
        }
    }

    /// Replace the orbit parameters, clamping radius and polar angle and
    /// wrapping the azimuth into `[0, 2π)`.
    pub fn set_orbit(&mut self, radius: f32, polar: f32, azimuth: f32) {
        self.radius = radius.max(MIN_RADIUS);
        self.polar = polar.clamp(MIN_POLAR, MAX_POLAR);
        self.azimuth = azimuth.rem_euclid(TAU);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Polar angle θ in radians.
    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Azimuth φ in radians.
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_at_point(&self) -> Vec3 {
        self.look_at_point
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Move the orbit in or out, never closer than [`MIN_RADIUS`].
    pub fn adjust_radius(&mut self, delta: f32) {
        self.radius = (self.radius + delta).max(MIN_RADIUS);
    }

    /// Tilt the orbit, clamped to `[MIN_POLAR, MAX_POLAR]`.
    pub fn adjust_polar(&mut self, delta: f32) {
        self.polar = (self.polar + delta).clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Spin the orbit. Leaving `[0, 2π]` snaps to the opposite end, so a
    /// single step never lands outside the range.
    pub fn adjust_azimuth(&mut self, delta: f32) {
        self.azimuth += delta;
        if self.azimuth < 0.0 {
            self.azimuth = TAU;
        } else if self.azimuth > TAU {
            self.azimuth = 0.0;
        }
    }

    /// Point on the orbit sphere around `target`.
    pub fn compute_eye_position(&self, target: Vec3) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        target
            + self.radius * Vec3::new(sin_polar * cos_azimuth, sin_polar * sin_azimuth, cos_polar)
    }

    /// Store the world-space eye and look-at point for the current frame.
    pub fn set_view(&mut self, eye: Vec3, look_at_point: Vec3) {
        self.eye = eye;
        self.look_at_point = look_at_point;
    }

    /// Update the aspect ratio from a surface size. A zero height (minimized
    /// window) keeps the previous ratio.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Right-handed look-at matrix from the stored eye and look-at point.
    pub fn compute_view_matrix(&self) -> Result<Mat4, SceneError> {
        let forward = self.look_at_point - self.eye;
        if forward.length_squared() <= DEGENERATE_EPSILON {
            return Err(SceneError::DegenerateCamera {
                reason: "eye coincides with look-at point",
            });
        }
        if forward.normalize().cross(self.up).length_squared() <= DEGENERATE_EPSILON {
            return Err(SceneError::DegenerateCamera {
                reason: "up vector is parallel to view direction",
            });
        }
        Ok(Mat4::look_at_rh(self.eye, self.look_at_point, self.up))
    }

    /// Right-handed perspective matrix with depth mapped to `[0, 1]`.
    pub fn compute_projection_matrix(&self) -> Result<Mat4, SceneError> {
        if self.near <= 0.0 || self.near >= self.far {
            return Err(SceneError::DegenerateCamera {
                reason: "clip planes must satisfy 0 < near < far",
            });
        }
        if self.aspect <= 0.0 || !self.aspect.is_finite() {
            return Err(SceneError::DegenerateCamera {
                reason: "aspect ratio must be positive",
            });
        }
        if self.fov_y <= 0.0 || self.fov_y >= PI {
            return Err(SceneError::DegenerateCamera {
                reason: "field of view must lie in (0, π)",
            });
        }
        Ok(Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far))
    }

    /// Look at another body, keeping the current eye anchor.
    ///
    /// Fails without changing the mode if the body is the eye anchor or the
    /// free anchor.
    pub fn set_look_at(&mut self, body: Body) -> Result<(), SceneError> {
        let mode = match self.mode {
            CameraMode::Anchored(pair) => CameraMode::Anchored(AnchorPair::new(pair.eye(), body)?),
            CameraMode::FreeOrbit { .. } if body.is_celestial() => {
                CameraMode::FreeOrbit { look_at: body }
            }
            CameraMode::FreeOrbit { .. } => {
                return Err(SceneError::InvalidCameraTarget {
                    eye: Body::FreeAnchor,
                    look_at: body,
                });
            }
        };
        self.mode = mode;
        Ok(())
    }

    /// Pin the eye to a body, keeping the current look-at target. Anchoring at
    /// [`Body::FreeAnchor`] switches to free orbit.
    pub fn set_eye_anchor(&mut self, body: Body) -> Result<(), SceneError> {
        if body == Body::FreeAnchor {
            self.set_free_orbit();
            return Ok(());
        }
        self.mode = CameraMode::Anchored(AnchorPair::new(body, self.mode.look_at())?);
        Ok(())
    }

    /// Orbit freely around the current look-at target.
    pub fn set_free_orbit(&mut self) {
        self.mode = CameraMode::FreeOrbit {
            look_at: self.mode.look_at(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_camera() -> SphericalCamera {
        let mut camera = SphericalCamera::default();
        camera.set_free_orbit();
        camera
    }

    fn assert_in_limits(camera: &SphericalCamera) {
        assert!(camera.radius() >= MIN_RADIUS, "radius {}", camera.radius());
        assert!(
            (MIN_POLAR..=MAX_POLAR).contains(&camera.polar()),
            "polar {}",
            camera.polar()
        );
        assert!(
            (0.0..=TAU).contains(&camera.azimuth()),
            "azimuth {}",
            camera.azimuth()
        );
    }

    #[test]
    fn test_default_is_earth_looking_at_moon() {
        let camera = SphericalCamera::default();
        assert_eq!(
            camera.mode(),
            CameraMode::Anchored(AnchorPair::new(Body::Earth, Body::Moon).unwrap())
        );
        assert_eq!(camera.up(), Vec3::Z);
        assert_eq!(camera.radius(), 25.0);
    }

    #[test]
    fn test_radius_clamped_to_minimum() {
        let mut camera = free_camera();
        camera.adjust_radius(-100.0);
        assert_eq!(camera.radius(), MIN_RADIUS);
        camera.adjust_radius(2.5);
        assert_eq!(camera.radius(), MIN_RADIUS + 2.5);
    }

    #[test]
    fn test_polar_clamped_at_both_poles() {
        let mut camera = free_camera();
        camera.adjust_polar(-10.0);
        assert_eq!(camera.polar(), MIN_POLAR);
        camera.adjust_polar(10.0);
        assert_eq!(camera.polar(), MAX_POLAR);
    }

    #[test]
    fn test_azimuth_wraps_in_single_step() {
        let mut camera = free_camera();
        camera.adjust_azimuth(-1f32.to_radians());
        assert_eq!(camera.azimuth(), TAU);
        camera.adjust_azimuth(1f32.to_radians());
        assert_eq!(camera.azimuth(), 0.0);
    }

    #[test]
    fn test_adjustment_sequences_stay_in_limits() {
        let mut camera = free_camera();
        // Small LCG so the sequence is reproducible.
        let mut state: u32 = 0x2545_f491;
        for _ in 0..2000 {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let delta = (state >> 8) as f32 / (1u32 << 24) as f32 * 4.0 - 2.0;
            match state % 3 {
                0 => camera.adjust_radius(delta * 5.0),
                1 => camera.adjust_polar(delta),
                _ => camera.adjust_azimuth(delta),
            }
            assert_in_limits(&camera);
        }
    }

    #[test]
    fn test_set_orbit_clamps_and_wraps() {
        let mut camera = free_camera();
        camera.set_orbit(0.2, 0.0, -PI / 2.0);
        assert_eq!(camera.radius(), MIN_RADIUS);
        assert_eq!(camera.polar(), MIN_POLAR);
        assert!((camera.azimuth() - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_eye_position_in_orbital_plane() {
        let camera = free_camera();
        let target = Vec3::new(10.0, 0.0, 0.0);
        let eye = camera.compute_eye_position(target);
        assert!((eye - Vec3::new(35.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_eye_position_distance_is_radius() {
        let mut camera = free_camera();
        camera.set_orbit(7.0, 0.7, 2.1);
        let target = Vec3::new(-3.0, 4.0, 1.0);
        let eye = camera.compute_eye_position(target);
        assert!(((eye - target).length() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_is_deterministic() {
        let mut camera = SphericalCamera::default();
        camera.set_view(Vec3::new(10.0, 0.0, 0.0), Vec3::new(12.0, 0.5, 0.0));
        let a = camera.compute_view_matrix().unwrap();
        let b = camera.compute_view_matrix().unwrap();
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let mut camera = SphericalCamera::default();
        let eye = Vec3::new(0.0, -5.0, 1.0);
        camera.set_view(eye, Vec3::ZERO);
        let view = camera.compute_view_matrix().unwrap();
        assert!(view.transform_point3(eye).length() < 1e-5);
        // Right-handed: the target lies along -Z in view space.
        assert!(view.transform_point3(Vec3::ZERO).z < 0.0);
    }

    #[test]
    fn test_view_matrix_rejects_coincident_points() {
        let mut camera = SphericalCamera::default();
        camera.set_view(Vec3::ONE, Vec3::ONE);
        assert!(matches!(
            camera.compute_view_matrix(),
            Err(SceneError::DegenerateCamera { .. })
        ));
    }

    #[test]
    fn test_view_matrix_rejects_view_along_up() {
        let mut camera = SphericalCamera::default();
        camera.set_view(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!(matches!(
            camera.compute_view_matrix(),
            Err(SceneError::DegenerateCamera { .. })
        ));
    }

    #[test]
    fn test_projection_rejects_bad_intrinsics() {
        let base = SphericalCamera::default();
        assert!(base.compute_projection_matrix().is_ok());

        let cases: [fn(&mut SphericalCamera); 5] = [
            |c| c.near = 0.0,
            |c| c.near = c.far,
            |c| c.aspect = 0.0,
            |c| c.fov_y = 0.0,
            |c| c.fov_y = PI,
        ];
        for mutate in cases {
            let mut camera = base.clone();
            mutate(&mut camera);
            assert!(matches!(
                camera.compute_projection_matrix(),
                Err(SceneError::DegenerateCamera { .. })
            ));
        }
    }

    #[test]
    fn test_projection_depth_range_is_zero_to_one() {
        let camera = SphericalCamera::default();
        let proj = camera.compute_projection_matrix().unwrap();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ignores_zero_height() {
        let mut camera = SphericalCamera::default();
        camera.set_aspect_ratio(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect_ratio(800, 0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_anchor_pair_rejects_same_body() {
        for body in Body::CELESTIAL {
            assert_eq!(
                AnchorPair::new(body, body),
                Err(SceneError::InvalidCameraTarget { eye: body, look_at: body })
            );
        }
    }

    #[test]
    fn test_look_at_eye_anchor_fails_and_keeps_mode() {
        let mut camera = SphericalCamera::default();
        let before = camera.mode();
        assert!(matches!(
            camera.set_look_at(Body::Earth),
            Err(SceneError::InvalidCameraTarget { .. })
        ));
        assert_eq!(camera.mode(), before);
    }

    #[test]
    fn test_anchor_at_look_at_fails_and_keeps_mode() {
        let mut camera = SphericalCamera::default();
        let before = camera.mode();
        assert!(matches!(
            camera.set_eye_anchor(Body::Moon),
            Err(SceneError::InvalidCameraTarget { .. })
        ));
        assert_eq!(camera.mode(), before);
    }

    #[test]
    fn test_look_at_free_anchor_is_rejected() {
        let mut camera = SphericalCamera::default();
        assert!(camera.set_look_at(Body::FreeAnchor).is_err());
        camera.set_free_orbit();
        let before = camera.mode();
        assert!(camera.set_look_at(Body::FreeAnchor).is_err());
        assert_eq!(camera.mode(), before);
    }

    #[test]
    fn test_targeting_transitions() {
        let mut camera = SphericalCamera::default();
        camera.set_look_at(Body::Sun).unwrap();
        assert_eq!(camera.mode().eye_anchor(), Body::Earth);
        assert_eq!(camera.mode().look_at(), Body::Sun);

        camera.set_eye_anchor(Body::FreeAnchor).unwrap();
        assert_eq!(camera.mode(), CameraMode::FreeOrbit { look_at: Body::Sun });

        // Any celestial body is a valid target while orbiting.
        camera.set_look_at(Body::Earth).unwrap();
        assert_eq!(camera.mode(), CameraMode::FreeOrbit { look_at: Body::Earth });

        camera.set_eye_anchor(Body::Moon).unwrap();
        assert_eq!(camera.mode().eye_anchor(), Body::Moon);
        assert_eq!(camera.mode().look_at(), Body::Earth);
    }
}
