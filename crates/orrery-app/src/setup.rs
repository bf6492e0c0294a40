//! Translate the loaded [`Config`] into scene and renderer values.

use glam::Vec3;
use orrery_config::{BodyConfig, CameraConfig, Config, SimulationConfig};
use orrery_render::{BodyTexture, RendererSettings};
use orrery_scene::{AnchorPair, Body, BodyConstants, CameraMode, SphericalCamera, SystemConstants};

pub fn body_constants(body: &BodyConfig) -> BodyConstants {
    BodyConstants {
        size: body.size,
        orbit_radius: body.orbit_radius,
        orbit_period: body.orbit_period,
        rotation_period: body.rotation_period,
        axial_tilt: body.axial_tilt_degrees.to_radians(),
    }
}

pub fn system_constants(simulation: &SimulationConfig) -> SystemConstants {
    SystemConstants {
        sun: body_constants(&simulation.sun),
        earth: body_constants(&simulation.earth),
        moon: body_constants(&simulation.moon),
    }
}

/// Camera pinned to the earth looking at the moon, with the configured
/// intrinsics and free-orbit starting point.
pub fn initial_camera(camera: &CameraConfig, width: u32, height: u32) -> SphericalCamera {
    let mode = AnchorPair::new(Body::Earth, Body::Moon)
        .map(CameraMode::Anchored)
        .unwrap_or(CameraMode::FreeOrbit { look_at: Body::Moon });
    let mut spherical = SphericalCamera::new(
        camera.fov_degrees.to_radians(),
        1.0,
        camera.near,
        camera.far,
        mode,
    );
    spherical.set_aspect_ratio(width, height);
    spherical.set_orbit(
        camera.radius,
        camera.polar_degrees.to_radians(),
        camera.azimuth_degrees.to_radians(),
    );
    spherical
}

pub fn renderer_settings(config: &Config) -> RendererSettings {
    let textures = &config.textures;
    RendererSettings {
        sphere_resolution: config.render.sphere_resolution,
        clear_color: config.render.clear_color,
        light_color: Vec3::from_array(config.simulation.light_color),
        wireframe: config.render.wireframe,
        textures: vec![
            BodyTexture::new(Body::Sun, &textures.sun),
            BodyTexture::new(Body::Earth, &textures.earth),
            BodyTexture::new(Body::Moon, &textures.moon),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_default_constants() {
        let constants = system_constants(&SimulationConfig::default());
        assert_eq!(constants, SystemConstants::default());
    }

    #[test]
    fn test_tilt_converted_to_radians() {
        let body = BodyConfig {
            axial_tilt_degrees: 90.0,
            ..BodyConfig::default()
        };
        let constants = body_constants(&body);
        assert!((constants.axial_tilt - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_initial_camera_from_config() {
        let camera = initial_camera(&CameraConfig::default(), 1024, 768);
        assert_eq!(camera.mode().eye_anchor(), Body::Earth);
        assert_eq!(camera.mode().look_at(), Body::Moon);
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        assert!((camera.fov_y - 45f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.radius(), 25.0);
        assert!((camera.polar() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_orbit_is_clamped() {
        let config = CameraConfig {
            radius: 0.0,
            polar_degrees: 180.0,
            ..CameraConfig::default()
        };
        let camera = initial_camera(&config, 800, 600);
        assert_eq!(camera.radius(), orrery_scene::MIN_RADIUS);
        assert_eq!(camera.polar(), orrery_scene::MAX_POLAR);
    }

    #[test]
    fn test_renderer_settings_cover_each_body() {
        let settings = renderer_settings(&Config::default());
        assert_eq!(settings.sphere_resolution, 32);
        assert_eq!(settings.light_color, Vec3::new(1.0, 1.0, 0.7));
        let bodies: Vec<Body> = settings.textures.iter().map(|t| t.body).collect();
        assert_eq!(bodies, vec![Body::Sun, Body::Earth, Body::Moon]);
    }
}
