//! Keyboard bindings.
//!
//! | Key          | Action                                  |
//! |--------------|-----------------------------------------|
//! | W / F        | wireframe / filled polygons             |
//! | Esc          | quit                                    |
//! | J / K / L    | look at earth / moon / sun              |
//! | V / B / N    | eye at earth / moon / sun               |
//! | C            | free orbit around the look-at body      |
//! | S / A        | orbit radius up / down                  |
//! | Up / Down    | polar angle down / up                   |
//! | Left / Right | azimuth down / up                       |
//!
//! Orbit adjustments fire on press and on key repeat; everything else only on
//! the initial press. Physical key codes are used so the bindings stay in
//! place on any keyboard layout.

use orrery_config::CameraConfig;
use orrery_scene::{Body, SceneCommand};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, constructible in tests.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Presentation commands handled by the application itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    Wireframe,
    Fill,
    Quit,
}

/// A decoded key binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Scene(SceneCommand),
    View(ViewCommand),
}

/// Orbit increments applied per key event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSteps {
    pub radius: f32,
    /// Radians.
    pub angle: f32,
}

impl ControlSteps {
    pub fn from_config(camera: &CameraConfig) -> Self {
        Self {
            radius: camera.radius_step,
            angle: camera.angle_step_degrees.to_radians(),
        }
    }
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Map a key event to its control, if bound.
pub fn map_key(event: RawKeyEvent, steps: &ControlSteps) -> Option<Control> {
    if event.state != ElementState::Pressed {
        return None;
    }
    let PhysicalKey::Code(code) = event.key else {
        return None;
    };

    let adjustment = match code {
        KeyCode::KeyS => Some(SceneCommand::AdjustRadius(steps.radius)),
        KeyCode::KeyA => Some(SceneCommand::AdjustRadius(-steps.radius)),
        KeyCode::ArrowUp => Some(SceneCommand::AdjustPolar(-steps.angle)),
        KeyCode::ArrowDown => Some(SceneCommand::AdjustPolar(steps.angle)),
        KeyCode::ArrowLeft => Some(SceneCommand::AdjustAzimuth(-steps.angle)),
        KeyCode::ArrowRight => Some(SceneCommand::AdjustAzimuth(steps.angle)),
        _ => None,
    };
    if let Some(command) = adjustment {
        return Some(Control::Scene(command));
    }
    if event.repeat {
        return None;
    }

    let control = match code {
        KeyCode::KeyW => Control::View(ViewCommand::Wireframe),
        KeyCode::KeyF => Control::View(ViewCommand::Fill),
        KeyCode::Escape => Control::View(ViewCommand::Quit),
        KeyCode::KeyJ => Control::Scene(SceneCommand::LookAt(Body::Earth)),
        KeyCode::KeyK => Control::Scene(SceneCommand::LookAt(Body::Moon)),
        KeyCode::KeyL => Control::Scene(SceneCommand::LookAt(Body::Sun)),
        KeyCode::KeyV => Control::Scene(SceneCommand::AnchorEye(Body::Earth)),
        KeyCode::KeyB => Control::Scene(SceneCommand::AnchorEye(Body::Moon)),
        KeyCode::KeyN => Control::Scene(SceneCommand::AnchorEye(Body::Sun)),
        KeyCode::KeyC => Control::Scene(SceneCommand::FreeOrbit),
        _ => return None,
    };
    Some(control)
}
