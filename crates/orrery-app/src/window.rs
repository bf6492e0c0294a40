//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and a [`run`] function to start the event loop.

use std::sync::Arc;

use orrery_config::Config;
use orrery_render::{
    RenderContext, RenderContextError, RenderError, SceneRenderer, SurfaceError,
    init_render_context_blocking,
};
use orrery_scene::{SceneError, SceneState};
use tracing::{debug, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::FrameClock;
use crate::controls::{Control, ControlSteps, RawKeyEvent, ViewCommand, map_key};
use crate::setup::{initial_camera, renderer_settings, system_constants};

/// Failures that prevent the viewer from starting or keep it from running.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid scene configuration: {0}")]
    Scene(#[from] SceneError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state: window, GPU resources, scene and clock.
///
/// GPU resources are acquired in `resumed` and released when the state is
/// dropped.
pub struct AppState {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    pub renderer: Option<SceneRenderer>,
    pub scene: SceneState,
    pub clock: FrameClock,
    steps: ControlSteps,
    /// The error that stopped the event loop, returned from [`run`].
    fatal: Option<AppError>,
}

impl AppState {
    /// Build the scene from the configuration. Zero periods and unusable
    /// camera intrinsics are rejected here, before any window exists.
    pub fn with_config(config: Config) -> Result<Self, SceneError> {
        let camera = initial_camera(&config.camera, config.window.width, config.window.height);
        let scene = SceneState::new(system_constants(&config.simulation), camera)?;
        Ok(Self {
            steps: ControlSteps::from_config(&config.camera),
            clock: FrameClock::new(config.simulation.time_scale),
            window: None,
            gpu: None,
            renderer: None,
            fatal: None,
            scene,
            config,
        })
    }

    /// Decode and apply one key event. Returns `true` when the application
    /// should quit.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> bool {
        let Some(control) = map_key(event, &self.steps) else {
            return false;
        };
        match control {
            Control::Scene(command) => {
                if let Err(e) = self.scene.apply(command) {
                    warn!("Rejected {command:?}: {e}");
                }
            }
            Control::View(ViewCommand::Quit) => return true,
            Control::View(ViewCommand::Wireframe) => self.set_wireframe(true),
            Control::View(ViewCommand::Fill) => self.set_wireframe(false),
        }
        false
    }

    fn set_wireframe(&mut self, enabled: bool) {
        self.config.render.wireframe = enabled;
        if let Some(renderer) = &mut self.renderer {
            let active = renderer.set_wireframe(enabled);
            info!("Polygon mode: {}", if active { "line" } else { "fill" });
        }
    }

    /// Track a new surface size.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring zero-size resize");
            return;
        }
        self.scene.camera.set_aspect_ratio(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, width, height);
            }
        }
        info!("Window resized to {width}x{height}");
    }

    fn initialize_rendering(&mut self, window: Arc<Window>) -> Result<(), AppError> {
        let gpu = init_render_context_blocking(window, self.config.window.vsync)?;
        let renderer = SceneRenderer::from_context(&gpu, &renderer_settings(&self.config))?;
        let (width, height) = gpu.size();
        self.scene.camera.set_aspect_ratio(width, height);
        self.renderer = Some(renderer);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(
            event_loop.create_window(window_attributes_from_config(&self.config))?,
        );
        self.initialize_rendering(Arc::clone(&window))?;
        self.window = Some(window);
        Ok(())
    }

    /// Advance the simulation and draw. Degenerate views skip the frame;
    /// everything else is fatal.
    fn redraw(&mut self) -> Result<(), AppError> {
        let time = self.clock.tick() as f32;
        self.scene.update(time)?;
        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return Ok(());
        };
        match renderer.render(gpu, &self.scene) {
            Err(RenderError::Scene(e)) => {
                warn!("Skipping frame: {e}");
                Ok(())
            }
            Err(RenderError::Surface(SurfaceError::Timeout)) => Ok(()),
            result => Ok(result?),
        }
    }

    /// Stop the loop; [`run`] returns `err`.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        debug!("Stopping event loop: {err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.create_window(event_loop) {
            Ok(()) => info!("Orrery ready"),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.handle_resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if self.handle_key(RawKeyEvent::from(&event)) {
                    info!("Quit requested, shutting down");
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Creates an event loop and runs the viewer until the window is closed.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let mut app = AppState::with_config(config)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    app.fatal.map_or(Ok(()), Err)
}
