//! Draws the sun, earth and moon from a [`SceneState`].
//!
//! One sphere is generated and uploaded at startup and drawn three times per
//! frame, each time with its own model uniform and texture.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use orrery_scene::{Body, SceneError, SceneState};

use crate::depth::DepthBuffer;
use crate::geometry::{GeometryBuffer, GeometryError};
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder, clear_color_from_rgb};
use crate::pipeline::{BodyPipeline, FrameUniform, ModelUniform, Shading, UniformLayouts};
use crate::sphere::generate_sphere;
use crate::texture::{ManagedTexture, TextureError, TextureManager};

/// Draw order: lit bodies first, then the sun.
const DRAW_ORDER: [Body; 3] = [Body::Earth, Body::Moon, Body::Sun];

/// Errors that abort a frame or renderer construction.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Image file and fallback color for one body.
#[derive(Clone, Debug)]
pub struct BodyTexture {
    pub body: Body,
    pub path: PathBuf,
    /// RGBA used when the image cannot be loaded.
    pub tint: [u8; 4],
}

impl BodyTexture {
    /// Texture at `path` with the body's default tint.
    pub fn new(body: Body, path: impl Into<PathBuf>) -> Self {
        Self {
            body,
            path: path.into(),
            tint: default_tint(body),
        }
    }
}

/// Fallback colors: yellow sun, blue earth, grey moon.
pub fn default_tint(body: Body) -> [u8; 4] {
    match body {
        Body::Sun => [255, 214, 90, 255],
        Body::Earth => [46, 96, 196, 255],
        Body::Moon => [150, 150, 150, 255],
        Body::FreeAnchor => [255, 255, 255, 255],
    }
}

/// Construction parameters for [`SceneRenderer`].
#[derive(Clone, Debug)]
pub struct RendererSettings {
    pub sphere_resolution: u32,
    pub clear_color: [f64; 3],
    pub light_color: Vec3,
    pub wireframe: bool,
    pub textures: Vec<BodyTexture>,
}

struct PipelineSet {
    lit: BodyPipeline,
    emissive: BodyPipeline,
}

impl PipelineSet {
    fn new(
        device: &wgpu::Device,
        layouts: &UniformLayouts,
        texture_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        polygon_mode: wgpu::PolygonMode,
    ) -> Self {
        let build = |shading| {
            BodyPipeline::new(
                device,
                layouts,
                texture_layout,
                surface_format,
                shading,
                polygon_mode,
            )
        };
        Self {
            lit: build(Shading::Lit),
            emissive: build(Shading::Emissive),
        }
    }

    fn get(&self, shading: Shading) -> &wgpu::RenderPipeline {
        match shading {
            Shading::Lit => &self.lit.pipeline,
            Shading::Emissive => &self.emissive.pipeline,
        }
    }
}

struct BodyDraw {
    body: Body,
    shading: Shading,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    texture: Arc<ManagedTexture>,
}

/// GPU resources for drawing the scene.
pub struct SceneRenderer {
    geometry: GeometryBuffer,
    fill: PipelineSet,
    line: Option<PipelineSet>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draws: Vec<BodyDraw>,
    depth: DepthBuffer,
    textures: TextureManager,
    clear_color: wgpu::Color,
    light_color: Vec3,
    wireframe: bool,
}

impl SceneRenderer {
    /// Build every GPU resource up front.
    ///
    /// `supports_wireframe` says whether the device was created with
    /// `Features::POLYGON_MODE_LINE`; without it only fill pipelines exist.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        supports_wireframe: bool,
        settings: &RendererSettings,
    ) -> Result<Self, RenderError> {
        let mut geometry = generate_sphere(settings.sphere_resolution)?;
        geometry.initialize(device)?;

        let mut textures = TextureManager::new(device);
        let layouts = UniformLayouts::new(device);

        let fill = PipelineSet::new(
            device,
            &layouts,
            textures.bind_group_layout(),
            surface_format,
            wgpu::PolygonMode::Fill,
        );
        let line = supports_wireframe.then(|| {
            PipelineSet::new(
                device,
                &layouts,
                textures.bind_group_layout(),
                surface_format,
                wgpu::PolygonMode::Line,
            )
        });

        let frame_buffer = create_uniform_buffer::<FrameUniform>(device, "frame-uniform");
        let frame_bind_group = create_uniform_bind_group(
            device,
            "frame-bind-group",
            &layouts.frame,
            &frame_buffer,
        );

        let mut draws = Vec::with_capacity(DRAW_ORDER.len());
        for body in DRAW_ORDER {
            let texture = match settings.textures.iter().find(|t| t.body == body) {
                Some(entry) => {
                    textures.load_or_solid(device, queue, body.name(), &entry.path, entry.tint)?
                }
                None => textures.create_solid(device, queue, body.name(), default_tint(body))?,
            };
            let model_buffer = create_uniform_buffer::<ModelUniform>(device, body.name());
            let model_bind_group =
                create_uniform_bind_group(device, body.name(), &layouts.model, &model_buffer);
            let shading = match body {
                Body::Sun => Shading::Emissive,
                _ => Shading::Lit,
            };
            draws.push(BodyDraw {
                body,
                shading,
                model_buffer,
                model_bind_group,
                texture,
            });
        }

        let mut renderer = Self {
            geometry,
            fill,
            line,
            frame_buffer,
            frame_bind_group,
            draws,
            depth: DepthBuffer::new(device, width, height),
            textures,
            clear_color: clear_color_from_rgb(settings.clear_color),
            light_color: settings.light_color,
            wireframe: false,
        };
        renderer.set_wireframe(settings.wireframe);
        log::info!(
            "Scene renderer ready: {} vertices per sphere, wireframe {}",
            renderer.geometry.vertex_count(),
            if renderer.line.is_some() { "available" } else { "unavailable" }
        );
        Ok(renderer)
    }

    /// Convenience constructor over a window's [`RenderContext`].
    pub fn from_context(
        ctx: &RenderContext,
        settings: &RendererSettings,
    ) -> Result<Self, RenderError> {
        let (width, height) = ctx.size();
        Self::new(
            &ctx.device,
            &ctx.queue,
            ctx.surface_format,
            width,
            height,
            ctx.supports_wireframe(),
            settings,
        )
    }

    /// Switch between line and fill rasterization. Returns the mode now in
    /// effect, which stays fill when line mode is unsupported.
    pub fn set_wireframe(&mut self, enabled: bool) -> bool {
        if enabled && self.line.is_none() {
            log::warn!("Wireframe requested but POLYGON_MODE_LINE is unavailable");
            self.wireframe = false;
        } else {
            self.wireframe = enabled;
        }
        self.wireframe
    }

    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Track a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Write the frame and per-body uniforms for the current scene.
    pub fn prepare(&self, queue: &wgpu::Queue, scene: &SceneState) -> Result<(), SceneError> {
        let view = scene.camera.compute_view_matrix()?;
        let proj = scene.camera.compute_projection_matrix()?;
        let frame = FrameUniform::new(
            view,
            proj,
            scene.camera.eye(),
            scene.transforms().origin(Body::Sun),
            self.light_color,
        );
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        for draw in &self.draws {
            let model = ModelUniform::new(scene.model_matrix(draw.body));
            queue.write_buffer(&draw.model_buffer, 0, bytemuck::bytes_of(&model));
        }
        Ok(())
    }

    /// The pass configuration: configured clear color plus depth.
    pub fn pass_builder(&self) -> RenderPassBuilder {
        RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass")
    }

    /// Record the three body draws into an open pass.
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>) -> Result<(), GeometryError> {
        let pipelines = match (&self.line, self.wireframe) {
            (Some(line), true) => line,
            _ => &self.fill,
        };
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for draw in &self.draws {
            render_pass.set_pipeline(pipelines.get(draw.shading));
            render_pass.set_bind_group(1, &draw.model_bind_group, &[]);
            render_pass.set_bind_group(2, &draw.texture.bind_group, &[]);
            self.geometry.render(render_pass)?;
        }
        Ok(())
    }

    /// Draw one frame to the window surface. A timed-out surface skips the
    /// frame without error.
    pub fn render(&self, ctx: &RenderContext, scene: &SceneState) -> Result<(), RenderError> {
        self.prepare(&ctx.queue, scene)?;

        let surface_texture = match ctx.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                log::debug!("Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
        let builder = self.pass_builder();
        {
            let mut pass = frame.begin_render_pass(&builder);
            self.record(&mut pass)?;
        }
        frame.submit(&ctx.queue);
        Ok(())
    }
}

fn create_uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
