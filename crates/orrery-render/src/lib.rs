//! wgpu rendering for the orrery: device setup, the shared sphere geometry,
//! body pipelines and the per-frame scene renderer.

pub mod depth;
pub mod geometry;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod sphere;
pub mod texture;

#[cfg(test)]
mod test_support;

pub use depth::DepthBuffer;
pub use geometry::{GeometryBuffer, GeometryError, GpuBuffers};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{BLACK, FrameEncoder, RenderPassBuilder, clear_color_from_rgb};
pub use pipeline::{BodyPipeline, FrameUniform, ModelUniform, Shading, UniformLayouts};
pub use renderer::{BodyTexture, RenderError, RendererSettings, SceneRenderer, default_tint};
pub use sphere::{MAX_SPHERE_RESOLUTION, generate_sphere, grid_index, sphere_counts};
pub use texture::{ManagedTexture, TextureError, TextureManager};
