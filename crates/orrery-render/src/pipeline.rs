//! Render pipelines for the lit bodies and the emissive sun.
//!
//! Both programs share one layout: per-frame uniforms at group 0, the model
//! matrix at group 1 and the surface texture at group 2.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::depth::DepthBuffer;
use crate::geometry::GeometryBuffer;

/// WGSL source for earth and moon.
pub const BODY_SHADER_SOURCE: &str = include_str!("body.wgsl");
/// WGSL source for the sun.
pub const SUN_SHADER_SOURCE: &str = include_str!("sun.wgsl");

/// Camera and light state shared by every draw of a frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// World-space eye position (w unused).
    pub camera_position: [f32; 4],
    /// World-space point light position (w unused).
    pub light_position: [f32; 4],
    /// Linear light color (w unused).
    pub light_color: [f32; 4],
}

impl FrameUniform {
    pub fn new(
        view: Mat4,
        proj: Mat4,
        camera_position: Vec3,
        light_position: Vec3,
        light_color: Vec3,
    ) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            light_position: light_position.extend(1.0).to_array(),
            light_color: light_color.extend(1.0).to_array(),
        }
    }
}

/// Per-body model matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Which program a body is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Ambient, diffuse and specular from the sun's light.
    Lit,
    /// Texture color only.
    Emissive,
}

impl Shading {
    pub fn shader_source(self) -> &'static str {
        match self {
            Shading::Lit => BODY_SHADER_SOURCE,
            Shading::Emissive => SUN_SHADER_SOURCE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Shading::Lit => "body",
            Shading::Emissive => "sun",
        }
    }
}

/// Bind group layouts for groups 0 and 1.
pub struct UniformLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub model: wgpu::BindGroupLayout,
}

impl UniformLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = |label: &str, visibility: wgpu::ShaderStages, size: usize| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(size as u64),
                    },
                    count: None,
                }],
            })
        };
        Self {
            frame: uniform_layout(
                "frame-bgl",
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<FrameUniform>(),
            ),
            model: uniform_layout(
                "model-bgl",
                wgpu::ShaderStages::VERTEX,
                std::mem::size_of::<ModelUniform>(),
            ),
        }
    }
}

/// A compiled body program for one polygon mode.
pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub shading: Shading,
    pub polygon_mode: wgpu::PolygonMode,
}

impl BodyPipeline {
    /// Compile `shading` for the geometry buffer's vertex layouts.
    ///
    /// `PolygonMode::Line` requires the device to have been created with
    /// `Features::POLYGON_MODE_LINE`.
    pub fn new(
        device: &wgpu::Device,
        layouts: &UniformLayouts,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        shading: Shading,
        polygon_mode: wgpu::PolygonMode,
    ) -> Self {
        let label = shading.label();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shading.shader_source().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label}-pipeline-layout")),
            bind_group_layouts: &[&layouts.frame, &layouts.model, texture_bind_group_layout],
            immediate_size: 0,
        });

        let vertex_layouts = GeometryBuffer::vertex_layouts();
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label}-pipeline-{polygon_mode:?}")),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::depth_stencil_state()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            shading,
            polygon_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;
    use crate::texture::TextureManager;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 176);
        assert_eq!(std::mem::size_of::<ModelUniform>(), 64);
    }

    #[test]
    fn test_frame_uniform_layout() {
        let uniform = FrameUniform::new(
            Mat4::IDENTITY,
            Mat4::from_scale(Vec3::splat(2.0)),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.7),
        );
        assert_eq!(uniform.proj[0][0], 2.0);
        assert_eq!(uniform.camera_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.light_color, [1.0, 1.0, 0.7, 1.0]);
    }

    #[test]
    fn test_model_uniform_is_column_major() {
        let model = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let uniform = ModelUniform::new(model);
        assert_eq!(uniform.model[3], [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn test_shaders_declare_entry_points() {
        for shading in [Shading::Lit, Shading::Emissive] {
            let source = shading.shader_source();
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
            assert!(source.contains("@group(2) @binding(1)"));
        }
    }

    #[test]
    fn test_pipelines_compile() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let layouts = UniformLayouts::new(&device);
        let textures = TextureManager::new(&device);
        for shading in [Shading::Lit, Shading::Emissive] {
            let pipeline = BodyPipeline::new(
                &device,
                &layouts,
                textures.bind_group_layout(),
                wgpu::TextureFormat::Bgra8UnormSrgb,
                shading,
                wgpu::PolygonMode::Fill,
            );
            assert_eq!(pipeline.shading, shading);
        }
    }
}
