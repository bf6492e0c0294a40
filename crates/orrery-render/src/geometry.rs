//! Indexed triangle geometry with one GPU buffer per vertex attribute.
//!
//! Attributes are appended on the CPU, validated, uploaded exactly once by
//! [`GeometryBuffer::initialize`] and then drawn any number of times.

use wgpu::util::DeviceExt;

/// Shader location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of the normal attribute.
pub const NORMAL_LOCATION: u32 = 1;
/// Shader location of the texture coordinate attribute.
pub const TEXCOORD_LOCATION: u32 = 2;

/// Errors raised while building, uploading or drawing geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Sphere resolution must be at least one.
    #[error("invalid sphere resolution {0}, expected at least 1")]
    InvalidResolution(u32),

    /// The grid would need more vertices or indices than `u32` can address.
    #[error("sphere resolution {0} exceeds the 32-bit index range")]
    ResolutionTooLarge(u32),

    /// An attribute array is larger than the device accepts in one buffer.
    #[error("{label} needs {size} bytes, device limit is {max}")]
    BufferTooLarge {
        label: &'static str,
        size: u64,
        max: u64,
    },

    /// Every vertex needs one position, one normal and one texcoord.
    #[error(
        "attribute counts differ: {positions} positions, {normals} normals, {texcoords} texcoords"
    )]
    AttributeCountMismatch {
        positions: usize,
        normals: usize,
        texcoords: usize,
    },

    /// Triangle lists need a multiple of three indices.
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),

    /// An index refers past the last vertex.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// GPU buffers were already created.
    #[error("geometry already initialized")]
    AlreadyInitialized,

    /// Drawing requires GPU buffers.
    #[error("geometry not initialized")]
    NotInitialized,
}

/// GPU handles created by [`GeometryBuffer::initialize`].
pub struct GpuBuffers {
    pub positions: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    pub texcoords: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

/// CPU attribute arrays plus their GPU copies once initialized.
#[derive(Default)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    indices: Vec<u32>,
    gpu: Option<GpuBuffers>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `vertices` vertices and `indices` indices.
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
            gpu: None,
        }
    }

    pub fn append_position(&mut self, position: [f32; 3]) {
        self.positions.push(position);
    }

    pub fn append_normal(&mut self, normal: [f32; 3]) {
        self.normals.push(normal);
    }

    pub fn append_texcoord(&mut self, texcoord: [f32; 2]) {
        self.texcoords.push(texcoord);
    }

    pub fn append_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[[f32; 2]] {
        &self.texcoords
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// Check attribute counts and index bounds.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count || self.texcoords.len() != vertex_count {
            return Err(GeometryError::AttributeCountMismatch {
                positions: vertex_count,
                normals: self.normals.len(),
                texcoords: self.texcoords.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCountNotTriangles(self.indices.len()));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Check every array against the device's `max_buffer_size`.
    pub fn check_buffer_limits(&self, max_buffer_size: u64) -> Result<(), GeometryError> {
        let sizes = [
            ("geometry-positions", std::mem::size_of_val(self.positions.as_slice())),
            ("geometry-normals", std::mem::size_of_val(self.normals.as_slice())),
            ("geometry-texcoords", std::mem::size_of_val(self.texcoords.as_slice())),
            ("geometry-indices", std::mem::size_of_val(self.indices.as_slice())),
        ];
        for (label, size) in sizes {
            let size = size as u64;
            if size > max_buffer_size {
                return Err(GeometryError::BufferTooLarge {
                    label,
                    size,
                    max: max_buffer_size,
                });
            }
        }
        Ok(())
    }

    /// Validate, then upload every array into its own exactly-sized buffer.
    ///
    /// Nothing is allocated on the device if validation or the buffer size
    /// limit check fails.
    pub fn initialize(&mut self, device: &wgpu::Device) -> Result<(), GeometryError> {
        if self.gpu.is_some() {
            return Err(GeometryError::AlreadyInitialized);
        }
        self.validate()?;
        self.check_buffer_limits(device.limits().max_buffer_size)?;
        let index_count = u32::try_from(self.indices.len()).map_err(|_| {
            GeometryError::BufferTooLarge {
                label: "geometry-indices",
                size: std::mem::size_of_val(self.indices.as_slice()) as u64,
                max: u32::MAX as u64 * 4,
            }
        })?;

        let create = |label: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        };
        let vertex = wgpu::BufferUsages::VERTEX;
        self.gpu = Some(GpuBuffers {
            positions: create("geometry-positions", bytemuck::cast_slice(&self.positions), vertex),
            normals: create("geometry-normals", bytemuck::cast_slice(&self.normals), vertex),
            texcoords: create("geometry-texcoords", bytemuck::cast_slice(&self.texcoords), vertex),
            indices: create(
                "geometry-indices",
                bytemuck::cast_slice(&self.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count,
        });
        log::debug!(
            "Uploaded geometry: {} vertices, {} triangles",
            self.vertex_count(),
            self.triangle_count()
        );
        Ok(())
    }

    /// The uploaded buffers.
    pub fn gpu_buffers(&self) -> Result<&GpuBuffers, GeometryError> {
        self.gpu.as_ref().ok_or(GeometryError::NotInitialized)
    }

    /// Bind the attribute and index buffers and draw every triangle once.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) -> Result<(), GeometryError> {
        let gpu = self.gpu_buffers()?;
        if gpu.index_count == 0 {
            return Ok(());
        }
        render_pass.set_vertex_buffer(POSITION_LOCATION, gpu.positions.slice(..));
        render_pass.set_vertex_buffer(NORMAL_LOCATION, gpu.normals.slice(..));
        render_pass.set_vertex_buffer(TEXCOORD_LOCATION, gpu.texcoords.slice(..));
        render_pass.set_index_buffer(gpu.indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        Ok(())
    }

    /// One single-attribute layout per vertex buffer slot.
    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        const POSITION: [wgpu::VertexAttribute; 1] =
            wgpu::vertex_attr_array![POSITION_LOCATION => Float32x3];
        const NORMAL: [wgpu::VertexAttribute; 1] =
            wgpu::vertex_attr_array![NORMAL_LOCATION => Float32x3];
        const TEXCOORD: [wgpu::VertexAttribute; 1] =
            wgpu::vertex_attr_array![TEXCOORD_LOCATION => Float32x2];

        let layout = |stride: usize, attributes: &'static [wgpu::VertexAttribute]| {
            wgpu::VertexBufferLayout {
                array_stride: stride as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }
        };
        [
            layout(std::mem::size_of::<[f32; 3]>(), &POSITION),
            layout(std::mem::size_of::<[f32; 3]>(), &NORMAL),
            layout(std::mem::size_of::<[f32; 2]>(), &TEXCOORD),
        ]
    }
}
