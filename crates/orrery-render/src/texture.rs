//! Body textures: image decoding, GPU upload and bind groups.
//!
//! [`TextureManager`] owns the shared sampler and bind group layout. Every
//! texture it creates comes back as an [`Arc<ManagedTexture>`] with a bind
//! group ready for group 2 of the body pipelines.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Body textures are color data authored in sRGB.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A GPU texture with its view, bind group, and size.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
}

/// Errors that can occur while decoding or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The image file could not be opened or decoded.
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// Pixel data length doesn't match the expected RGBA8 size.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Decode an image file into tightly packed RGBA8 rows.
pub fn decode_rgba(path: &Path) -> Result<image::RgbaImage, TextureError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Texture cache keyed by name, sharing one linear sampler.
pub struct TextureManager {
    textures: HashMap<String, Arc<ManagedTexture>>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureManager {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("body-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            textures: HashMap::new(),
            sampler,
            bind_group_layout,
        }
    }

    /// Create a texture from RGBA8 pixels, or return the cached one of the
    /// same name.
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }

        validate_dimensions(width, height)?;
        validate_data_size(data, width, height)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let managed = Arc::new(ManagedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
        });
        self.textures.insert(name.to_string(), Arc::clone(&managed));
        log::info!("Created texture '{name}' ({width}x{height})");
        Ok(managed)
    }

    /// Decode an image file and upload it under `name`.
    pub fn load_from_path(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }
        let image = decode_rgba(path)?;
        let (width, height) = image.dimensions();
        self.create_texture(device, queue, name, image.as_raw(), width, height)
    }

    /// A single-texel texture of one color.
    pub fn create_solid(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        rgba: [u8; 4],
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        self.create_texture(device, queue, name, &rgba, 1, 1)
    }

    /// Load `path`, or fall back to a 1×1 texture of `tint` when the file is
    /// missing or cannot be decoded.
    pub fn load_or_solid(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        path: &Path,
        tint: [u8; 4],
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        match self.load_from_path(device, queue, name, path) {
            Ok(texture) => Ok(texture),
            Err(TextureError::ImageLoad(err)) => {
                log::warn!(
                    "Texture '{name}' unavailable at {}: {err}; using solid color",
                    path.display()
                );
                self.create_solid(device, queue, name, tint)
            }
            Err(err) => Err(err),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ManagedTexture>> {
        self.textures.get(name).cloned()
    }

    /// Layout of group 2 in the body pipelines.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = 4 * width as usize * height as usize;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;

    #[test]
    fn test_zero_dimensions_returns_error() {
        assert!(matches!(
            validate_dimensions(0, 4),
            Err(TextureError::ZeroDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_data_size_mismatch_returns_error() {
        let data = [0u8; 12];
        assert!(matches!(
            validate_data_size(&data, 2, 2),
            Err(TextureError::DataSizeMismatch {
                actual: 12,
                expected: 16,
                ..
            })
        ));
        assert!(validate_data_size(&[0u8; 16], 2, 2).is_ok());
    }

    #[test]
    fn test_decode_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let decoded = decode_rgba(&path).unwrap();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.as_raw(), &[255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_missing_file_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_rgba(&dir.path().join("absent.jpg"));
        assert!(matches!(result, Err(TextureError::ImageLoad(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_solid() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut manager = TextureManager::new(&device);
        let texture = manager
            .load_or_solid(
                &device,
                &queue,
                "earth",
                &dir.path().join("earth.jpg"),
                [40, 90, 200, 255],
            )
            .unwrap();
        assert_eq!(texture.dimensions, (1, 1));
        assert!(manager.get("earth").is_some());
    }

    #[test]
    fn test_texture_cache_deduplicates() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        let a = manager.create_solid(&device, &queue, "sun", [255, 255, 0, 255]).unwrap();
        let b = manager.create_solid(&device, &queue, "sun", [0, 0, 0, 255]).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
