//! Environment cubemap on the GPU.
//!
//! Six RGBA8 sRGB layers viewed as a cube and sampled by direction. Faces the
//! decoder could not read arrive as zeros and stay black.

use prism_assets::{CubeFace, CubemapFaces};

use crate::resources::texture;

pub struct EnvironmentCubemap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: u32,
}

impl EnvironmentCubemap {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, faces: &CubemapFaces) -> Self {
        let size = faces.size;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Cubemap"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for face in CubeFace::ALL {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: face.layer() as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &faces.texels(face),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * size),
                    rows_per_image: Some(size),
                },
                wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Environment Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = texture::linear_sampler(device, "Environment Sampler");

        let missing: Vec<_> = faces.missing().collect();
        if !missing.is_empty() {
            log::warn!("environment cubemap uploaded with blank faces: {missing:?}");
        }
        Self {
            texture,
            view,
            sampler,
            size,
        }
    }
}
