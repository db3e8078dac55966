use wgpu::{Device, Queue, Texture, TextureDimension, TextureFormat};

use crate::models::ImageData;

/// Colour textures hold sRGB data, the sampler returns linear values.
pub const COLOR_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

pub fn create_texture(device: &Device, label: &str, width: u32, height: u32) -> Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        view_formats: &[],
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
    })
}

fn write_texture(queue: &Queue, texture: &Texture, image: &ImageData) {
    let bytes_per_pixel = 4;

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(image.width * bytes_per_pixel),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Uploads `image` into a new texture. Empty images become a single white pixel.
pub fn texture_from_image(device: &Device, queue: &Queue, label: &str, image: &ImageData) -> Texture {
    let white = ImageData::white();
    let image = if image.width == 0 || image.height == 0 || image.rgba.len() < (image.width * image.height * 4) as usize {
        log::warn!("Texture {} has no usable pixels, using white", label);
        &white
    } else {
        image
    };

    let texture = create_texture(device, label, image.width, image.height);
    write_texture(queue, &texture, image);
    texture
}

/// Depth buffer matching the surface size. Must be recreated on resize.
pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        view_formats: &[],
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub fn create_sampler(device: &Device, address_mode: wgpu::AddressMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        anisotropy_clamp: 1,
        ..Default::default()
    })
}
