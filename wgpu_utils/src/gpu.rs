use std::sync::Arc;

use anyhow::{anyhow, Context};
use winit::window::Window;

/// Picks an sRGB format so the shaders can write linear colours.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Creates the device, queue and a configured surface for `window`.
///
/// The surface holds its own handle to the window, so it lives as long as the renderer needs it.
pub async fn setup_gpu(window: Arc<Window>) -> anyhow::Result<(wgpu::Device, wgpu::Queue, wgpu::Surface<'static>, wgpu::SurfaceConfiguration, winit::dpi::PhysicalSize<u32>)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let surface = instance
        .create_surface(window.clone())
        .context("Failed to create surface")?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow!("No suitable graphics adapter found"))?;

    log::info!("Using adapter {} ({:?})", adapter.get_info().name, adapter.get_info().backend);

    let required_limits = if cfg!(target_arch = "wasm32") {
        wgpu::Limits::downlevel_webgl2_defaults()
    } else {
        wgpu::Limits::default()
    };

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: required_limits.using_resolution(adapter.limits()),
            },
            None,
        )
        .await
        .context("Failed to request device")?;

    let surface_caps = surface.get_capabilities(&adapter);
    let format = choose_surface_format(&surface_caps.formats)
        .ok_or_else(|| anyhow!("Surface is incompatible with the adapter"))?;

    let size = window.inner_size();

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: surface_caps.present_modes[0],
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);
    log::info!("Surface configured as {:?} {}x{}", config.format, config.width, config.height);

    Ok((device, queue, surface, config, size))
}
