use std::sync::Arc;

use winit::{event::*, event_loop::{ControlFlow, EventLoop}, keyboard::{Key, NamedKey}};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use scene::Config;

pub mod helper;
pub mod objects;
pub mod state;

use crate::state::State;

const DEFAULT_CONFIG: &str = "res/config.toml";

/// Starts the viewer.
///
/// This function initializes the logger, loads the scene configuration,
/// creates the window, and starts the event loop.
/// For wasm32 targets it sets a panic hook, logs to the browser console and
/// attaches the canvas to the page. Otherwise `env_logger` is used, so
/// `RUST_LOG=info` shows the loading progress.
///
/// The event loop runs continuously and handles:
/// - Closing the window when requested by the user or when the escape key is pressed
/// - Updating and rendering the state when a redraw is requested
/// - Resizing the state when the window size changes
/// - Requesting a redraw before the system goes to idle and limiting the frame rate
///
/// # Arguments
///
/// * `config_path` - Path of a TOML scene file, `res/config.toml` when `None`.
pub async fn run(config_path: Option<String>) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(e) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::error_1(&format!("Couldn't initialize logger: {}", e).into());
            }
        } else {
            env_logger::init();
        }
    }

    let config_path = config_path.unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let userconfig = Config::load_or_default(&config_path);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Could not create event loop: {}", e);
            return;
        }
    };
    let title = env!("CARGO_PKG_NAME");
    let window = match winit::window::WindowBuilder::new()
        .with_title(title)
        .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(e) => {
            log::error!("Could not create window: {}", e);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    attach_canvas(&window);

    // ControlFlow::Poll continuously runs the event loop,
    // even if the OS hasn't dispatched any events.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = match State::new(window, userconfig).await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start the viewer: {:#}", e);
            return;
        }
    };
    let mut last_render_time = instant::Instant::now();

    // Start the event loop
    let result = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window.id() && !state.input(event) => {
                // Handle window events that aren't related to the ui, camera or door
                match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                logical_key: Key::Named(NamedKey::Escape),
                                ..
                            },
                        ..
                    } => elwt.exit(),
                    WindowEvent::RedrawRequested => {
                        let now = instant::Instant::now();
                        let dt = now - last_render_time;
                        last_render_time = now;
                        state.update(dt);
                        match state.render() {
                            Ok(_) => {}
                            // Reconfigure the surface if it's lost or outdated
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of memory, closing");
                                elwt.exit();
                            }
                            // We're ignoring timeouts
                            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout"),
                        }
                    }
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        log::info!("Window={window_id:?} changed scale to {scale_factor}");
                    }
                    _ => {}
                };
            }
            // Request a redraw before the system goes to idle
            Event::AboutToWait => {
                limit_frame_rate(&state, last_render_time);
                state.window.request_redraw();
            }
            _ => (),
        }
    });

    if let Err(e) = result {
        log::error!("Event loop stopped with an error: {}", e);
    }
}

/// Sleeps until the configured frame time is reached. Browsers pace frames themselves.
fn limit_frame_rate(state: &State, last_render_time: instant::Instant) {
    let limit = state.gui_config.frame_limit;
    if state.gui_config.frame_limit_unlimited || limit == 0 {
        return;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let target = std::time::Duration::from_secs_f32(1.0 / limit as f32);
        let frame_time = instant::Instant::now() - last_render_time;
        if frame_time < target {
            std::thread::sleep(target - frame_time);
        }
    }
    #[cfg(target_arch = "wasm32")]
    let _ = last_render_time;
}

#[cfg(target_arch = "wasm32")]
fn attach_canvas(window: &winit::window::Window) {
    use winit::platform::web::WindowExtWebSys;

    let attached = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| {
            let body = doc.body()?;
            let canvas = web_sys::Element::from(window.canvas()?);
            body.append_child(&canvas).ok()
        });
    if attached.is_none() {
        log::error!("Couldn't append canvas to document body");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    wasm_bindgen_futures::spawn_local(run(None));
}
