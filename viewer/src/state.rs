use std::collections::VecDeque;
use std::sync::Arc;

use egui_wgpu::ScreenDescriptor;
use winit::{event::*, keyboard::Key, window::Window};

use wgpu_utils::{BindGroupDescriptor, BindingResourceTemplate, BufferInitDescriptor, setup_gpu};

use gui::{EguiRenderer, GuiActions, GuiConfig, ScenePanel, ViewSettings, gui};

use scene::{
    create_depth_texture, create_sampler, texture_from_image, AssetData, AssetKind, AssetLoader, CameraController,
    CameraUniform, Config, DoorAnimationState, DoorPosition, ImageData, LightUniform, LoadedAsset, OrbitCamera,
    Projection, Vertex, DEPTH_FORMAT,
};

use crate::helper::{apply_door_trigger, clear_color, door_visibility, DoorTrigger, ground_mesh, hits_hotspot, hotspot_mesh, hotspot_visible, setup_camera};
use crate::objects::{object_bind_group_layout, ObjectContext, SceneObject};

/// Which blending a mesh pipeline uses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Opaque,
    /// Alpha blended, drawn from both sides, no depth writes.
    Transparent,
}

struct Background {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct State {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    //Pipelines
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    background_layout: wgpu::BindGroupLayout,
    background: Option<Background>,
    clear_color: wgpu::Color,
    //Camera
    camera: OrbitCamera,
    projection: Projection,
    pub camera_controller: CameraController,
    pub camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    cursor: Option<winit::dpi::PhysicalPosition<f64>>,
    //Objects
    object_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    ground: SceneObject,
    hotspot: SceneObject,
    ger: Option<SceneObject>,
    door_closed: Option<SceneObject>,
    door_open: Option<SceneObject>,
    //Door
    door: DoorAnimationState,
    loader: AssetLoader,
    userconfig: Config,
    //GUI
    pub egui: EguiRenderer,
    pub gui_config: GuiConfig,
    view_settings: ViewSettings,
    gui_actions: GuiActions,
    fps: VecDeque<f32>,
}

impl State {
    /// Constructs a new `State` instance.
    ///
    /// Sets up the gpu, the camera, the pipelines for the background and the
    /// lit meshes, the ground and hotspot, and the GUI. The models and the
    /// panorama are requested from the background loader and appear in a
    /// later frame.
    ///
    /// # Errors
    ///
    /// Fails if no adapter, device or surface can be created.
    pub async fn new(window: Arc<Window>, userconfig: Config) -> anyhow::Result<Self> {
        //---------Setup Hardware---------
        let (device, queue, surface, config, size) = setup_gpu(window.clone()).await?;
        log::info!("Hardware initialized");

        let depth_view = create_depth_texture(&device, config.width, config.height);

        //-------------Camera & Lights-------------
        let (camera, projection, camera_controller, camera_uniform) = setup_camera(&config, &userconfig);

        let camera_buffer = BufferInitDescriptor::uniform(Some("Camera Buffer"))
            .create_new_buffer(&device, &[camera_uniform]);
        let light_buffer = BufferInitDescriptor::uniform(Some("Light Buffer"))
            .create_new_buffer(&device, &[LightUniform::from_config(&userconfig)]);

        // Camera and lights are shared by every pipeline
        let (scene_bind_group_layout, scene_bind_group) = BindGroupDescriptor::new(
            Some("scene"),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            vec![
                BindingResourceTemplate::BufferUniform(camera_buffer.as_entire_binding()),
                BindingResourceTemplate::BufferUniform(light_buffer.as_entire_binding()),
            ],
        )
        .generate(&device);
        log::info!("Camera ready");

        //----------Mesh pipelines-------------
        let object_layout = object_bind_group_layout(&device);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../res/shader/scene.wgsl").into()),
        });
        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let opaque_pipeline = create_mesh_pipeline(&device, &mesh_pipeline_layout, &scene_shader, config.format, PipelineKind::Opaque);
        let transparent_pipeline = create_mesh_pipeline(&device, &mesh_pipeline_layout, &scene_shader, config.format, PipelineKind::Transparent);
        log::info!("Mesh shader&pipelines ready");

        //----------Background-------------
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../res/shader/background.wgsl").into()),
        });
        let background_layout = BindGroupDescriptor::new(
            Some("background"),
            wgpu::ShaderStages::FRAGMENT,
            vec![
                BindingResourceTemplate::TextureView(wgpu::BindingResource::TextureViewArray(&[])),
                BindingResourceTemplate::Sampler(wgpu::BindingResource::SamplerArray(&[])),
            ],
        )
        .generate_bind_group_layout(&device);
        let background_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &background_layout],
            push_constant_ranges: &[],
        });
        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&background_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Drawn first and never occludes anything
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });
        log::info!("Background shader&pipeline ready");

        //----------Static objects-------------
        let sampler = create_sampler(&device, wgpu::AddressMode::Repeat);
        let ctx = ObjectContext { device: &device, queue: &queue, layout: &object_layout, sampler: &sampler };
        let ground = SceneObject::from_mesh(&ctx, "ground", &ground_mesh(&userconfig));
        let hotspot = SceneObject::from_mesh(&ctx, "hotspot", &hotspot_mesh(&userconfig));

        //----------Assets-------------
        let mut loader = AssetLoader::new();
        let requests = [
            (AssetKind::Ger, userconfig.models.ger_path()),
            (AssetKind::DoorClosed, userconfig.models.door_closed_path()),
            (AssetKind::DoorOpen, userconfig.models.door_open_path()),
            (AssetKind::Background, userconfig.background.panorama_path()),
        ];
        for (kind, path) in requests {
            match path {
                Some(path) => loader.request(kind, path),
                None => log::info!("No path configured for {:?}", kind),
            }
        }

        //=============== GUI config (not directly in contact with wgpu) ===============
        let egui = EguiRenderer::new(
            &device,       // wgpu Device
            config.format, // TextureFormat
            None,
            1,             // samples
            &window,       // winit Window
        );

        let gui_config = GuiConfig::with_frame_limit(userconfig.ui.frame_limit);
        let view_settings = ViewSettings {
            door_speed: userconfig.door.speed,
            damping: userconfig.controls.damping,
        };

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            opaque_pipeline,
            transparent_pipeline,
            background_pipeline,
            background_layout,
            background: None,
            clear_color: clear_color(userconfig.background.clear_color),
            camera,
            projection,
            camera_controller,
            camera_uniform,
            camera_buffer,
            scene_bind_group,
            cursor: None,
            object_layout,
            sampler,
            ground,
            hotspot,
            ger: None,
            door_closed: None,
            door_open: None,
            door: DoorAnimationState::new(),
            loader,
            userconfig,
            egui,
            gui_config,
            view_settings,
            gui_actions: GuiActions::default(),
            fps: VecDeque::with_capacity(100),
        })
    }

    /// Resizes the surface, the depth buffer and the projection.
    ///
    /// A size of zero (minimized window) is ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.projection.resize(new_size.width, new_size.height);
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_texture(&self.device, new_size.width, new_size.height);
        }
    }

    /// Handles input events for the application.
    ///
    /// The ui gets the event first. What it does not consume goes to the
    /// camera, the hotspot picking and the door and framing keys.
    ///
    /// # Returns
    ///
    /// A boolean indicating whether the event was handled.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        // Releases always reach the camera so a drag never gets stuck
        if let WindowEvent::MouseInput { button, state: ElementState::Released, .. } = event {
            self.camera_controller.process_mouse_button(button, &ElementState::Released);
        }

        // UI updates
        if self.egui.handle_input(&self.window, event) {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Character(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key.to_lowercase().as_str() {
                "o" => {
                    self.trigger_door();
                    true
                }
                "f" => {
                    self.show_all();
                    true
                }
                _ => false,
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(*position);
                self.camera_controller.process_cursor(*position, self.size.height);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.camera_controller.process_scroll(delta);
                true
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left && *state == ElementState::Pressed && !self.egui.wants_pointer() {
                    self.pick();
                }
                self.camera_controller.process_mouse_button(button, state)
            }
            _ => false,
        }
    }

    /// Opens the door when the cursor is over the visible hotspot.
    fn pick(&mut self) {
        let Some(cursor) = self.cursor else { return };
        if !hotspot_visible(&self.door) {
            return;
        }
        if hits_hotspot(cursor, self.size, &self.camera_uniform, &self.userconfig) {
            log::debug!("Hotspot clicked");
            if self.apply_trigger(DoorTrigger::Hotspot) {
                log::info!("Opening door");
            }
        }
    }

    fn doors_loaded(&self) -> bool {
        self.door_closed.is_some() && self.door_open.is_some()
    }

    /// Opens a closed door or closes an open one. Does nothing while the door
    /// moves or before both door models are loaded.
    pub fn trigger_door(&mut self) {
        if self.apply_trigger(DoorTrigger::Toggle) {
            log::info!("Door {:?}", self.door.direction());
        }
    }

    fn apply_trigger(&mut self, trigger: DoorTrigger) -> bool {
        let (closed_loaded, open_loaded) = (self.door_closed.is_some(), self.door_open.is_some());
        if !(closed_loaded && open_loaded) {
            log::debug!("Door models not loaded yet");
        }
        apply_door_trigger(closed_loaded, open_loaded, &mut self.door, trigger)
    }

    /// Frames the whole ger model. Does nothing until it is loaded.
    pub fn show_all(&mut self) {
        let Some(bounds) = self.ger.as_ref().and_then(SceneObject::bounds) else {
            log::debug!("Nothing to frame yet");
            return;
        };
        self.camera.fit_to_bounds(&bounds);
        self.camera_controller.reset();
        log::info!("Framing ger at {:?}, size {:.2}", bounds.center(), bounds.size());
    }

    /// Turns finished loads into scene objects.
    fn receive_assets(&mut self) {
        for asset in self.loader.poll() {
            let LoadedAsset { kind, path, result } = asset;
            let data = match result {
                Ok(data) => data,
                Err(err) => {
                    log::warn!("Could not load {:?} from {}: {}", kind, path, err);
                    continue;
                }
            };

            match data {
                AssetData::Image(image) => self.set_background(&image),
                AssetData::Model(model) => {
                    let ctx = ObjectContext {
                        device: &self.device,
                        queue: &self.queue,
                        layout: &self.object_layout,
                        sampler: &self.sampler,
                    };
                    let object = SceneObject::from_model(&ctx, &path, &model);
                    match kind {
                        AssetKind::Ger => self.ger = Some(object),
                        AssetKind::DoorClosed => self.door_closed = Some(object),
                        AssetKind::DoorOpen => self.door_open = Some(object),
                        AssetKind::Background => log::warn!("Expected an image in {}", path),
                    }
                }
            }
            log::info!("{:?} ready", kind);
        }
    }

    fn set_background(&mut self, image: &ImageData) {
        let texture = texture_from_image(&self.device, &self.queue, "Background Texture", image);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = BindGroupDescriptor::new(
            Some("background"),
            wgpu::ShaderStages::FRAGMENT,
            vec![
                BindingResourceTemplate::TextureView(wgpu::BindingResource::TextureView(&view)),
                BindingResourceTemplate::Sampler(wgpu::BindingResource::Sampler(&self.sampler)),
            ],
        )
        .generate_bind_group(&self.device, &self.background_layout);
        self.background = Some(Background { _texture: texture, bind_group });
    }

    /// Applies the door opacities to the door objects and shows or hides the hotspot.
    fn apply_door_state(&mut self) {
        let visibility = door_visibility(self.door_closed.is_some(), self.door_open.is_some(), self.door.opacity());
        for (object, opacity) in [(&mut self.door_closed, visibility.closed), (&mut self.door_open, visibility.open)] {
            if let Some(object) = object {
                object.visible = opacity.is_some();
                if let Some(opacity) = opacity {
                    object.set_opacity(&self.queue, opacity);
                }
            }
        }
        self.hotspot.visible = hotspot_visible(&self.door);
    }

    /// Advances the scene by one frame.
    ///
    /// Picks up loaded assets, applies the GUI buttons of the last frame,
    /// moves the camera, and advances the door exactly once.
    pub fn update(&mut self, dt: std::time::Duration) {
        self.receive_assets();

        let actions = std::mem::take(&mut self.gui_actions);
        if actions.show_all {
            self.show_all();
        }
        if actions.toggle_door {
            self.trigger_door();
        }

        // Update the camera
        self.camera_controller.damping = self.view_settings.damping;
        self.camera_controller.update_camera(&mut self.camera, &self.projection, self.size.height);
        self.camera_uniform.update_view_proj(&self.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        // Update the door
        let was_animating = self.door.is_animating();
        self.door = self.door.advance(self.view_settings.door_speed);
        if was_animating && !self.door.is_animating() {
            log::info!("Door is {:?}", self.door.position());
        }
        self.apply_door_state();

        // ---------FPS---------
        let fps = 1.0 / dt.as_secs_f32().max(f32::EPSILON);
        self.fps.push_front(fps);
        self.fps.truncate(100);
    }

    /// Renders the current state of the application.
    ///
    /// One pass draws the background, the opaque objects and then the
    /// transparent doors. The GUI is drawn on top in its own pass.
    ///
    /// # Returns
    ///
    /// A `Result` that is `Ok` if the rendering was successful, or `Err` if there was an error with the surface.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Get the current output texture from the surface
        let output = self.surface.get_current_texture()?;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        //----------Scene pass----------
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            if let Some(background) = &self.background {
                render_pass.set_pipeline(&self.background_pipeline);
                render_pass.set_bind_group(1, &background.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            render_pass.set_pipeline(&self.opaque_pipeline);
            self.ground.draw(&mut render_pass);
            if let Some(ger) = &self.ger {
                ger.draw(&mut render_pass);
            }
            self.hotspot.draw(&mut render_pass);

            render_pass.set_pipeline(&self.transparent_pipeline);
            for door in [&self.door_closed, &self.door_open].into_iter().flatten() {
                door.draw(&mut render_pass);
            }
        }

        // Draw the GUI ontop of the render pass
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let ui_config = &self.userconfig.ui;
        let door_label = match self.door.position() {
            DoorPosition::Closed => ui_config.open_label.as_str(),
            DoorPosition::Open => ui_config.close_label.as_str(),
        };
        let panel = ScenePanel {
            door_label,
            show_all_label: &ui_config.show_all_label,
            door_enabled: self.doors_loaded() && !self.door.is_animating(),
            show_all_enabled: self.ger.is_some(),
            assets_loading: self.loader.pending(),
        };

        let actions = self.egui.draw(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            screen_descriptor,
            |ui| gui(ui, &self.fps, &mut self.gui_config, &panel, &mut self.view_settings),
        );
        self.gui_actions = actions;

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, blend, cull_mode, depth_write_enabled) = match kind {
        PipelineKind::Opaque => ("Opaque Pipeline", wgpu::BlendState::REPLACE, Some(wgpu::Face::Back), true),
        PipelineKind::Transparent => ("Transparent Pipeline", wgpu::BlendState::ALPHA_BLENDING, None, false),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
