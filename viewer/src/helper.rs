use winit::dpi::{PhysicalPosition, PhysicalSize};
use wgpu::SurfaceConfiguration;

use scene::{
    camera::{CameraController, OrbitCamera, Projection},
    config::Config,
    cursor_to_ndc, generate_ground_plane, generate_uv_sphere, srgb_hex_to_linear,
    CameraUniform, DoorAnimationState, DoorDirection, DoorOpacity, DoorPosition, MeshData, Ray, SphereOptions,
};

/// Sets up the camera for the rendering scene.
///
/// The camera starts at the configured position looking at the configured
/// target. The controller takes damping and distance limits from the
/// `[controls]` section and the uniform is filled for the first frame.
///
/// # Arguments
///
/// * `config` - The surface configuration, its size gives the aspect ratio.
/// * `userconfig` - The scene configuration.
pub fn setup_camera(config: &SurfaceConfiguration, userconfig: &Config) -> (OrbitCamera, Projection, CameraController, CameraUniform) {
    let camera = OrbitCamera::new(userconfig.camera.position, userconfig.camera.target);
    let projection = Projection::new(config.width,
                                    config.height,
                                    cgmath::Deg(userconfig.camera.fov),
                                    userconfig.camera.near_far[0],
                                    userconfig.camera.near_far[1]);
    let camera_controller = CameraController::from_config(&userconfig.controls);

    let mut camera_uniform = CameraUniform::new();
    camera_uniform.update_view_proj(&camera, &projection);

    (camera, projection, camera_controller, camera_uniform)
}

/// The ground plane with its configured colour.
pub fn ground_mesh(userconfig: &Config) -> MeshData {
    let (vertices, indices) = generate_ground_plane(userconfig.ground.size);
    let color = srgb_hex_to_linear(userconfig.ground.color);
    MeshData {
        vertices,
        indices,
        base_color: [color[0], color[1], color[2], 1.0],
        emissive: [0.0; 3],
        texture: None,
    }
}

/// The red marker that opens the door when clicked.
pub fn hotspot_mesh(userconfig: &Config) -> MeshData {
    let hotspot = &userconfig.hotspot;
    let (vertices, indices) = generate_uv_sphere(SphereOptions {
        center: hotspot.position,
        radius: hotspot.radius,
        width_segments: hotspot.segments,
        height_segments: hotspot.segments,
    });
    let color = srgb_hex_to_linear(hotspot.color);
    MeshData {
        vertices,
        indices,
        base_color: [color[0], color[1], color[2], 1.0],
        emissive: srgb_hex_to_linear(hotspot.emissive),
        texture: None,
    }
}

pub fn clear_color(hex: u32) -> wgpu::Color {
    let [r, g, b] = srgb_hex_to_linear(hex);
    wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: 1.0 }
}

/// Opacity of each door visual this frame, `None` when it is not drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorVisibility {
    pub closed: Option<f32>,
    pub open: Option<f32>,
}

/// Decides which door visuals are drawn.
///
/// With both models loaded each one is drawn while its opacity is above zero.
/// Until then the closed door stands in at full opacity and the open door is hidden.
pub fn door_visibility(closed_loaded: bool, open_loaded: bool, opacity: DoorOpacity) -> DoorVisibility {
    let visible = |opacity: f32| if opacity > 0.0 { Some(opacity) } else { None };
    match (closed_loaded, open_loaded) {
        (true, true) => DoorVisibility {
            closed: visible(opacity.closed),
            open: visible(opacity.open),
        },
        (true, false) => DoorVisibility { closed: Some(1.0), open: None },
        _ => DoorVisibility { closed: None, open: None },
    }
}

/// The hotspot only shows while the door is shut or shutting.
pub fn hotspot_visible(door: &DoorAnimationState) -> bool {
    door.position() == DoorPosition::Closed
}

/// What asked the door to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTrigger {
    /// A click on the hotspot, which can only open the door.
    Hotspot,
    /// The door button or the `O` key.
    Toggle,
}

/// Passes a trigger to the door once both door models are loaded.
///
/// Returns whether the door started moving. Triggers before both models
/// arrive, or while the door is still moving, leave `door` untouched.
pub fn apply_door_trigger(closed_loaded: bool, open_loaded: bool, door: &mut DoorAnimationState, trigger: DoorTrigger) -> bool {
    if !(closed_loaded && open_loaded) {
        return false;
    }
    match trigger {
        DoorTrigger::Hotspot => door.open(),
        DoorTrigger::Toggle => door.toggle(),
    }
}

/// Whether the cursor is over the hotspot sphere.
pub fn hits_hotspot(cursor: PhysicalPosition<f64>, size: PhysicalSize<u32>, camera_uniform: &CameraUniform, userconfig: &Config) -> bool {
    let inv_view_proj: [[f32; 4]; 4] = camera_uniform.inv_view_proj().into();
    let ray = Ray::from_ndc(cursor_to_ndc(cursor, size), glam::Mat4::from_cols_array_2d(&inv_view_proj));
    let center = glam::Vec3::from(userconfig.hotspot.position);
    ray.intersect_sphere(center, userconfig.hotspot.radius).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_config(width: u32, height: u32) -> SurfaceConfiguration {
        SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    #[test]
    fn test_door_visibility_before_loading() {
        let opacity = DoorAnimationState::new().opacity();
        assert_eq!(door_visibility(false, false, opacity), DoorVisibility { closed: None, open: None });
        assert_eq!(door_visibility(false, true, opacity), DoorVisibility { closed: None, open: None });
        assert_eq!(door_visibility(true, false, opacity), DoorVisibility { closed: Some(1.0), open: None });
    }

    #[test]
    fn test_door_visibility_follows_opacity() {
        let mut door = DoorAnimationState::new();
        assert_eq!(door_visibility(true, true, door.opacity()), DoorVisibility { closed: Some(1.0), open: None });

        assert!(door.open());
        door = door.advance(0.25);
        assert_eq!(door_visibility(true, true, door.opacity()), DoorVisibility { closed: Some(0.75), open: Some(0.25) });

        door = door.advance(1.0);
        assert_eq!(door_visibility(true, true, door.opacity()), DoorVisibility { closed: None, open: Some(1.0) });
    }

    #[test]
    fn test_triggers_wait_for_both_door_models() {
        for (closed_loaded, open_loaded) in [(false, false), (true, false), (false, true)] {
            for trigger in [DoorTrigger::Hotspot, DoorTrigger::Toggle] {
                let mut door = DoorAnimationState::new();
                assert!(!apply_door_trigger(closed_loaded, open_loaded, &mut door, trigger));
                assert_eq!(door, DoorAnimationState::new());
            }
        }

        let mut door = DoorAnimationState::new();
        assert!(apply_door_trigger(true, true, &mut door, DoorTrigger::Hotspot));
        assert_eq!(door.direction(), DoorDirection::Opening);
    }

    #[test]
    fn test_trigger_ignored_while_moving() {
        let mut door = DoorAnimationState::new();
        assert!(apply_door_trigger(true, true, &mut door, DoorTrigger::Toggle));
        door = door.advance(0.04);
        let moving = door;
        assert!(!apply_door_trigger(true, true, &mut door, DoorTrigger::Toggle));
        assert!(!apply_door_trigger(true, true, &mut door, DoorTrigger::Hotspot));
        assert_eq!(door, moving);

        door = door.advance(1.0);
        assert!(!apply_door_trigger(true, true, &mut door, DoorTrigger::Hotspot));
        assert!(apply_door_trigger(true, true, &mut door, DoorTrigger::Toggle));
        assert_eq!(door.direction(), DoorDirection::Closing);
    }

    #[test]
    fn test_hotspot_hidden_once_door_opens() {
        let mut door = DoorAnimationState::new();
        assert!(hotspot_visible(&door));
        door.open();
        assert!(!hotspot_visible(&door));
        door = door.advance(1.0);
        assert!(!hotspot_visible(&door));
        door.close();
        // closing heads back to the closed position
        assert!(hotspot_visible(&door));
    }

    #[test]
    fn test_clear_color_is_linear() {
        let color = clear_color(0xffffff);
        assert!((color.r - 1.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
        assert!(clear_color(0x808080).g < 0.5);
    }

    #[test]
    fn test_scene_meshes_follow_config() {
        let userconfig = Config::default();
        let ground = ground_mesh(&userconfig);
        assert_eq!(ground.vertices.len(), 4);
        assert_eq!(ground.bounds().map(|b| b.max.x), Some(50.0));

        let hotspot = hotspot_mesh(&userconfig);
        assert!(hotspot.emissive[0] > 0.0);
        assert_eq!(hotspot.emissive[1], 0.0);
        let bounds = hotspot.bounds().expect("bounds");
        assert!((bounds.center() - glam::Vec3::new(1.4, 5.8, 13.0)).length() < 1e-4);
    }

    #[test]
    fn test_clicking_the_hotspot() {
        let userconfig = Config::default();
        let size = PhysicalSize::new(1200, 800);
        let (camera, projection, _, camera_uniform) = setup_camera(&surface_config(size.width, size.height), &userconfig);
        assert!((projection.aspect() - 1.5).abs() < 1e-6);

        // project the hotspot centre to pixels
        let view_proj: [[f32; 4]; 4] = camera_uniform.view_proj().into();
        let clip = glam::Mat4::from_cols_array_2d(&view_proj) * glam::Vec3::from(userconfig.hotspot.position).extend(1.0);
        let ndc = glam::Vec2::new(clip.x / clip.w, clip.y / clip.w);
        let pixel = PhysicalPosition::new(
            ((ndc.x + 1.0) / 2.0 * size.width as f32) as f64,
            ((1.0 - ndc.y) / 2.0 * size.height as f32) as f64,
        );

        assert!(hits_hotspot(pixel, size, &camera_uniform, &userconfig));
        assert!(!hits_hotspot(PhysicalPosition::new(5.0, 5.0), size, &camera_uniform, &userconfig));
        assert!(camera.radius > 30.0);
    }
}
