use cgmath::*;
use cgmath::Zero;
use std::f32::consts::PI;
use winit::dpi::PhysicalPosition;
use winit::event::*;

use crate::config::ControlsConfig;
use crate::models::Bounds;

// Keeps the polar angle away from the poles so look_at never degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// A camera orbiting around a target point.
///
/// The position is stored in spherical coordinates relative to the target.
/// `theta` is the azimuth around the y axis measured from +z, `phi` is the
/// polar angle measured from +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub radius: f32,
    pub theta: Rad<f32>,
    pub phi: Rad<f32>,
}

impl OrbitCamera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        let mut camera = Self {
            target: target.into(),
            radius: 1.0,
            theta: Rad(0.0),
            phi: Rad(PI / 2.0),
        };
        camera.set_position(position.into());
        camera
    }

    pub fn position(&self) -> Point3<f32> {
        let sin_phi = self.phi.0.sin();
        let offset = Vector3::new(
            self.radius * sin_phi * self.theta.0.sin(),
            self.radius * self.phi.0.cos(),
            self.radius * sin_phi * self.theta.0.cos(),
        );
        self.target + offset
    }

    /// Moves the camera to `position` while keeping the current target.
    pub fn set_position(&mut self, position: Point3<f32>) {
        let offset = position - self.target;
        self.radius = offset.magnitude();
        if self.radius == 0.0 {
            self.theta = Rad(0.0);
            self.phi = Rad(0.0);
        } else {
            self.theta = Rad(offset.x.atan2(offset.z));
            self.phi = Rad((offset.y / self.radius).clamp(-1.0, 1.0).acos());
        }
    }

    /// Frames `bounds`, looking at its centre from slightly above and in front.
    pub fn fit_to_bounds(&mut self, bounds: &Bounds) {
        let center = bounds.center();
        let size = bounds.size();
        self.target = Point3::new(center.x, center.y, center.z);
        let position = self.target + Vector3::new(0.0, size * 0.3, size * 1.2);
        self.set_position(position);
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }
}

/// Represents a projection of a 3D scene onto the 2D plane of the camera.
///
/// The projection is defined by an aspect ratio, a field of view, and near and far clipping planes.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Turns mouse input into orbit, pan and zoom movements of an [`OrbitCamera`].
///
/// Left drag rotates around the target, right drag pans the target and the
/// wheel zooms. With damping enabled every movement is applied gradually: each
/// update applies `damping` of the pending delta and keeps the rest.
#[derive(Debug)]
pub struct CameraController {
    rotate_theta: f32,
    rotate_phi: f32,
    pan_pixels: Vector2<f32>,
    pan_offset: Vector3<f32>,
    scale: f32,
    rotating: bool,
    panning: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl CameraController {
    pub fn new(damping: f32, min_distance: f32, max_distance: f32) -> Self {
        Self {
            rotate_theta: 0.0,
            rotate_phi: 0.0,
            pan_pixels: Vector2::zero(),
            pan_offset: Vector3::zero(),
            scale: 1.0,
            rotating: false,
            panning: false,
            last_cursor: None,
            damping,
            min_distance,
            max_distance,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }

    pub fn from_config(config: &ControlsConfig) -> Self {
        Self::new(config.damping, config.min_distance, config.max_distance)
    }

    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    pub fn process_mouse_button(&mut self, button: &MouseButton, state: &ElementState) -> bool {
        let pressed = *state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                self.rotating = pressed;
                true
            }
            MouseButton::Right | MouseButton::Middle => {
                self.panning = pressed;
                true
            }
            _ => false,
        }
    }

    /// Tracks the cursor and turns movement into rotation or panning while a button is held.
    pub fn process_cursor(&mut self, position: PhysicalPosition<f64>, viewport_height: u32) {
        if let Some(last) = self.last_cursor {
            let dx = (position.x - last.x) as f32;
            let dy = (position.y - last.y) as f32;
            if self.rotating {
                self.process_mouse(dx, dy, viewport_height);
            } else if self.panning {
                self.pan_pixels += Vector2::new(dx, dy);
            }
        }
        self.last_cursor = Some(position);
    }

    pub fn process_mouse(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.rotate_theta -= 2.0 * PI * dx / height * self.rotate_speed;
        self.rotate_phi -= 2.0 * PI * dy / height * self.rotate_speed;
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            // A line is roughly 100 pixels
            MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => *scroll as f32 / 100.0,
        };
        // Scrolling up moves the camera closer
        self.scale *= 0.95f32.powf(steps * self.zoom_speed);
    }

    /// Drops pending movement, e.g. after the camera was placed programmatically.
    pub fn reset(&mut self) {
        self.rotate_theta = 0.0;
        self.rotate_phi = 0.0;
        self.pan_pixels = Vector2::zero();
        self.pan_offset = Vector3::zero();
        self.scale = 1.0;
    }

    pub fn update_camera(&mut self, camera: &mut OrbitCamera, projection: &Projection, viewport_height: u32) {
        if self.pan_pixels != Vector2::zero() {
            self.pan_offset += self.pan_to_world(camera, projection, viewport_height);
            self.pan_pixels = Vector2::zero();
        }

        let factor = if self.damping > 0.0 { self.damping.min(1.0) } else { 1.0 };

        camera.theta += Rad(self.rotate_theta * factor);
        camera.phi = Rad((camera.phi.0 + self.rotate_phi * factor).clamp(POLAR_EPSILON, PI - POLAR_EPSILON));
        camera.radius = (camera.radius * self.scale).clamp(self.min_distance, self.max_distance);
        camera.target += self.pan_offset * factor;

        if factor < 1.0 {
            self.rotate_theta *= 1.0 - factor;
            self.rotate_phi *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
        } else {
            self.rotate_theta = 0.0;
            self.rotate_phi = 0.0;
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;
    }

    // Pans so that a point at the target depth follows the cursor.
    fn pan_to_world(&self, camera: &OrbitCamera, projection: &Projection, viewport_height: u32) -> Vector3<f32> {
        let height = viewport_height.max(1) as f32;
        let offset = camera.position() - camera.target;
        let target_distance = offset.magnitude() * (projection.fovy.0 / 2.0).tan();

        let forward = (-offset).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);

        let left_amount = 2.0 * self.pan_pixels.x * target_distance / height * self.pan_speed;
        let up_amount = 2.0 * self.pan_pixels.y * target_distance / height * self.pan_speed;
        -right * left_amount + up * up_amount
    }
}
