use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Converts a cursor position in window pixels to normalized device coordinates.
///
/// The top left corner maps to (-1, 1) and the bottom right corner to (1, -1).
pub fn cursor_to_ndc(position: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Vec2 {
    let width = size.width.max(1) as f32;
    let height = size.height.max(1) as f32;
    Vec2::new(
        (position.x as f32 / width) * 2.0 - 1.0,
        -(position.y as f32 / height) * 2.0 + 1.0,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always normalized.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize() }
    }

    /// Builds the ray under a point on screen from the inverse view-projection.
    ///
    /// Expects wgpu clip space, where depth runs from 0 at the near plane to 1 at the far plane.
    pub fn from_ndc(ndc: Vec2, inv_view_proj: Mat4) -> Self {
        let near = inv_view_proj * ndc.extend(0.0).extend(1.0);
        let far = inv_view_proj * ndc.extend(1.0).extend(1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;
        Self::new(near, far - near)
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to the first hit with the sphere, if any.
    ///
    /// A ray starting inside the sphere hits its far side.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        let far = -b + sqrt_d;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;
    use crate::camera::{OrbitCamera, Projection};
    use crate::structs::CameraUniform;

    fn inv_view_proj(camera: &OrbitCamera, projection: &Projection) -> Mat4 {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera, projection);
        let m: [[f32; 4]; 4] = uniform.inv_view_proj().into();
        Mat4::from_cols_array_2d(&m)
    }

    #[test]
    fn test_cursor_to_ndc_corners() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(cursor_to_ndc(PhysicalPosition::new(0.0, 0.0), size), Vec2::new(-1.0, 1.0));
        assert_eq!(cursor_to_ndc(PhysicalPosition::new(800.0, 600.0), size), Vec2::new(1.0, -1.0));
        assert_eq!(cursor_to_ndc(PhysicalPosition::new(400.0, 300.0), size), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));

        let hit = ray.intersect_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0).expect("hit");
        assert!((hit - 9.0).abs() < 1e-5);
        assert!((ray.at(hit) - Vec3::new(0.0, 0.0, -9.0)).length() < 1e-5);

        // behind the origin
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 10.0), 1.0).is_none());
        // off to the side
        assert!(ray.intersect_sphere(Vec3::new(3.0, 0.0, -10.0), 1.0).is_none());
        // from inside
        let inside = ray.intersect_sphere(Vec3::ZERO, 2.0).expect("hit");
        assert!((inside - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::new((0.0, 16.0, 30.0), (0.0, 1.5, 0.0));
        let projection = Projection::new(800, 600, Deg(60.0), 0.1, 2000.0);
        let ray = Ray::from_ndc(Vec2::ZERO, inv_view_proj(&camera, &projection));

        let position = camera.position();
        let expected = (Vec3::new(0.0, 1.5, 0.0) - Vec3::new(position.x, position.y, position.z)).normalize();
        assert!((ray.direction - expected).length() < 1e-3);
        assert!(ray.intersect_sphere(Vec3::new(0.0, 1.5, 0.0), 0.3).is_some());
    }

    #[test]
    fn test_hotspot_picking() {
        let camera = OrbitCamera::new((0.0, 16.0, 30.0), (0.0, 1.5, 0.0));
        let projection = Projection::new(800, 600, Deg(60.0), 0.1, 2000.0);
        let inverse = inv_view_proj(&camera, &projection);

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, &projection);
        let view_proj: [[f32; 4]; 4] = uniform.view_proj().into();
        let view_proj = Mat4::from_cols_array_2d(&view_proj);

        // project the hotspot to find where it is on screen
        let hotspot = Vec3::new(1.4, 5.8, 13.0);
        let clip = view_proj * hotspot.extend(1.0);
        let ndc = clip.xy() / clip.w;

        let ray = Ray::from_ndc(ndc, inverse);
        assert!(ray.intersect_sphere(hotspot, 0.3).is_some());

        let beside = Ray::from_ndc(ndc + Vec2::new(0.2, 0.0), inverse);
        assert!(beside.intersect_sphere(hotspot, 0.3).is_none());
    }
}
