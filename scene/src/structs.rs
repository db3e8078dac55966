use cgmath::{Matrix4, SquareMatrix};

use crate::camera::{OrbitCamera, Projection};
use crate::config::Config;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

//-----------Vertex-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self { position, normal, tex_coords }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

//-----------Camera-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    inv_view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
            inv_view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera, projection: &Projection) {
        let view_proj = OPENGL_TO_WGPU_MATRIX * projection.calc_matrix() * camera.calc_matrix();
        let position = camera.position();
        self.view_position = [position.x, position.y, position.z, 1.0];
        self.view_proj = view_proj.into();
        // A degenerate matrix only happens for a zero sized viewport, keep the last one
        if let Some(inverse) = view_proj.invert() {
            self.inv_view_proj = inverse.into();
        }
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.view_proj.into()
    }

    pub fn inv_view_proj(&self) -> Matrix4<f32> {
        self.inv_view_proj.into()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

//-----------Lights-----------------
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 4],               // rgb, intensity
    point_position: [f32; 4],        // xyz, range
    point_color: [f32; 4],           // rgb, intensity
    directional_direction: [f32; 4], // xyz pointing toward the light
    directional_color: [f32; 4],     // rgb, intensity
}

impl LightUniform {
    pub fn from_config(config: &Config) -> Self {
        let lights = &config.lights;
        let ambient = srgb_hex_to_linear(lights.ambient.color);
        let point = srgb_hex_to_linear(lights.point.color);
        let directional = srgb_hex_to_linear(lights.directional.color);
        let direction = normalize(lights.directional.position);

        Self {
            ambient: [ambient[0], ambient[1], ambient[2], lights.ambient.intensity],
            point_position: [
                lights.point.position[0],
                lights.point.position[1],
                lights.point.position[2],
                lights.point.range,
            ],
            point_color: [point[0], point[1], point[2], lights.point.intensity],
            directional_direction: [direction[0], direction[1], direction[2], 0.0],
            directional_color: [directional[0], directional[1], directional[2], lights.directional.intensity],
        }
    }
}

//-----------Objects-----------------
/// Per object material data. `params[0]` holds the opacity.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    base_color: [f32; 4],
    emissive: [f32; 4],
    params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(base_color: [f32; 4], emissive: [f32; 3]) -> Self {
        Self {
            base_color,
            emissive: [emissive[0], emissive[1], emissive[2], 0.0],
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn opacity(&self) -> f32 {
        self.params[0]
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.params[0] = opacity.clamp(0.0, 1.0);
    }
}

/// Converts a `0xRRGGBB` sRGB colour into linear rgb.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return [0.0, 1.0, 0.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = srgb_hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
        let red = srgb_hex_to_linear(0xff0000);
        assert!((red[0] - 1.0).abs() < 1e-6);
        assert_eq!(red[1], 0.0);
        assert_eq!(red[2], 0.0);
        // mid grey is darker in linear space
        assert!(srgb_hex_to_linear(0x808080)[0] < 0.5);
    }

    #[test]
    fn test_object_opacity_clamped() {
        let mut object = ObjectUniform::new([1.0; 4], [0.0; 3]);
        assert_eq!(object.opacity(), 1.0);
        object.set_opacity(0.25);
        assert_eq!(object.opacity(), 0.25);
        object.set_opacity(4.0);
        assert_eq!(object.opacity(), 1.0);
        object.set_opacity(-1.0);
        assert_eq!(object.opacity(), 0.0);
    }

    #[test]
    fn test_directional_light_normalized() {
        let lights = LightUniform::from_config(&Config::default());
        let d = lights.directional_direction;
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-6);
        assert_eq!(lights.point_position[3], 30.0);
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(Vertex::layout().array_stride, 32);
    }
}
