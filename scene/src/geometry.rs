//! Procedural meshes for the parts of the scene that are not loaded from files.
use std::f32::consts::PI;

use crate::structs::Vertex;

#[derive(Clone, Copy, Debug)]
pub struct SphereOptions {
    pub center: [f32; 3],
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: 1.0,
            width_segments: 12,
            height_segments: 12,
        }
    }
}

/// Generate a UV sphere.
///
/// Returns `(vertices, indices)` as a CCW triangle list.
pub fn generate_uv_sphere(opts: SphereOptions) -> (Vec<Vertex>, Vec<u32>) {
    let stacks = opts.height_segments.max(2);
    let slices = opts.width_segments.max(3);

    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;

        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * 2.0 * PI;

            let normal = [phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos()];
            let position = [
                opts.center[0] + opts.radius * normal[0],
                opts.center[1] + opts.radius * normal[1],
                opts.center[2] + opts.radius * normal[2],
            ];
            vertices.push(Vertex::new(position, normal, [u, 1.0 - v]));
        }
    }

    let ring = slices + 1;
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

    for stack in 0..stacks {
        for slice in 0..slices {
            let i0 = stack * ring + slice;
            let i1 = i0 + 1;
            let i2 = (stack + 1) * ring + slice;
            let i3 = i2 + 1;

            // The pole rows collapse to points, skip their degenerate triangles
            if stack != 0 {
                indices.extend_from_slice(&[i0, i2, i1]);
            }
            if stack != stacks - 1 {
                indices.extend_from_slice(&[i1, i2, i3]);
            }
        }
    }

    (vertices, indices)
}

/// Generate a square plane of `size` lying in the xz plane at y = 0, facing up.
pub fn generate_ground_plane(size: f32) -> (Vec<Vertex>, Vec<u32>) {
    let h = size * 0.5;
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex::new([-h, 0.0, -h], up, [0.0, 0.0]),
        Vertex::new([-h, 0.0, h], up, [0.0, 1.0]),
        Vertex::new([h, 0.0, h], up, [1.0, 1.0]),
        Vertex::new([h, 0.0, -h], up, [1.0, 0.0]),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    (vertices, indices)
}
