use anyhow::{anyhow, Context};
use glam::Vec3;

use crate::structs::Vertex;

/// Axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Returns `None` for an empty point set.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        }))
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the diagonal.
    pub fn size(&self) -> f32 {
        (self.max - self.min).length()
    }
}

/// RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// A single white pixel, used for untextured meshes.
    pub fn white() -> Self {
        Self { width: 1, height: 1, rgba: vec![255; 4] }
    }
}

/// One drawable primitive of a model, ready for upload.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub texture: Option<ImageData>,
}

impl MeshData {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }
}

#[derive(Debug, Clone)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub bounds: Bounds,
}

impl ModelData {
    pub fn from_meshes(meshes: Vec<MeshData>) -> anyhow::Result<Self> {
        let bounds = meshes
            .iter()
            .filter_map(MeshData::bounds)
            .reduce(|a, b| a.union(&b))
            .ok_or_else(|| anyhow!("Model contains no vertices"))?;
        Ok(Self { meshes, bounds })
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.indices.len() / 3).sum()
    }
}

/// Loads every triangle mesh of a glTF/GLB file.
///
/// Node transforms are already applied by `easy_gltf`, so the vertices are in
/// world space. Primitives that are not triangle lists are skipped.
pub fn load_gltf(path: &str) -> anyhow::Result<ModelData> {
    let scenes = easy_gltf::load(path)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Failed to load glTF {}", path))?;

    let mut meshes = Vec::new();
    for scene in scenes {
        log::debug!(
            "Cameras: #{}  Lights: #{}  Models: #{} in glTF scene {}",
            scene.cameras.len(),
            scene.lights.len(),
            scene.models.len(),
            path
        );

        for model in scene.models {
            let triangles = match model.triangles() {
                Ok(triangles) => triangles,
                Err(err) => {
                    log::warn!("Skipping primitive in {}: {}", path, err);
                    continue;
                }
            };

            let mut vertices = Vec::with_capacity(triangles.len() * 3);
            for triangle in triangles {
                for vertex in triangle.iter() {
                    vertices.push(Vertex::new(
                        [vertex.position.x, vertex.position.y, vertex.position.z],
                        [vertex.normal.x, vertex.normal.y, vertex.normal.z],
                        [vertex.tex_coords.x, vertex.tex_coords.y],
                    ));
                }
            }
            let indices = (0..vertices.len() as u32).collect();

            let material = model.material();
            let base_color: [f32; 4] = material.pbr.base_color_factor.into();
            let emissive: [f32; 3] = material.emissive.factor.into();
            let texture = material.pbr.base_color_texture.as_ref().map(|texture| ImageData {
                width: texture.width(),
                height: texture.height(),
                rgba: texture.as_raw().clone(),
            });

            meshes.push(MeshData { vertices, indices, base_color, emissive, texture });
        }
    }

    let model = ModelData::from_meshes(meshes).with_context(|| format!("Nothing to draw in {}", path))?;
    log::info!("Loaded {} with {} meshes and {} triangles", path, model.meshes.len(), model.triangle_count());
    Ok(model)
}

/// Loads an image (e.g. the background panorama) as RGBA8.
pub fn load_image(path: &str) -> anyhow::Result<ImageData> {
    let image = image::open(path).with_context(|| format!("Failed to load image {}", path))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded {} ({}x{})", path, width, height);
    Ok(ImageData { width, height, rgba: rgba.into_raw() })
}
