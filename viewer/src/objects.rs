use wgpu_utils::{BindGroupDescriptor, BindingResourceTemplate, BufferInitDescriptor};

use scene::{texture_from_image, Bounds, ImageData, MeshData, ModelData, ObjectUniform, Vertex};

const OBJECT_VISIBILITY: wgpu::ShaderStages = wgpu::ShaderStages::VERTEX_FRAGMENT;

/// Layout of the per mesh bind group: material uniform, base colour texture, sampler.
pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    // Only the kind of each binding matters for the layout
    BindGroupDescriptor::new(
        Some("object"),
        OBJECT_VISIBILITY,
        vec![
            BindingResourceTemplate::BufferUniform(wgpu::BindingResource::BufferArray(&[])),
            BindingResourceTemplate::TextureView(wgpu::BindingResource::TextureViewArray(&[])),
            BindingResourceTemplate::Sampler(wgpu::BindingResource::SamplerArray(&[])),
        ],
    )
    .generate_bind_group_layout(device)
}

/// Everything needed to create gpu objects.
pub struct ObjectContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layout: &'a wgpu::BindGroupLayout,
    pub sampler: &'a wgpu::Sampler,
}

/// One uploaded mesh with its own material uniform.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform: ObjectUniform,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

impl GpuMesh {
    pub fn new(ctx: &ObjectContext, label: &str, vertices: &[Vertex], indices: &[u32], uniform: ObjectUniform, image: Option<&ImageData>) -> Self {
        let vertex_buffer = BufferInitDescriptor::new(Some("Vertex Buffer"), wgpu::BufferUsages::VERTEX)
            .create_new_buffer(ctx.device, vertices);
        let index_buffer = BufferInitDescriptor::new(Some("Index Buffer"), wgpu::BufferUsages::INDEX)
            .create_new_buffer(ctx.device, indices);
        let uniform_buffer = BufferInitDescriptor::uniform(Some("Object Buffer"))
            .create_new_buffer(ctx.device, &[uniform]);

        let white = ImageData::white();
        let texture = texture_from_image(ctx.device, ctx.queue, label, image.unwrap_or(&white));
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = BindGroupDescriptor::new(
            Some(label),
            OBJECT_VISIBILITY,
            vec![
                BindingResourceTemplate::BufferUniform(uniform_buffer.as_entire_binding()),
                BindingResourceTemplate::TextureView(wgpu::BindingResource::TextureView(&texture_view)),
                BindingResourceTemplate::Sampler(wgpu::BindingResource::Sampler(ctx.sampler)),
            ],
        )
        .generate_bind_group(ctx.device, ctx.layout);

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform,
            uniform_buffer,
            bind_group,
            _texture: texture,
        }
    }

    fn set_opacity(&mut self, queue: &wgpu::Queue, opacity: f32) {
        let previous = self.uniform.opacity();
        self.uniform.set_opacity(opacity);
        if self.uniform.opacity() != previous {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// A visual in the scene made of one or more meshes that share visibility and opacity.
pub struct SceneObject {
    pub name: String,
    meshes: Vec<GpuMesh>,
    bounds: Option<Bounds>,
    pub visible: bool,
    opacity: f32,
}

impl SceneObject {
    pub fn from_model(ctx: &ObjectContext, name: &str, model: &ModelData) -> Self {
        let meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| {
                let label = format!("{} mesh {}", name, i);
                GpuMesh::new(
                    ctx,
                    &label,
                    &mesh.vertices,
                    &mesh.indices,
                    ObjectUniform::new(mesh.base_color, mesh.emissive),
                    mesh.texture.as_ref(),
                )
            })
            .collect();

        Self {
            name: name.to_string(),
            meshes,
            bounds: Some(model.bounds),
            visible: true,
            opacity: 1.0,
        }
    }

    pub fn from_mesh(ctx: &ObjectContext, name: &str, mesh: &MeshData) -> Self {
        let uniform = ObjectUniform::new(mesh.base_color, mesh.emissive);
        Self {
            name: name.to_string(),
            meshes: vec![GpuMesh::new(ctx, name, &mesh.vertices, &mesh.indices, uniform, mesh.texture.as_ref())],
            bounds: mesh.bounds(),
            visible: true,
            opacity: 1.0,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Writes the opacity to every mesh uniform. Only changed values reach the gpu.
    pub fn set_opacity(&mut self, queue: &wgpu::Queue, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
        for mesh in &mut self.meshes {
            mesh.set_opacity(queue, self.opacity);
        }
    }

    /// Expects the pipeline and the camera bind group to be set.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if !self.visible {
            return;
        }
        for mesh in &self.meshes {
            mesh.draw(render_pass);
        }
    }
}
