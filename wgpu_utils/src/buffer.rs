use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Label and usage of a buffer that is created together with its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferInitDescriptor<'a> {
    /// Debug label of a buffer. This will show up in graphics debuggers for easy identification.
    pub label: wgpu::Label<'a>,
    pub usage: wgpu::BufferUsages,
}

impl<'a> BufferInitDescriptor<'a> {
    pub fn new(label: wgpu::Label<'a>, usage: wgpu::BufferUsages) -> Self {
        Self { label, usage }
    }

    /// A uniform buffer that is rewritten from the cpu every frame.
    pub fn uniform(label: wgpu::Label<'a>) -> Self {
        Self::new(label, wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST)
    }

    pub fn create_new_buffer<T: Pod>(&self, device: &wgpu::Device, data: &[T]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: self.label,
            contents: bytemuck::cast_slice(data),
            usage: self.usage,
        })
    }
}

impl<'a> Default for BufferInitDescriptor<'a> {
    fn default() -> Self {
        Self {
            label: Some("Default BufferInitDescriptor"),
            usage: wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// The kinds of bindings the viewer's shaders use.
/// This shortens the amount of code needed to create a bind group layout and bind group.
#[derive(Clone, Debug)]
pub enum BindingResourceTemplate<'a> {
    BufferUniform(wgpu::BindingResource<'a>),
    TextureView(wgpu::BindingResource<'a>),
    Sampler(wgpu::BindingResource<'a>),
}

impl<'a> BindingResourceTemplate<'a> {
    pub fn resource(&self) -> wgpu::BindingResource<'a> {
        match self {
            BindingResourceTemplate::BufferUniform(resource)
            | BindingResourceTemplate::TextureView(resource)
            | BindingResourceTemplate::Sampler(resource) => resource.clone(),
        }
    }

    fn layout_type(&self) -> wgpu::BindingType {
        match self {
            BindingResourceTemplate::BufferUniform(_) => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingResourceTemplate::TextureView(_) => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            BindingResourceTemplate::Sampler(_) => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
            }
        }
    }
}

impl PartialEq for BindingResourceTemplate<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Describes a bind group by its bindings, numbered in order starting at 0.
///
/// The same descriptor produces the layout (needed for the pipeline) and the
/// bind group itself.
pub struct BindGroupDescriptor<'a> {
    pub label: wgpu::Label<'a>,
    pub vis: wgpu::ShaderStages,
    pub bindings: Vec<BindingResourceTemplate<'a>>,
}

impl<'a> BindGroupDescriptor<'a> {
    pub fn new(label: wgpu::Label<'a>, vis: wgpu::ShaderStages, bindings: Vec<BindingResourceTemplate<'a>>) -> Self {
        Self { label, vis, bindings }
    }

    pub fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| wgpu::BindGroupLayoutEntry {
                binding: index as u32,
                visibility: self.vis,
                ty: binding.layout_type(),
                count: None,
            })
            .collect()
    }

    pub fn generate_bind_group_layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let label = self.label.map(|label| format!("{}_bind_group_layout", label));
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: label.as_deref(),
            entries: &self.layout_entries(),
        })
    }

    /// Creates the bind group for an existing `layout`, e.g. one shared by several objects.
    pub fn generate_bind_group(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        let label = self.label.map(|label| format!("{}_bind_group", label));
        let entries = self
            .bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| wgpu::BindGroupEntry {
                binding: index as u32,
                resource: binding.resource(),
            })
            .collect::<Vec<_>>();

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: label.as_deref(),
            layout,
            entries: &entries,
        })
    }

    /// Creates a fresh layout and a bind group using it.
    pub fn generate(&self, device: &wgpu::Device) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
        let layout = self.generate_bind_group_layout(device);
        let bind_group = self.generate_bind_group(device, &layout);
        (layout, bind_group)
    }
}
