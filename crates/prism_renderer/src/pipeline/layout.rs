/// Bind-group layouts shared by the four pass pipelines.
///
/// | group | layout              | used by                    |
/// |-------|---------------------|----------------------------|
/// | 0     | `scene`             | every pass                 |
/// | 1     | `composite_inputs`  | composite                  |
/// | 1     | `environment`       | skybox                     |
/// | 2     | `material`          | composite                  |
pub struct PipelineLayouts {
    /// Binding 0: the `Scene` uniform (matrices + camera position).
    pub scene: wgpu::BindGroupLayout,
    /// Front capture, back capture, environment cube, its sampler and the
    /// `Refraction` uniform.
    pub composite_inputs: wgpu::BindGroupLayout,
    /// Environment cube and sampler.
    pub environment: wgpu::BindGroupLayout,
    /// Base colour texture and sampler.
    pub material: wgpu::BindGroupLayout,
}

fn uniform(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture(binding: u32, view_dimension: wgpu::TextureViewDimension, filterable: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        use wgpu::TextureViewDimension::{Cube, D2};

        let layout = |label: &str, entries: &[wgpu::BindGroupLayoutEntry]| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries,
            })
        };

        Self {
            scene: layout(
                "Layout: Scene",
                &[uniform(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT)],
            ),
            // captures are read with textureLoad, never filtered
            composite_inputs: layout(
                "Layout: Composite Inputs",
                &[
                    texture(0, D2, false),
                    texture(1, D2, false),
                    texture(2, Cube, true),
                    sampler(3),
                    uniform(4, wgpu::ShaderStages::FRAGMENT),
                ],
            ),
            environment: layout("Layout: Environment", &[texture(0, Cube, true), sampler(1)]),
            material: layout("Layout: Material", &[texture(0, D2, true), sampler(1)]),
        }
    }
}
