/// Per-frame scene uniform and its GPU buffer.
///
/// `GpuScene` owns the buffer bound at group(0) by every pass. The renderer
/// syncs it from the [`FramePacket`] once per frame, before any pass records.
use std::sync::Arc;

use glam::Mat4;

use crate::graph::FramePacket;
use crate::resources::buffer;

/// std140 image of `Scene` in the WGSL sources.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Projection times the translation-free view.
    pub sky_view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// World-space camera position, `w` unused.
    pub camera_pos: [f32; 4],
}

impl SceneUniform {
    pub fn from_packet(packet: &FramePacket) -> Self {
        Self {
            view_proj: packet.view_proj().to_cols_array_2d(),
            sky_view_proj: packet.sky_view_proj().to_cols_array_2d(),
            model: packet.model.to_cols_array_2d(),
            normal_matrix: packet.normal_matrix().to_cols_array_2d(),
            camera_pos: packet.camera_position.extend(1.0).to_array(),
        }
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            sky_view_proj: identity,
            model: identity,
            normal_matrix: identity,
            camera_pos: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub struct GpuScene {
    pub uniform: SceneUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: Arc<wgpu::BindGroup>,
}

impl GpuScene {
    /// `layout` must be [`PipelineLayouts::scene`](crate::pipeline::PipelineLayouts).
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let uniform = SceneUniform::default();
        let buffer = buffer::uniform(device, "Scene Uniform Buffer", &uniform);
        let bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        }));
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    pub fn sync(&mut self, queue: &wgpu::Queue, packet: &FramePacket) {
        self.uniform = SceneUniform::from_packet(packet);
        buffer::write_uniform(queue, &self.buffer, &self.uniform);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;

    #[test]
    fn layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 4 * 64 + 16);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let packet = FramePacket {
            model: Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)),
            camera_position: Vec3::new(1.0, 2.0, 3.0),
            ..Default::default()
        };
        let u = SceneUniform::from_packet(&packet);
        assert_eq!(u.normal_matrix[0][0], 0.5);
        assert_eq!(u.camera_pos, [1.0, 2.0, 3.0, 1.0]);
    }
}
