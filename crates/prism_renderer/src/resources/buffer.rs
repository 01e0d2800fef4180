/// Buffer creation helpers.
///
/// Every buffer the renderer owns is created initialised, so these wrap
/// `create_buffer_init` with the usage flags each role needs.
use wgpu::util::DeviceExt;

fn init(device: &wgpu::Device, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage,
    })
}

/// Uniform buffer holding one `T`, rewritable every frame.
pub fn uniform<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &T) -> wgpu::Buffer {
    init(
        device,
        label,
        bytemuck::bytes_of(data),
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    )
}

pub fn vertices<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> wgpu::Buffer {
    init(device, label, bytemuck::cast_slice(data), wgpu::BufferUsages::VERTEX)
}

pub fn indices(device: &wgpu::Device, label: &str, data: &[u32]) -> wgpu::Buffer {
    init(device, label, bytemuck::cast_slice(data), wgpu::BufferUsages::INDEX)
}

/// Overwrites a buffer created by [`uniform`].
#[inline]
pub fn write_uniform<T: bytemuck::Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, data: &T) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(data));
}
