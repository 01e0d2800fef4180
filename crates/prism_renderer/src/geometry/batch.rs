/// GPU-resident geometry: a vertex buffer, an optional `u32` index buffer and
/// the number of elements to draw.
///
/// A batch is immutable after creation and owns no textures.
use prism_assets::MeshData;

use crate::geometry::Vertex;
use crate::resources::buffer;

pub struct GeometryBatch {
    pub label: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    /// Vertices (non-indexed) or indices (indexed) per draw.
    element_count: u32,
}

impl GeometryBatch {
    pub fn new<V: bytemuck::Pod>(
        device: &wgpu::Device,
        label: impl Into<String>,
        vertices: &[V],
        indices: Option<&[u32]>,
    ) -> Self {
        let label = label.into();
        let vertex_buffer = buffer::vertices(device, &format!("{label} VB"), vertices);
        let index_buffer = indices.map(|i| buffer::indices(device, &format!("{label} IB"), i));
        let element_count = indices.map_or(vertices.len(), <[u32]>::len) as u32;
        Self {
            label,
            vertex_buffer,
            index_buffer,
            element_count,
        }
    }

    /// Uploads a loaded mesh. The base colour image stays with the caller.
    pub fn from_mesh(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertices: Vec<Vertex> = mesh.vertices.iter().copied().map(Vertex::from).collect();
        Self::new(device, mesh.name.clone(), &vertices, mesh.indices.as_deref())
    }

    /// Triangles drawn per call.
    #[inline]
    pub fn primitive_count(&self) -> u32 {
        self.element_count / 3
    }

    /// Binds the buffers to slot 0 and issues one draw. An empty batch draws
    /// nothing.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.element_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(ib) => {
                pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => pass.draw(0..self.element_count, 0..1),
        }
    }
}
