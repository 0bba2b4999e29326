//! Unit plane shared by every image mesh.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct PlaneVertex {
    pub pos: [f32; 2], // -0.5..0.5
    pub uv: [f32; 2],
}

impl PlaneVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// Texture row 0 is the top of the image.
pub(super) const PLANE_VERTICES: [PlaneVertex; 4] = [
    PlaneVertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
    PlaneVertex { pos: [0.5, -0.5], uv: [1.0, 1.0] },
    PlaneVertex { pos: [0.5, 0.5], uv: [1.0, 0.0] },
    PlaneVertex { pos: [-0.5, 0.5], uv: [0.0, 0.0] },
];

pub(super) const PLANE_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex and index buffers for the unit plane.
pub(super) struct PlaneGeometry {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
}

impl PlaneGeometry {
    pub(super) const INDEX_COUNT: u32 = PLANE_INDICES.len() as u32;

    pub(super) fn new(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ripple plane vbo"),
            contents: bytemuck::cast_slice(&PLANE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ripple plane ibo"),
            contents: bytemuck::cast_slice(&PLANE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vbo, ibo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_is_unit_sized_and_centered() {
        let xs: Vec<f32> = PLANE_VERTICES.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = PLANE_VERTICES.iter().map(|v| v.pos[1]).collect();
        assert_eq!(xs.iter().sum::<f32>(), 0.0);
        assert_eq!(ys.iter().sum::<f32>(), 0.0);
        assert!(PLANE_VERTICES.iter().all(|v| v.pos[0].abs() == 0.5 && v.pos[1].abs() == 0.5));
    }

    #[test]
    fn top_edge_samples_first_texture_row() {
        for v in PLANE_VERTICES {
            let expected_v = if v.pos[1] > 0.0 { 0.0 } else { 1.0 };
            assert_eq!(v.uv[1], expected_v);
        }
    }

    #[test]
    fn indices_are_counter_clockwise() {
        let tri = |a: usize, b: usize, c: usize| {
            let (p, q, r) = (PLANE_VERTICES[a].pos, PLANE_VERTICES[b].pos, PLANE_VERTICES[c].pos);
            (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])
        };
        for t in PLANE_INDICES.chunks(3) {
            assert!(tri(t[0] as usize, t[1] as usize, t[2] as usize) > 0.0);
        }
    }
}
