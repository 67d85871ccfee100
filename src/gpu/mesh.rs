//! Instance mesh: a capped cylinder along +y.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

/// Mesh vertex - matches `VertexInput` in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Cylinder centred on the origin, `height` tall along y, with flat caps.
pub fn cylinder(radius: f32, height: f32, segments: u16) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side: one ring at each end, seam vertex duplicated.
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = [sin, 0.0, cos];
        vertices.push(Vertex { position: [radius * sin, half, radius * cos], normal });
        vertices.push(Vertex { position: [radius * sin, -half, radius * cos], normal });
    }
    for i in 0..segments {
        let top = i * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        indices.extend_from_slice(&[top, bottom, next_top, next_top, bottom, next_bottom]);
    }

    for (y, ny) in [(half, 1.0), (-half, -1.0)] {
        let center = vertices.len() as u16;
        vertices.push(Vertex { position: [0.0, y, 0.0], normal: [0.0, ny, 0.0] });
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            vertices.push(Vertex {
                position: [radius * sin, y, radius * cos],
                normal: [0.0, ny, 0.0],
            });
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments;
            if ny > 0.0 {
                indices.extend_from_slice(&[center, a, b]);
            } else {
                indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_counts() {
        let mesh = cylinder(0.5, 1.0, 8);
        // 18 side + 2 * (1 + 8) cap vertices
        assert_eq!(mesh.vertices.len(), 36);
        // 8 quads on the side + 2 * 8 cap triangles
        assert_eq!(mesh.indices.len(), 8 * 6 + 2 * 8 * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_cylinder_extent() {
        let mesh = cylinder(0.5, 1.0, 8);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            assert!((x * x + z * z).sqrt() <= 0.5 + 1e-6);
            assert!(y.abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_vertex_stride() {
        assert_eq!(Vertex::layout().array_stride, 24);
    }
}
