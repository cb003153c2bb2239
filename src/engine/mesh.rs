// Procedural mesh types and triangulation.
//
// Two build paths feed the renderer:
//   unit box → catmull_clark ×2 → triangulate_smooth → RenderMesh   (creature joints)
//   Terrain::build_mesh        → triangulate_smooth → RenderMesh    (island sheet)
//
// PolyMesh is the startup-time intermediate; RenderMesh is what reaches wgpu.

use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and normal:
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl GpuVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

// ============================================================================
// POLY MESH
// ============================================================================

/// Intermediate polygon mesh supporting n-gon faces, CCW winding viewed from
/// outside. Only used at startup; per-face heap allocation is acceptable.
pub struct PolyMesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<Vec<usize>>, // each face = CCW-ordered vertex index list
}

impl PolyMesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Axis-aligned box centered on the origin with half-extent 0.5 on each
    /// axis. The shared prototype the joint instances scale onto; a couple of
    /// Catmull-Clark rounds turn it into the rounded "pebble" the creatures
    /// are assembled from.
    pub fn unit_box() -> Self {
        let mut mesh = Self::new();
        let r = 0.5;
        // Vertex layout: front quad 0-3 (+Z), back quad 4-7 (-Z).
        for &(x, y, z) in &[
            (-r, -r, r),
            (r, -r, r),
            (r, r, r),
            (-r, r, r),
            (r, -r, -r),
            (-r, -r, -r),
            (-r, r, -r),
            (r, r, -r),
        ] {
            mesh.add_vertex(Vec3::new(x, y, z));
        }
        // 6 quad faces, CCW from outside.
        mesh.add_face(vec![0, 1, 2, 3]); // front  (+Z)
        mesh.add_face(vec![4, 5, 6, 7]); // back   (-Z)
        mesh.add_face(vec![5, 0, 3, 6]); // left   (-X)
        mesh.add_face(vec![1, 4, 7, 2]); // right  (+X)
        mesh.add_face(vec![3, 2, 7, 6]); // top    (+Y)
        mesh.add_face(vec![5, 4, 1, 0]); // bottom (-Y)
        mesh
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        let idx = self.positions.len();
        self.positions.push(pos);
        idx
    }

    /// Add a face by vertex indices (CCW order).
    pub fn add_face(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3, "face must have at least 3 vertices");
        self.faces.push(indices);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// GPU-ready triangulated mesh with smooth per-vertex normals. Vertices are
/// shared across triangles via the index buffer.
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

// ============================================================================
// TRIANGULATION + SMOOTH NORMALS
// ============================================================================

/// Convert a PolyMesh to a RenderMesh with area-weighted smooth normals.
///
/// The unnormalized cross product of a triangle's edges has magnitude
/// 2 × area, so summing raw cross products per vertex gives area weighting
/// for free; each accumulator is normalized at the end. Faces are then
/// fan-triangulated from vertex 0 into the shared index buffer.
pub fn triangulate_smooth(poly: &PolyMesh) -> RenderMesh {
    let n_verts = poly.vertex_count();
    let mut normal_accum: Vec<Vec3> = vec![Vec3::ZERO; n_verts];

    for face in &poly.faces {
        let n = face.len();
        for i in 1..(n - 1) {
            let a = poly.positions[face[0]];
            let b = poly.positions[face[i]];
            let c = poly.positions[face[i + 1]];
            let weighted = (b - a).cross(c - a);
            normal_accum[face[0]] += weighted;
            normal_accum[face[i]] += weighted;
            normal_accum[face[i + 1]] += weighted;
        }
    }

    let vertices: Vec<GpuVertex> = poly
        .positions
        .iter()
        .zip(normal_accum.iter())
        .map(|(pos, n)| GpuVertex {
            position: pos.to_array(),
            normal: n.normalize_or_zero().to_array(),
        })
        .collect();

    let mut indices: Vec<u32> = Vec::new();
    for face in &poly.faces {
        let n = face.len();
        for i in 1..(n - 1) {
            indices.push(face[0] as u32);
            indices.push(face[i] as u32);
            indices.push(face[i + 1] as u32);
        }
    }

    RenderMesh { vertices, indices }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unit_box_is_closed_and_quad_only() {
        let mesh = PolyMesh::unit_box();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.faces.len(), 6);
        assert!(mesh.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn box_normals_point_outward() {
        let mesh = triangulate_smooth(&PolyMesh::unit_box());
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.index_count(), 6 * 2 * 3);
        for v in &mesh.vertices {
            // At a cube corner the smooth normal is the corner direction.
            let p = Vec3::from_array(v.position).normalize();
            let n = Vec3::from_array(v.normal);
            assert_relative_eq!(p.dot(n), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn triangulation_fans_ngons() {
        let mut poly = PolyMesh::new();
        for &(x, z) in &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.5, 1.5), (0.0, 1.0)] {
            poly.add_vertex(Vec3::new(x, 0.0, z));
        }
        poly.add_face(vec![0, 1, 2, 3, 4]);
        let mesh = triangulate_smooth(&poly);
        // A pentagon fans into 3 triangles.
        assert_eq!(mesh.index_count(), 9);
    }
}
