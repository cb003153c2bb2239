// Catmull-Clark subdivision. Rounds the unit box into the pebble the
// creature joints are instanced from; two levels is enough to read as an
// organic lump at island viewing distance.
//
// Each application replaces every n-gon with n quads, so the output is
// all-quad regardless of input. Closed all-quad vertex count: V + E + F
// (cube: 8 → 26 → 98).

use std::collections::HashMap;

use glam::Vec3;

use super::mesh::PolyMesh;

// ============================================================================
// EDGE UTILITIES
// ============================================================================

/// Canonical key for an undirected edge: always (min, max), so (a,b) and
/// (b,a) map to the same entry.
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Per-edge data accumulated during one subdivision pass.
struct EdgeEntry {
    /// 1 adjacent face for boundary edges, 2 for interior.
    adjacent_faces: Vec<usize>,
    /// Index of this edge's edge-point in the output mesh.
    new_idx: usize,
}

type EdgeMap = HashMap<(usize, usize), EdgeEntry>;

// ============================================================================
// SUBDIVISION
// ============================================================================

/// Apply one level of Catmull-Clark to a PolyMesh. CCW winding is preserved.
pub fn catmull_clark(mesh: &PolyMesh) -> PolyMesh {
    let n_verts = mesh.vertex_count();

    // Adjacency: faces and edges incident to each vertex, faces per edge.
    let mut vertex_faces: Vec<Vec<usize>> = vec![vec![]; n_verts];
    let mut vertex_edges: Vec<Vec<(usize, usize)>> = vec![vec![]; n_verts];
    let mut edge_map: EdgeMap = HashMap::new();

    for (fi, face) in mesh.faces.iter().enumerate() {
        let n = face.len();
        for (i, &vi) in face.iter().enumerate() {
            vertex_faces[vi].push(fi);

            let vj = face[(i + 1) % n];
            let key = edge_key(vi, vj);
            let entry = edge_map.entry(key).or_insert_with(|| EdgeEntry {
                adjacent_faces: Vec::new(),
                new_idx: 0,
            });
            if !entry.adjacent_faces.contains(&fi) {
                entry.adjacent_faces.push(fi);
            }

            if !vertex_edges[vi].contains(&key) {
                vertex_edges[vi].push(key);
            }
            if !vertex_edges[vj].contains(&key) {
                vertex_edges[vj].push(key);
            }
        }
    }

    let face_centroids: Vec<Vec3> = mesh
        .faces
        .iter()
        .map(|face| {
            let sum: Vec3 = face.iter().map(|&vi| mesh.positions[vi]).sum();
            sum / face.len() as f32
        })
        .collect();

    let mut out = PolyMesh::new();

    // Edge points: average of endpoints and the two adjacent face centroids
    // (plain midpoint on a boundary edge — the terrain sheet has those).
    for ((a, b), entry) in edge_map.iter_mut() {
        let pa = mesh.positions[*a];
        let pb = mesh.positions[*b];
        let ep = if entry.adjacent_faces.len() == 2 {
            (pa + pb
                + face_centroids[entry.adjacent_faces[0]]
                + face_centroids[entry.adjacent_faces[1]])
                / 4.0
        } else {
            (pa + pb) / 2.0
        };
        entry.new_idx = out.add_vertex(ep);
    }

    // Updated original vertices (interior vertex, valence n):
    //   F = average adjacent face centroid, R = average adjacent edge midpoint
    //   V' = (F + 2R + (n-3)·V) / n
    let mut new_v_idx: Vec<usize> = vec![0; n_verts];
    for v in 0..n_verts {
        let adj_faces = &vertex_faces[v];
        let n = adj_faces.len() as f32;

        let f: Vec3 = adj_faces.iter().map(|&fi| face_centroids[fi]).sum::<Vec3>() / n;
        let r: Vec3 = vertex_edges[v]
            .iter()
            .map(|&(a, b)| (mesh.positions[a] + mesh.positions[b]) / 2.0)
            .sum::<Vec3>()
            / n;

        let new_pos = (f + 2.0 * r + (n - 3.0) * mesh.positions[v]) / n;
        new_v_idx[v] = out.add_vertex(new_pos);
    }

    // Face points.
    let face_point_idx: Vec<usize> = face_centroids.iter().map(|&c| out.add_vertex(c)).collect();

    // Reconnect: each old n-gon becomes n quads
    //   [V'ᵢ, edge-point(i→i+1), face-point, edge-point(i-1→i)]
    // which walks vertex → next edge → center → previous edge, keeping CCW.
    for (fi, face) in mesh.faces.iter().enumerate() {
        let n = face.len();
        for i in 0..n {
            let vi_curr = face[i];
            let vi_next = face[(i + 1) % n];
            let vi_prev = face[(i + n - 1) % n];

            let ep_next = edge_map[&edge_key(vi_curr, vi_next)].new_idx;
            let ep_prev = edge_map[&edge_key(vi_prev, vi_curr)].new_idx;

            out.add_face(vec![new_v_idx[vi_curr], ep_next, face_point_idx[fi], ep_prev]);
        }
    }

    out
}

/// Apply Catmull-Clark `levels` times. `levels = 0` clones the input.
pub fn subdivide(mesh: &PolyMesh, levels: u32) -> PolyMesh {
    let mut current = PolyMesh {
        positions: mesh.positions.clone(),
        faces: mesh.faces.clone(),
    };
    for _ in 0..levels {
        current = catmull_clark(&current);
    }
    current
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_counts_follow_the_closed_mesh_formula() {
        let cube = PolyMesh::unit_box();
        let l1 = catmull_clark(&cube);
        assert_eq!(l1.vertex_count(), 26);
        assert_eq!(l1.faces.len(), 24);

        let l2 = catmull_clark(&l1);
        assert_eq!(l2.vertex_count(), 98);
        assert_eq!(l2.faces.len(), 96);
        assert!(l2.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn zero_levels_is_a_clone() {
        let cube = PolyMesh::unit_box();
        let same = subdivide(&cube, 0);
        assert_eq!(same.positions, cube.positions);
        assert_eq!(same.faces, cube.faces);
    }

    #[test]
    fn subdivision_shrinks_toward_the_inscribed_sphere() {
        let pebble = subdivide(&PolyMesh::unit_box(), 2);
        // Every position pulls inside the original half-extent but stays
        // well clear of the center.
        for p in &pebble.positions {
            let len = p.length();
            assert!(len < 0.87, "corner distance shrinks: {len}");
            assert!(len > 0.3);
        }
    }
}
