//! Analytic sphere tessellation
//!
//! The sphere is built from latitude rings between two pole vertices. Each
//! pole is closed with a triangle fan and neighbouring rings are stitched with
//! quads, so the result is a closed manifold with counter-clockwise winding
//! when viewed from outside.

use glam::Vec3;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

/// A vertex with position and unit normal
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// An indexed triangle mesh with 16-bit indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterate over the index triples of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Check that the mesh is closed, manifold and consistently wound.
    ///
    /// Every undirected edge must be shared by exactly two triangles, and
    /// every directed edge may appear only once (the two triangles traverse a
    /// shared edge in opposite directions).
    pub fn is_closed_manifold(&self) -> bool {
        if self.indices.len() % 3 != 0 {
            return false;
        }

        let mut directed: HashMap<(u16, u16), u32> = HashMap::new();
        for [a, b, c] in self.triangles() {
            if a == b || b == c || c == a {
                return false;
            }
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_default() += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }
}

/// Number of vertices produced by [`generate_sphere`]
pub fn sphere_vertex_count(theta_segments: u32, phi_segments: u32) -> usize {
    2 + ((theta_segments - 1) * phi_segments) as usize
}

/// Number of indices produced by [`generate_sphere`]
pub fn sphere_index_count(theta_segments: u32, phi_segments: u32) -> usize {
    (phi_segments * 6 + (theta_segments - 2) * phi_segments * 6) as usize
}

/// Tessellate a sphere centered at the origin.
///
/// Vertex order is the south pole, then `theta_segments - 1` rings of
/// `phi_segments` vertices from south to north, then the north pole.
///
/// Callers must pass `theta_segments >= 2` and `phi_segments >= 3`, and the
/// vertex count has to fit in a `u16`. These are trusted startup constants and
/// are only checked in debug builds.
pub fn generate_sphere(radius: f32, theta_segments: u32, phi_segments: u32) -> Mesh {
    debug_assert!(radius > 0.0, "sphere radius must be positive");
    debug_assert!(theta_segments >= 2, "need at least two latitude segments");
    debug_assert!(phi_segments >= 3, "need at least three longitude segments");

    let vertex_count = sphere_vertex_count(theta_segments, phi_segments);
    let index_count = sphere_index_count(theta_segments, phi_segments);
    debug_assert!(
        vertex_count <= usize::from(u16::MAX) + 1,
        "sphere does not fit 16-bit indices"
    );

    let mut vertices = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(index_count);

    let theta_step = PI / theta_segments as f32;
    let phi_step = TAU / phi_segments as f32;

    vertices.push(Vertex::new(Vec3::new(0.0, -radius, 0.0), Vec3::NEG_Y));
    for hi in 1..theta_segments {
        let theta = PI - hi as f32 * theta_step;
        let (sin_t, cos_t) = theta.sin_cos();
        for pi in 0..phi_segments {
            // Longitude runs clockwise seen from +Y; the index order below
            // depends on it for outward-facing triangles.
            let (sin_p, cos_p) = (-(pi as f32) * phi_step).sin_cos();
            let p = Vec3::new(radius * sin_t * cos_p, radius * cos_t, radius * sin_t * sin_p);
            vertices.push(Vertex::new(p, p.normalize()));
        }
    }
    vertices.push(Vertex::new(Vec3::new(0.0, radius, 0.0), Vec3::Y));

    let ring = |band: u32, pi: u32| (1 + band * phi_segments + pi) as u16;
    let next = |pi: u32| if pi + 1 == phi_segments { 0 } else { pi + 1 };

    // South pole fan
    for pi in 0..phi_segments {
        indices.extend_from_slice(&[0, ring(0, next(pi)), ring(0, pi)]);
    }

    // Quad bands between neighbouring rings
    for hi in 0..theta_segments - 2 {
        for pi in 0..phi_segments {
            let v00 = ring(hi, pi);
            let v10 = ring(hi, next(pi));
            let v01 = ring(hi + 1, pi);
            let v11 = ring(hi + 1, next(pi));
            indices.extend_from_slice(&[v00, v10, v01, v11, v01, v10]);
        }
    }

    // North pole fan
    let north = (vertex_count - 1) as u16;
    let last = theta_segments - 2;
    for pi in 0..phi_segments {
        indices.extend_from_slice(&[north, ring(last, pi), ring(last, next(pi))]);
    }

    Mesh { vertices, indices }
}
