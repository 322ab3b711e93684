//! Bounding proxy cube for the ray-marched object
//!
//! The proxy is drawn without a vertex buffer. Each of its 36 vertex
//! invocations looks up its corner through [`CUBE_INDICES`] and its face
//! normal by `vertex_index / 6`. The raymarch vertex shader carries the same
//! three tables.

use glam::Vec3;

/// Number of vertices drawn for the proxy (12 triangles)
pub const PROXY_VERTEX_COUNT: u32 = 36;

/// Corners of the unit cube `[-1, 1]^3`
pub const CUBE_POSITIONS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
];

/// Outward normal of each face, in draw order
pub const CUBE_NORMALS: [Vec3; 6] = [
    Vec3::Z,
    Vec3::X,
    Vec3::NEG_Z,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
];

/// Two counter-clockwise triangles per face, faces ordered as [`CUBE_NORMALS`]
pub const CUBE_INDICES: [u32; 36] = [
    0, 5, 4, 0, 1, 5, // +Z
    1, 6, 5, 1, 2, 6, // +X
    2, 7, 6, 2, 3, 7, // -Z
    3, 4, 7, 3, 0, 4, // -X
    4, 6, 7, 4, 5, 6, // +Y
    3, 1, 0, 3, 2, 1, // -Y
];

/// Object-space attributes of one proxy vertex invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Resolve vertex invocation `vertex_index` (0..36) of a proxy with the given
/// half-extents.
pub fn proxy_vertex(vertex_index: u32, scale: Vec3) -> ProxyVertex {
    let corner = CUBE_INDICES[vertex_index as usize] as usize;
    ProxyVertex {
        position: scale * CUBE_POSITIONS[corner],
        normal: CUBE_NORMALS[(vertex_index / 6) as usize],
    }
}

/// Iterate over all proxy vertex invocations in draw order
pub fn proxy_vertices(scale: Vec3) -> impl Iterator<Item = ProxyVertex> {
    (0..PROXY_VERTEX_COUNT).map(move |i| proxy_vertex(i, scale))
}

/// Outward normal of the proxy face that `point` lies on (or is closest to),
/// for a proxy with the given half-extents.
pub fn face_normal_at(point: Vec3, scale: Vec3) -> Vec3 {
    let rel = (point / scale).abs();
    let face = if rel.x >= rel.y && rel.x >= rel.z {
        Vec3::X * point.x.signum()
    } else if rel.y >= rel.z {
        Vec3::Y * point.y.signum()
    } else {
        Vec3::Z * point.z.signum()
    };
    CUBE_NORMALS
        .iter()
        .copied()
        .find(|n| *n == face)
        .unwrap_or(Vec3::Y)
}
