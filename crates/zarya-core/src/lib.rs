//! # Zarya Core
//!
//! Host-side algorithms for a scene that composites a rasterized sphere mesh
//! with a ray-marched distance field in a single depth buffer.
//!
//! Nothing in this crate touches a graphics device. The renderer mirrors the
//! per-pixel logic of [`raymarch`] in WGSL, and the host versions here are the
//! reference the shaders are tested against.
//!
//! ## Quick Start
//!
//! ```rust
//! use zarya_core::prelude::*;
//!
//! let mesh = generate_sphere(30.0, 16, 32);
//! assert_eq!(mesh.vertex_count(), 482);
//! assert_eq!(mesh.indices.len(), 2880);
//!
//! let ray = Ray::new(Vec3::new(0.0, 0.0, -50.0), Vec3::Z);
//! let interval = bounding_interval(&ray, Vec3::splat(50.0));
//! assert_eq!((interval.tmin, interval.tmax), (0.0, 100.0));
//! ```
//!
//! ## Conventions
//!
//! - **Matrices**: column vectors, `glam` layout. `mvp = projection * view * model`.
//! - **Angles**: the parameter panel works in degrees, everything else in radians.
//! - **Coordinate system**: right-handed, Y-up, counter-clockwise front faces.

pub mod config;
pub mod mesh;
pub mod proxy;
pub mod raymarch;
pub mod sdf;
pub mod transform;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{CameraConfig, SceneConfig, SphereConfig};
    pub use crate::mesh::{Mesh, Vertex, generate_sphere};
    pub use crate::proxy::{PROXY_VERTEX_COUNT, ProxyVertex, proxy_vertex};
    pub use crate::raymarch::{
        DepthConvention, Fragment, Interval, MarchResult, NormalShading, Ray, Sample,
        SampleInput, ShapeParams, SurfaceShading, bounding_interval, march, shade_sample,
    };
    pub use crate::sdf::{Lattice, Sdf, Sphere, sphere_lattice};
    pub use crate::transform::{ObjectTransforms, TransformParams};

    // Math (re-export glam)
    pub use glam::{Mat4, Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
