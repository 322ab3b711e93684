//! Per-sample ray marching through the bounding proxy
//!
//! This is the host-side twin of `fs_raymarch` in the renderer's
//! `raymarch.wgsl`. One call corresponds to one fragment covered by the proxy
//! cube: the world-space camera ray is moved into object space, clipped
//! against the proxy box, sphere traced through the distance field, and on a
//! hit shaded and reprojected to a depth value that composites against the
//! rasterized mesh.
//!
//! Everything here is a pure function of its inputs.

use crate::sdf::Sdf;
use glam::{Mat4, Vec3};

/// Maximum number of sphere tracing steps per sample
pub const MAX_STEPS: u32 = 32;

/// Distance below which a step counts as a surface hit
pub const HIT_THRESHOLD: f32 = 0.01;

/// Offset used for central-difference normals
pub const NORMAL_EPSILON: f32 = 0.01;

/// A ray with unit-length direction. Which space it lives in depends on
/// context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` through `target`
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Object-space half-extents of the implicit object's bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub half_extents: Vec3,
}

impl ShapeParams {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

/// Parametric interval of a ray inside the proxy box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub tmin: f32,
    pub tmax: f32,
}

impl Interval {
    /// True when the ray misses the box or the box lies behind the origin
    pub fn is_empty(&self) -> bool {
        self.tmin > self.tmax
    }
}

/// Outcome of sphere tracing a single ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    pub hit: bool,
    /// Distance along the ray, meaningful only on a hit
    pub t: f32,
    /// Object-space hit point
    pub position: Vec3,
    /// Object-space unit normal, filled in by [`shade_sample`]
    pub normal: Vec3,
    /// Number of distance evaluations performed
    pub steps: u32,
}

impl MarchResult {
    fn miss(steps: u32) -> Self {
        Self {
            hit: false,
            t: 0.0,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            steps,
        }
    }
}

/// How a projection maps view depth into normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthConvention {
    /// OpenGL style clip space, NDC z in [-1, 1]
    NegativeOneToOne,
    /// wgpu / Vulkan / D3D style clip space, NDC z in [0, 1]
    #[default]
    ZeroToOne,
}

impl DepthConvention {
    /// Map NDC depth to the [0, 1] range written to the depth buffer
    pub fn remap(self, ndc_z: f32) -> f32 {
        match self {
            Self::NegativeOneToOne => ndc_z * 0.5 + 0.5,
            Self::ZeroToOne => ndc_z,
        }
    }
}

/// Color strategy applied to a hit
pub trait SurfaceShading {
    /// Shade a world-space point with a world-space unit normal
    fn shade(&self, position: Vec3, normal: Vec3) -> Vec3;
}

/// Visualizes the normal as an RGB color
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalShading;

impl SurfaceShading for NormalShading {
    fn shade(&self, _position: Vec3, normal: Vec3) -> Vec3 {
        normal * 0.5 + 0.5
    }
}

/// Everything one proxy fragment knows
#[derive(Debug, Clone, Copy)]
pub struct SampleInput {
    /// World-space ray from the camera through the proxy surface point
    pub ray: Ray,
    /// World-space normal of the proxy face being rasterized
    pub face_normal: Vec3,
    pub model: Mat4,
    pub inv_model: Mat4,
    pub mvp: Mat4,
    pub shape: ShapeParams,
    pub depth: DepthConvention,
}

/// Color and depth written for a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub color: Vec3,
    pub depth: f32,
    pub march: MarchResult,
}

/// Result of one proxy fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Nothing is written for this fragment
    Miss,
    Hit(Fragment),
}

impl Sample {
    pub fn fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Miss => None,
            Self::Hit(fragment) => Some(fragment),
        }
    }
}

/// Move a world-space ray into the object's local frame.
///
/// The direction is renormalized because the inverse model matrix may scale.
pub fn object_space_ray(ray: &Ray, inv_model: &Mat4) -> Ray {
    Ray::new(
        inv_model.transform_point3(ray.origin),
        inv_model.transform_vector3(ray.direction).normalize(),
    )
}

/// Slab test of a ray against the box `[-half_extents, half_extents]`.
///
/// The interval starts as `[0, inf)`, so it never reaches behind the origin. A
/// zero direction component divides to a signed infinity, which the min/max
/// chain absorbs.
pub fn bounding_interval(ray: &Ray, half_extents: Vec3) -> Interval {
    let mut tmin = 0.0_f32;
    let mut tmax = f32::INFINITY;
    for axis in 0..3 {
        let t1 = (half_extents[axis] - ray.origin[axis]) / ray.direction[axis];
        let t2 = (-half_extents[axis] - ray.origin[axis]) / ray.direction[axis];
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }
    Interval { tmin, tmax }
}

/// Sphere trace `sdf` along an object-space ray within `interval`.
///
/// Steps never move backwards: a negative distance (starting inside the
/// surface) counts as a zero step and an immediate hit.
pub fn march<S: Sdf + ?Sized>(sdf: &S, ray: &Ray, interval: Interval) -> MarchResult {
    if interval.is_empty() {
        return MarchResult::miss(0);
    }

    let mut t = interval.tmin;
    let mut p = ray.at(t);
    for step in 1..=MAX_STEPS {
        let d = sdf.distance(p).max(0.0);
        t += d;
        if t > interval.tmax {
            return MarchResult::miss(step);
        }
        p += ray.direction * d;
        if d < HIT_THRESHOLD {
            return MarchResult {
                hit: true,
                t,
                position: ray.at(t),
                normal: Vec3::ZERO,
                steps: step,
            };
        }
    }
    MarchResult::miss(MAX_STEPS)
}

/// Normalized central-difference gradient of `sdf` at `p`
pub fn estimate_normal<S: Sdf + ?Sized>(sdf: &S, p: Vec3) -> Vec3 {
    let e = NORMAL_EPSILON;
    Vec3::new(
        sdf.distance(p + Vec3::X * e) - sdf.distance(p - Vec3::X * e),
        sdf.distance(p + Vec3::Y * e) - sdf.distance(p - Vec3::Y * e),
        sdf.distance(p + Vec3::Z * e) - sdf.distance(p - Vec3::Z * e),
    )
    .normalize()
}

/// Project an object-space point and return the value for the depth buffer
pub fn reproject_depth(position: Vec3, mvp: &Mat4, convention: DepthConvention) -> f32 {
    let clip = *mvp * position.extend(1.0);
    convention.remap(clip.z / clip.w)
}

/// Run the full per-fragment procedure.
///
/// When the hit lands exactly on the entry point of the box the surface is
/// cut by a proxy face, and the analytic face normal replaces the numerical
/// gradient.
pub fn shade_sample<S, C>(sdf: &S, shading: &C, input: &SampleInput) -> Sample
where
    S: Sdf + ?Sized,
    C: SurfaceShading + ?Sized,
{
    let ray = object_space_ray(&input.ray, &input.inv_model);
    let interval = bounding_interval(&ray, input.shape.half_extents);
    let mut result = march(sdf, &ray, interval);
    if !result.hit {
        return Sample::Miss;
    }

    let world_normal = if result.t == interval.tmin {
        result.normal = input
            .inv_model
            .transform_vector3(input.face_normal)
            .normalize();
        input.face_normal.normalize()
    } else {
        result.normal = estimate_normal(sdf, result.position);
        input.model.transform_vector3(result.normal)
    };

    let color = shading.shade(input.model.transform_point3(result.position), world_normal);
    let depth = reproject_depth(result.position, &input.mvp, input.depth);

    Sample::Hit(Fragment {
        color,
        depth,
        march: result,
    })
}
