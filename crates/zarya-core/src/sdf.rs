//! Signed distance functions for the implicit object
//!
//! SDFs represent shapes as functions that return the distance from any point
//! to the nearest surface. Negative values are inside, positive values are
//! outside, and zero is exactly on the surface.

use glam::Vec3;

/// Cell size of the default lattice
pub const LATTICE_PERIOD: f32 = 10.0;

/// Radius of the sphere placed in every lattice cell
pub const LATTICE_SPHERE_RADIUS: f32 = 3.0;

/// Any type that can compute the signed distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    fn distance(&self, p: Vec3) -> f32;
}

impl<S: Sdf + ?Sized> Sdf for &S {
    fn distance(&self, p: Vec3) -> f32 {
        (**self).distance(p)
    }
}

/// Sphere centered at origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }
}

/// Infinite repetition of a shape on a cubic lattice.
///
/// Points are folded with a floored modulo, so the copy of `inner` lives at
/// the center of each `period`-sized cell: `(k + 0.5) * period` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice<S> {
    pub inner: S,
    pub period: f32,
}

impl<S: Sdf> Lattice<S> {
    pub fn new(inner: S, period: f32) -> Self {
        Self { inner, period }
    }

    /// Fold a point into the local frame of its cell
    pub fn fold(&self, p: Vec3) -> Vec3 {
        p.rem_euclid(Vec3::splat(self.period)) - Vec3::splat(self.period * 0.5)
    }

    /// Center of the cell containing `p`
    pub fn cell_center(&self, p: Vec3) -> Vec3 {
        p - self.fold(p)
    }
}

impl<S: Sdf> Sdf for Lattice<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(self.fold(p))
    }
}

/// The distance field drawn inside the bounding proxy: spheres of radius 3
/// repeated every 10 units.
pub fn sphere_lattice() -> Lattice<Sphere> {
    Lattice::new(Sphere::new(LATTICE_SPHERE_RADIUS), LATTICE_PERIOD)
}
