//! Adjustable object transform and the matrices derived from it

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed translation per axis
pub const TRANSLATION_RANGE: RangeInclusive<f32> = -100.0..=100.0;
/// Allowed rotation per axis, in degrees
pub const ROTATION_RANGE: RangeInclusive<f32> = -180.0..=180.0;
/// Allowed half-extent per axis
pub const SCALE_RANGE: RangeInclusive<f32> = 0.0..=100.0;

/// User-adjustable placement of the ray-marched object.
///
/// `scale` does not enter the model matrix. It is the half-extent of the
/// bounding proxy, so growing it reveals more of the lattice instead of
/// stretching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub translation: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(50.0),
        }
    }
}

impl TransformParams {
    /// Clamp every component to the ranges exposed by the parameter panel
    pub fn clamped(self) -> Self {
        let clamp = |v: Vec3, r: &RangeInclusive<f32>| {
            v.clamp(Vec3::splat(*r.start()), Vec3::splat(*r.end()))
        };
        Self {
            translation: clamp(self.translation, &TRANSLATION_RANGE),
            rotation: clamp(self.rotation, &ROTATION_RANGE),
            scale: clamp(self.scale, &SCALE_RANGE),
        }
    }

    /// Rotation applied about X first, then Y, then Z
    pub fn rotation_matrix(&self) -> Mat4 {
        let r = Vec3::new(
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        );
        Mat4::from_rotation_z(r.z) * Mat4::from_rotation_y(r.y) * Mat4::from_rotation_x(r.x)
    }

    /// Object to world: rotate about the object origin, then translate
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * self.rotation_matrix()
    }
}

/// Matrices needed to draw the proxy for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransforms {
    pub model: Mat4,
    pub inv_model: Mat4,
    pub mvp: Mat4,
}

impl ObjectTransforms {
    /// Derive all matrices from a parameter snapshot and the camera's
    /// `projection * view`.
    pub fn new(params: &TransformParams, view_proj: Mat4) -> Self {
        let model = params.model_matrix();
        Self {
            model,
            inv_model: model.inverse(),
            mvp: view_proj * model,
        }
    }
}
