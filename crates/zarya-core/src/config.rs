//! Scene configuration
//!
//! Scenes can be loaded from a JSON file. Every field is optional and falls
//! back to the defaults below, which reproduce the stock scene: a radius 30
//! sphere next to a lattice of spheres viewed from (150, 150, 150).

// Negated comparisons also reject NaN
#![allow(clippy::neg_cmp_op_on_partial_ord)]

use crate::mesh::sphere_vertex_count;
use crate::transform::TransformParams;
use crate::{Error, Result};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tessellation of the rasterized sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    /// Latitude bands, pole to pole
    pub theta_segments: u32,
    /// Longitude segments around the Y axis
    pub phi_segments: u32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            theta_segments: 16,
            phi_segments: 32,
        }
    }
}

/// Look-at camera with a perspective projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::splat(150.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 60.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }
}

/// Complete description of a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub sphere: SphereConfig,
    pub camera: CameraConfig,
    /// Initial placement of the ray-marched object
    pub object: TransformParams,
    pub clear_color: ClearColor,
}

/// Background color (RGB, 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearColor(pub [f32; 3]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.3, 0.3, 0.3])
    }
}

impl SceneConfig {
    /// Parse and validate a JSON scene description
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a scene description from disk
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Write the scene description as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values the renderer cannot draw.
    ///
    /// The mesh generator trusts its arguments, so file input is checked here
    /// before it reaches it.
    pub fn validate(&self) -> Result<()> {
        let sphere = &self.sphere;
        if !(sphere.radius > 0.0) {
            return Err(Error::Config(format!(
                "sphere radius must be positive, got {}",
                sphere.radius
            )));
        }
        if sphere.theta_segments < 2 {
            return Err(Error::Config(format!(
                "theta_segments must be at least 2, got {}",
                sphere.theta_segments
            )));
        }
        if sphere.phi_segments < 3 {
            return Err(Error::Config(format!(
                "phi_segments must be at least 3, got {}",
                sphere.phi_segments
            )));
        }
        let vertices = u64::from(sphere.theta_segments - 1) * u64::from(sphere.phi_segments) + 2;
        if vertices > u64::from(u16::MAX) + 1 {
            return Err(Error::Config(format!(
                "sphere needs {} vertices, more than 16-bit indices can address",
                vertices
            )));
        }

        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(Error::Config(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(Error::Config(format!(
                "fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if (camera.position - camera.target).length_squared() == 0.0 {
            return Err(Error::Config(
                "camera position and target coincide".to_string(),
            ));
        }
        Ok(())
    }

    /// Vertex count of the configured sphere
    pub fn sphere_vertex_count(&self) -> usize {
        sphere_vertex_count(self.sphere.theta_segments, self.sphere.phi_segments)
    }
}
