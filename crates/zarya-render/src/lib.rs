//! Zarya Render - WGPU renderer for the composited scene
//!
//! Draws a tessellated sphere with an indexed draw, then a proxy cube whose
//! fragment stage ray marches a lattice of spheres and writes per-pixel
//! depth. Both share one depth buffer, so the mesh and the lattice occlude
//! each other.
//!
//! ## Features
//!
//! - Interactive preview with a keyboard parameter panel
//! - Orbit and zoom camera controls
//! - Headless rendering to image files
//!
//! ## Example
//!
//! ```rust,ignore
//! use zarya_render::{WindowConfig, window};
//! use zarya_core::config::SceneConfig;
//!
//! window::run_preview(WindowConfig::default(), SceneConfig::default())?;
//! ```

pub mod camera;
pub mod composer;
pub mod context;
pub mod error;
pub mod mesh_pass;
pub mod panel;
pub mod raymarch_pass;
pub mod text_overlay;
pub mod viewport;
pub mod window;

// Re-export wgpu for users who need texture formats, etc.
pub use wgpu;

pub use camera::Camera;
pub use composer::{FrameTarget, SceneComposer};
pub use context::{RendererContext, init_headless, init_with_surface};
pub use error::{RenderError, Result};
pub use mesh_pass::{MESH_SHADER, MeshPass, MeshUniforms};
pub use panel::{ParameterPanel, PanelCommand};
pub use raymarch_pass::{RAYMARCH_SHADER, RaymarchPass, RaymarchUniforms};
pub use text_overlay::{FpsCounter, PreviewOverlay, TextOverlay};
pub use viewport::Viewport;
pub use window::{WindowConfig, controls_help, run_preview};

/// Render the scene offscreen at the given size
pub fn render_headless(
    scene: &zarya_core::config::SceneConfig,
    viewport: Viewport,
) -> Result<image::RgbaImage> {
    let ctx = pollster::block_on(init_headless())?;
    let composer = SceneComposer::new(&ctx, scene)?;
    let camera = Camera::from_config(&scene.camera, viewport.aspect());
    let params = ParameterPanel::new(scene.object).snapshot();
    composer.render_to_image(&ctx, viewport, &camera, params)
}
