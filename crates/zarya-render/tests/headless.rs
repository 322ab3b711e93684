//! Offscreen render of the default scene
//!
//! Needs a GPU adapter; the test passes without checking anything when none
//! is available.

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use zarya_core::config::SceneConfig;
use zarya_render::{RenderError, Viewport, render_headless};

#[test]
fn default_scene_composites_over_background() {
    let scene = SceneConfig::default();
    let image = match render_headless(&scene, Viewport::new(96, 64)) {
        Ok(image) => image,
        Err(RenderError::AdapterUnavailable(e)) => {
            eprintln!("skipping: {e}");
            return;
        }
        Err(e) => panic!("headless render failed: {e}"),
    };

    assert_eq!(image.dimensions(), (96, 64));

    // Corners see only the clear color
    let background = (0.3_f32 * 255.0).round() as i32;
    for [r, g, b, a] in [image.get_pixel(0, 0).0, image.get_pixel(95, 63).0] {
        for c in [r, g, b] {
            assert!((i32::from(c) - background).abs() <= 1, "corner {c}");
        }
        assert_eq!(a, 255);
    }

    // The view axis passes through the lattice before reaching the mesh
    let center = image.get_pixel(48, 32).0;
    assert!(
        center[..3]
            .iter()
            .any(|&c| (i32::from(c) - background).abs() > 1),
        "center pixel {center:?} should not be background"
    );
}
