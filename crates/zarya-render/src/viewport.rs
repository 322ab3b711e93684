//! Render target dimensions

/// Size of the color and depth targets in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Viewport after a window resize.
    ///
    /// A minimized window reports a zero extent; the previous size is kept
    /// so the surface is never configured with an empty target.
    #[must_use]
    pub fn resized(self, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            self
        } else {
            Self { width, height }
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn is_same_size(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resized_updates_dimensions() {
        let viewport = Viewport::new(800, 600).resized(1920, 1080);
        assert_eq!(viewport, Viewport::new(1920, 1080));
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimized_keeps_previous_size() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.resized(0, 600), viewport);
        assert_eq!(viewport.resized(800, 0), viewport);
    }

    #[test]
    fn test_new_never_empty() {
        let viewport = Viewport::new(0, 0);
        assert_eq!((viewport.width, viewport.height), (1, 1));
        assert_eq!(viewport.aspect(), 1.0);
    }
}
