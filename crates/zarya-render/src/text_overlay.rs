//! Text overlay rendering using glyphon
//!
//! Draws the frame rate and the parameter panel readout on top of the scene.

// u32 to i32 cast is safe for reasonable screen sizes
#![allow(clippy::cast_possible_wrap)]

use crate::panel::ParameterPanel;
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Shaping, SwashCache, TextArea,
    TextAtlas, TextBounds, TextRenderer, Viewport,
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub(crate) const KEY_HINT: &str = "T/R/S group  X/Y/Z axis  Up/Down adjust (Shift x10)  Backspace reset";

/// Frame rate over a sliding one-second window
pub struct FpsCounter {
    frame_times: VecDeque<Instant>,
    last_frame: Instant,
    frame_time_ms: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            last_frame: Instant::now(),
            frame_time_ms: 0.0,
        }
    }

    /// Record a frame finished now
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frame_time_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.frame_times.push_back(now);

        while let Some(front) = self.frame_times.front() {
            if now.duration_since(*front) > Duration::from_secs(1) {
                self.frame_times.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn fps(&self) -> f32 {
        self.frame_times.len() as f32
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    pub fn display_string(&self) -> String {
        format!("{:.0} FPS ({:.1}ms)", self.fps(), self.frame_time_ms)
    }
}

/// Monospace text block in the top-left corner
pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    text_renderer: TextRenderer,
    buffer: Buffer,
    viewport: Viewport,
}

impl TextOverlay {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let text_renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        let viewport = Viewport::new(device, &cache);

        let mut buffer = Buffer::new(&mut font_system, Metrics::new(16.0, 20.0));
        buffer.set_size(&mut font_system, Some(720.0), Some(140.0));

        Self {
            font_system,
            swash_cache,
            atlas,
            text_renderer,
            buffer,
            viewport,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(
            &mut self.font_system,
            text,
            &Attrs::new().family(Family::Monospace),
            Shaping::Advanced,
        );
    }

    /// Draw over `view` without clearing it. A glyph failure skips the
    /// overlay for this frame.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) {
        self.buffer.shape_until_scroll(&mut self.font_system, false);
        self.viewport
            .update(queue, glyphon::Resolution { width, height });

        let text_areas = [TextArea {
            buffer: &self.buffer,
            left: 10.0,
            top: 10.0,
            scale: 1.0,
            bounds: TextBounds {
                left: 0,
                top: 0,
                right: width as i32,
                bottom: height as i32,
            },
            default_color: Color::rgb(255, 255, 255),
            custom_glyphs: &[],
        }];

        if let Err(e) = self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        ) {
            tracing::warn!("Skipping overlay: {}", e);
            return;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Text Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Err(e) = self
                .text_renderer
                .render(&self.atlas, &self.viewport, &mut pass)
            {
                tracing::warn!("Overlay render failed: {}", e);
            }
        }

        self.atlas.trim();
    }
}

/// Frame rate and panel readout shown in the preview window
pub struct PreviewOverlay {
    counter: FpsCounter,
    overlay: TextOverlay,
    last_report: Instant,
}

impl PreviewOverlay {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            counter: FpsCounter::new(),
            overlay: TextOverlay::new(device, queue, format),
            last_report: Instant::now(),
        }
    }

    /// Call once per frame, before [`Self::render`]
    pub fn tick(&mut self, panel: &ParameterPanel) {
        self.counter.tick();
        if self.last_report.elapsed() >= Duration::from_secs(1) {
            tracing::debug!("{}", self.counter.display_string());
            self.last_report = Instant::now();
        }
        let text = format!(
            "{}\n{}{}",
            self.counter.display_string(),
            panel.readout(),
            KEY_HINT
        );
        self.overlay.set_text(&text);
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) {
        self.overlay
            .render(device, queue, encoder, view, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_counts_last_second() {
        let mut counter = FpsCounter::new();
        let start = Instant::now();
        for i in 0..30 {
            counter.tick_at(start + Duration::from_millis(i * 50));
        }
        // frames at 0..=1450ms; only those within 1s of the last one remain
        assert_eq!(counter.fps(), 21.0);
        assert!((counter.frame_time_ms() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_display_string() {
        let mut counter = FpsCounter::new();
        let start = Instant::now();
        counter.tick_at(start + Duration::from_millis(16));
        counter.tick_at(start + Duration::from_millis(32));
        assert_eq!(counter.display_string(), "2 FPS (16.0ms)");
    }
}
