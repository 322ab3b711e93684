//! Window management with winit for the interactive preview

// Raw strings are clearer without unnecessary hashes
#![allow(clippy::needless_raw_string_hashes)]

use crate::camera::Camera;
use crate::composer::{FrameTarget, SceneComposer};
use crate::context::{RendererContext, init_with_surface};
use crate::panel::{ParameterPanel, command_for_key};
use crate::text_overlay::PreviewOverlay;
use crate::viewport::Viewport;
use anyhow::Context as _;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};
use zarya_core::config::SceneConfig;

/// Configuration for the preview window
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Zarya Preview".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Default)]
struct InputState {
    mouse_left: bool,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    shift_held: bool,
}

/// Everything that exists only once the window has a surface
struct GpuState {
    ctx: RendererContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    composer: SceneComposer,
    overlay: PreviewOverlay,
}

struct PreviewApp {
    config: WindowConfig,
    scene: SceneConfig,
    instance: wgpu::Instance,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    camera: Camera,
    panel: ParameterPanel,
    viewport: Viewport,
    input: InputState,
    /// Fatal setup error, returned once the event loop exits
    error: Option<anyhow::Error>,
}

impl PreviewApp {
    fn new(config: WindowConfig, scene: SceneConfig) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let viewport = Viewport::new(config.width, config.height);

        Self {
            camera: Camera::from_config(&scene.camera, viewport.aspect()),
            panel: ParameterPanel::new(scene.object),
            config,
            scene,
            instance,
            window: None,
            gpu: None,
            viewport,
            input: InputState::default(),
            error: None,
        }
    }

    fn init_gpu(&mut self, window: &Arc<Window>) -> anyhow::Result<GpuState> {
        let surface = self
            .instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let ctx = pollster::block_on(init_with_surface(&self.instance, &surface))?;

        self.viewport = Viewport::from(window.inner_size());
        self.camera.aspect = self.viewport.aspect();

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: ctx.format,
            width: self.viewport.width,
            height: self.viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &surface_config);

        let composer = SceneComposer::new(&ctx, &self.scene)?;
        let overlay = PreviewOverlay::new(&ctx.device, &ctx.queue, ctx.format);
        let depth_view = ctx.create_depth_texture(self.viewport.width, self.viewport.height);

        tracing::info!(
            "Preview ready: {}x{} {:?}",
            self.viewport.width,
            self.viewport.height,
            ctx.format
        );

        Ok(GpuState {
            ctx,
            surface,
            surface_config,
            depth_view,
            composer,
            overlay,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.viewport = self.viewport.resized(new_size.width, new_size.height);
        self.camera.aspect = self.viewport.aspect();

        if let Some(gpu) = &mut self.gpu {
            let config = &gpu.surface_config;
            if self.viewport.is_same_size(config.width, config.height) {
                return;
            }
            gpu.surface_config.width = self.viewport.width;
            gpu.surface_config.height = self.viewport.height;
            gpu.surface.configure(&gpu.ctx.device, &gpu.surface_config);
            gpu.depth_view = gpu
                .ctx
                .create_depth_texture(self.viewport.width, self.viewport.height);
        }
    }

    fn handle_mouse_motion(&mut self, position: PhysicalPosition<f64>) {
        if let Some(last_pos) = self.input.last_mouse_pos {
            if self.input.mouse_left {
                let dx = (position.x - last_pos.x) as f32 * 0.005;
                let dy = (position.y - last_pos.y) as f32 * 0.005;
                self.camera.orbit(dx, dy);
            }
        }
        self.input.last_mouse_pos = Some(position);
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
        };
        self.camera.zoom(scroll * 10.0);
    }

    fn render(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.ctx.device, &gpu.surface_config);
                return;
            }
            Err(e) => {
                tracing::warn!("Skipping frame: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Preview Encoder"),
            });

        gpu.composer.encode_frame(
            &gpu.ctx,
            &mut encoder,
            FrameTarget {
                color: &view,
                depth: &gpu.depth_view,
            },
            &self.camera,
            self.panel.snapshot(),
        );

        gpu.overlay.tick(&self.panel);
        gpu.overlay.render(
            &gpu.ctx.device,
            &gpu.ctx.queue,
            &mut encoder,
            &view,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        gpu.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                self.error = Some(anyhow::anyhow!("Failed to create window: {e}"));
                event_loop.exit();
                return;
            }
        };

        match self.init_gpu(&window) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("Failed to initialize renderer: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.input.mouse_left = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_mouse_motion(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.handle_scroll(delta);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.shift_held = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => event_loop.exit(),
                    Key::Named(NamedKey::Home) => self.camera.reset(),
                    ref key => {
                        if let Some(command) = command_for_key(key, self.input.shift_held) {
                            self.panel.apply(command);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the preview window and run until it is closed
pub fn run_preview(config: WindowConfig, scene: SceneConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PreviewApp::new(config, scene);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Preview controls help text
pub fn controls_help() -> &'static str {
    r#"
Preview Controls:
  T / R / S         - Select translation, rotation or scale
  X / Y / Z         - Select axis
  Up / Down, + / -  - Adjust selected value by 0.1
  Shift + adjust    - Adjust x10
  Backspace         - Reset selected group
  Left Mouse Drag   - Orbit camera around target
  Scroll Wheel      - Zoom camera
  Home              - Reset camera
  Escape            - Close preview
"#
}
