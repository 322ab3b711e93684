//! GPU device, queue and target format shared by every pass

// Default trait access is consistent with wgpu patterns
#![allow(clippy::default_trait_access)]

use crate::error::{RenderError, Result};
use std::sync::Arc;

/// Depth buffer format used by both passes
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color format of offscreen renders
pub const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Everything a pass needs to create and submit GPU work.
///
/// Built once by the window or headless driver and passed by reference.
#[derive(Debug, Clone)]
pub struct RendererContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    /// Format of the color target the pipelines render into
    pub format: wgpu::TextureFormat,
}

impl RendererContext {
    /// Compile a WGSL module, turning validation failures into an error that
    /// carries the diagnostic and the source.
    pub fn compile_shader(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        self.pop_program_error(label, source)?;
        Ok(module)
    }

    /// Link a render pipeline. Entry point and interface mismatches surface
    /// here rather than at module creation.
    pub fn link_pipeline(
        &self,
        source: &str,
        descriptor: &wgpu::RenderPipelineDescriptor<'_>,
    ) -> Result<wgpu::RenderPipeline> {
        let label = descriptor.label.unwrap_or("pipeline");
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.device.create_render_pipeline(descriptor);
        self.pop_program_error(label, source)?;
        tracing::info!("Created pipeline '{}'", label);
        Ok(pipeline)
    }

    fn pop_program_error(&self, label: &str, source: &str) -> Result<()> {
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(RenderError::ShaderCompilation {
                label: label.to_string(),
                diagnostic: error.to_string(),
                code: source.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Create a depth attachment matching a color target of the given size
    pub fn create_depth_texture(&self, width: u32, height: u32) -> wgpu::TextureView {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

fn device_descriptor() -> wgpu::DeviceDescriptor<'static> {
    wgpu::DeviceDescriptor {
        label: Some("Zarya Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: Default::default(),
        trace: wgpu::Trace::Off,
    }
}

/// Initialize WGPU for headless rendering (no window)
pub async fn init_headless() -> Result<RendererContext> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    tracing::info!("Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter.request_device(&device_descriptor()).await?;

    Ok(RendererContext {
        device: Arc::new(device),
        queue: Arc::new(queue),
        format: HEADLESS_FORMAT,
    })
}

/// Initialize WGPU for windowed rendering
pub async fn init_with_surface(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<RendererContext> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await?;
    tracing::info!("Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter.request_device(&device_descriptor()).await?;

    // Shaders output display-ready values, so prefer a target that stores
    // them as written.
    let surface_caps = surface.get_capabilities(&adapter);
    let format = surface_caps
        .formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| surface_caps.formats.first().copied())
        .ok_or_else(|| RenderError::Surface("surface reports no formats".to_string()))?;

    Ok(RendererContext {
        device: Arc::new(device),
        queue: Arc::new(queue),
        format,
    })
}

/// Depth test shared by both passes: nearer fragments win and write depth
pub fn depth_test() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Counter-clockwise triangle list with back faces culled
pub fn culled_triangles() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: Some(wgpu::Face::Back),
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Single uniform buffer at binding 0, visible to both stages
pub(crate) fn uniform_binding(
    device: &wgpu::Device,
    label: &str,
    buffer: &wgpu::Buffer,
) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });

    (layout, bind_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_test_keeps_nearest() {
        let state = depth_test();
        assert_eq!(state.depth_compare, wgpu::CompareFunction::Less);
        assert!(state.depth_write_enabled);
        assert!(!state.stencil.is_enabled());
    }

    #[test]
    fn test_back_faces_culled() {
        let state = culled_triangles();
        assert_eq!(state.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(state.front_face, wgpu::FrontFace::Ccw);
    }
}
