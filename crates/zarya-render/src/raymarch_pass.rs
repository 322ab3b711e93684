//! Proxy cube draw that ray marches the lattice per covered pixel

// Default trait access is consistent with wgpu patterns
#![allow(clippy::default_trait_access)]

use crate::context::{RendererContext, culled_triangles, depth_test, uniform_binding};
use crate::error::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use zarya_core::proxy::PROXY_VERTEX_COUNT;
use zarya_core::transform::ObjectTransforms;

/// WGSL source of the raymarch program
pub const RAYMARCH_SHADER: &str = include_str!("shaders/raymarch.wgsl");

/// Per-frame uniforms of the raymarch program
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RaymarchUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub inv_model: [[f32; 4]; 4],
    pub scale: [f32; 3],
    pub _pad0: f32,
    pub camera_position: [f32; 3],
    pub _pad1: f32,
}

impl RaymarchUniforms {
    pub fn new(transforms: &ObjectTransforms, scale: Vec3, camera_position: Vec3) -> Self {
        Self {
            mvp: transforms.mvp.to_cols_array_2d(),
            model: transforms.model.to_cols_array_2d(),
            inv_model: transforms.inv_model.to_cols_array_2d(),
            scale: scale.to_array(),
            _pad0: 0.0,
            camera_position: camera_position.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Pipeline and uniforms for the proxy. No vertex buffer: the shader builds
/// the cube from `vertex_index`.
pub struct RaymarchPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl RaymarchPass {
    pub fn new(ctx: &RendererContext) -> Result<Self> {
        let device = &ctx.device;
        let shader = ctx.compile_shader("Raymarch Shader", RAYMARCH_SHADER)?;

        let identity = ObjectTransforms {
            model: Mat4::IDENTITY,
            inv_model: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Raymarch Uniform Buffer"),
            contents: bytemuck::cast_slice(&[RaymarchUniforms::new(
                &identity,
                Vec3::ZERO,
                Vec3::ZERO,
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (bind_group_layout, bind_group) =
            uniform_binding(device, "Raymarch Bind Group", &uniform_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Raymarch Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.link_pipeline(
            RAYMARCH_SHADER,
            &wgpu::RenderPipelineDescriptor {
                label: Some("Raymarch Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_raymarch"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_raymarch"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: culled_triangles(),
                depth_stencil: Some(depth_test()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        )?;

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &RaymarchUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the 36-vertex proxy draw into an open render pass
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..PROXY_VERTEX_COUNT, 0..1);
    }
}
