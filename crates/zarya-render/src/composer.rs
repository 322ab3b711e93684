//! Per-frame composition of the sphere mesh and the ray-marched lattice
//!
//! Both passes share one color and one depth attachment. The mesh is drawn
//! first; the proxy then writes per-pixel depth from the raymarch hit, so the
//! two kinds of geometry occlude each other correctly.

use crate::camera::Camera;
use crate::context::RendererContext;
use crate::error::{RenderError, Result};
use crate::mesh_pass::{MeshPass, MeshUniforms};
use crate::raymarch_pass::{RaymarchPass, RaymarchUniforms};
use crate::viewport::Viewport;
use zarya_core::config::SceneConfig;
use zarya_core::mesh::generate_sphere;
use zarya_core::transform::{ObjectTransforms, TransformParams};

/// Attachments a frame is drawn into
#[derive(Clone, Copy)]
pub struct FrameTarget<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

pub struct SceneComposer {
    mesh_pass: MeshPass,
    raymarch_pass: RaymarchPass,
    clear_color: wgpu::Color,
}

impl SceneComposer {
    /// Tessellate the sphere, upload it and build both programs
    pub fn new(ctx: &RendererContext, config: &SceneConfig) -> Result<Self> {
        let sphere = &config.sphere;
        let mesh = generate_sphere(sphere.radius, sphere.theta_segments, sphere.phi_segments);
        let [r, g, b] = config.clear_color.0;

        Ok(Self {
            mesh_pass: MeshPass::new(ctx, &mesh)?,
            raymarch_pass: RaymarchPass::new(ctx)?,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        })
    }

    /// Upload this frame's uniforms and record both passes into `encoder`.
    ///
    /// `params` is the snapshot for the whole frame; it is not read again.
    pub fn encode_frame(
        &self,
        ctx: &RendererContext,
        encoder: &mut wgpu::CommandEncoder,
        target: FrameTarget<'_>,
        camera: &Camera,
        params: TransformParams,
    ) -> ObjectTransforms {
        let view_proj = camera.view_projection_matrix();
        let transforms = ObjectTransforms::new(&params, view_proj);

        self.mesh_pass
            .update(&ctx.queue, &MeshUniforms::new(view_proj));
        self.raymarch_pass.update(
            &ctx.queue,
            &RaymarchUniforms::new(&transforms, params.scale, camera.position),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.mesh_pass.draw(&mut pass);
        self.raymarch_pass.draw(&mut pass);

        transforms
    }

    /// Render offscreen and read the color target back
    pub fn render_to_image(
        &self,
        ctx: &RendererContext,
        viewport: Viewport,
        camera: &Camera,
        params: TransformParams,
    ) -> Result<image::RgbaImage> {
        let Viewport { width, height } = viewport;
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Output Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = ctx.create_depth_texture(width, height);

        let bytes_per_pixel = 4u32;
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Output Buffer"),
            size: u64::from(padded_bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        self.encode_frame(
            ctx,
            &mut encoder,
            FrameTarget {
                color: &color,
                depth: &depth,
            },
            camera,
            params,
        );
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| RenderError::BufferMap(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderError::BufferMap(e.to_string()))?
            .map_err(|e| RenderError::BufferMap(e.to_string()))?;

        let swap_red_blue = matches!(
            ctx.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );

        let data = buffer_slice.get_mapped_range();
        let mut img = image::RgbaImage::new(width, height);
        for (y, row) in data
            .chunks_exact(padded_bytes_per_row as usize)
            .take(height as usize)
            .enumerate()
        {
            for (x, px) in row[..unpadded_bytes_per_row as usize]
                .chunks_exact(4)
                .enumerate()
            {
                let rgba = if swap_red_blue {
                    [px[2], px[1], px[0], px[3]]
                } else {
                    [px[0], px[1], px[2], px[3]]
                };
                img.put_pixel(x as u32, y as u32, image::Rgba(rgba));
            }
        }

        drop(data);
        output_buffer.unmap();

        Ok(img)
    }
}
