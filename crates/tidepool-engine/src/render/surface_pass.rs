use std::marker::PhantomData;

use bytemuck::Pod;

use super::quad::{
    edge_sampler, quad_pipeline, texture_bind_group_layout, uniform_min_binding_size, QuadBuffers,
};
use super::{RenderCtx, RenderTarget};

/// Consumer-side full-screen draw onto the frame's color target.
///
/// Samples one simulation output texture plus a uniform block `U` and blends
/// over what is already in the target (premultiplied alpha). The sampled
/// texture is only ever bound for reading; the simulator that produced it
/// keeps exclusive write access.
///
/// Shader contract:
/// - binding 0: `U`
/// - binding 1: simulation output (`texture_2d<f32>`)
/// - binding 2: sampler (filtering iff constructed with `filterable = true`)
/// - `vs_main` takes the quad corner at location 0, `fs_main` writes location 0
pub struct SurfacePass<U: Pod> {
    label: &'static str,
    wgsl: &'static str,
    filterable: bool,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,
    quad: Option<QuadBuffers>,

    _uniforms: PhantomData<U>,
}

impl<U: Pod> SurfacePass<U> {
    pub fn new(label: &'static str, wgsl: &'static str, filterable: bool) -> Self {
        Self {
            label,
            wgsl,
            filterable,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            ubo: None,
            sampler: None,
            quad: None,
            _uniforms: PhantomData,
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: &wgpu::TextureView,
        uniforms: &U,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_resources(ctx);

        let Some(ubo) = self.ubo.as_ref() else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(quad) = self.quad.as_ref() else { return };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniforms));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        quad.draw(&mut rpass);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(self.wgsl.into()),
        });

        let bind_group_layout = texture_bind_group_layout(
            ctx.device,
            self.label,
            uniform_min_binding_size::<U>(),
            self.filterable,
        );

        let pipeline = quad_pipeline(
            ctx.device,
            self.label,
            &shader,
            &bind_group_layout,
            ctx.surface_format,
            Some(premul_alpha_blend()),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
    }

    fn ensure_static_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.ubo.is_none() {
            self.ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: std::mem::size_of::<U>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if self.sampler.is_none() {
            self.sampler = Some(edge_sampler(ctx.device, self.label, self.filterable));
        }
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx.device, self.label));
        }
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
