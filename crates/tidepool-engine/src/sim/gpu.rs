use anyhow::Result;

use crate::render::quad::{
    edge_sampler, quad_pipeline, texture_bind_group_layout, uniform_min_binding_size, QuadBuffers,
};

use super::{Extent, PassBackend, PassResources, Sampling, SimulationProgram};

/// Offscreen simulation buffer on the GPU.
pub struct GpuTarget {
    /// Kept alive for the lifetime of `view`.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: Extent,
}

impl GpuTarget {
    /// View for consumers to bind as a sampled texture.
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }
}

/// Pipeline, uniform buffer and sampler for one simulation program.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    quad: QuadBuffers,
}

/// Resources of [`GpuBackend`]: textures and render pipelines.
#[derive(Debug)]
pub enum Wgpu {}

impl PassResources for Wgpu {
    type Target = GpuTarget;
    type Program = GpuProgram;
}

/// wgpu pass backend, borrowed for one frame.
///
/// Passes are recorded into the frame's command encoder and submitted with the
/// rest of the frame; nothing waits on GPU completion. Each program owns one
/// uniform buffer written through the queue, so a simulator must advance at
/// most once per submitted encoder.
pub struct GpuBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    encoder: &'a mut wgpu::CommandEncoder,
}

impl<'a> GpuBackend<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        encoder: &'a mut wgpu::CommandEncoder,
    ) -> Self {
        Self {
            device,
            queue,
            encoder,
        }
    }
}

impl PassBackend<Wgpu> for GpuBackend<'_> {
    fn create_program<P: SimulationProgram>(&mut self) -> Result<GpuProgram> {
        let label = format!("tidepool {}", P::LABEL);
        let uniform_size = uniform_min_binding_size::<P::Uniforms>();
        anyhow::ensure!(
            uniform_size.is_some_and(|s| s.get() % 16 == 0),
            "{label}: uniform block size must be a non-zero multiple of 16 bytes"
        );

        let linear = P::SAMPLING == Sampling::Linear;

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} shader")),
            source: wgpu::ShaderSource::Wgsl(P::WGSL.into()),
        });

        let bind_group_layout =
            texture_bind_group_layout(self.device, &label, uniform_size, linear);

        let pipeline = quad_pipeline(
            self.device,
            &label,
            &shader,
            &bind_group_layout,
            P::FORMAT,
            None,
        );

        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} ubo")),
            size: std::mem::size_of::<P::Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(GpuProgram {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler: edge_sampler(self.device, &label, linear),
            quad: QuadBuffers::new(self.device, &label),
        })
    }

    fn create_target<P: SimulationProgram>(&mut self, label: &str, extent: Extent) -> Result<GpuTarget> {
        anyhow::ensure!(
            extent.is_valid(),
            "{label}: zero-sized target {}x{}",
            extent.width,
            extent.height
        );

        let max_dim = self.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            extent.width <= max_dim && extent.height <= max_dim,
            "{label}: {}x{} exceeds max texture dimension {max_dim}",
            extent.width,
            extent.height
        );

        // Out-of-memory would otherwise reach the uncaptured handler mid-frame.
        let out_of_memory = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: P::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Inner scope first.
        let validation = pollster::block_on(validation.pop());
        let out_of_memory = pollster::block_on(out_of_memory.pop());
        allocation_result(label, out_of_memory, validation)?;

        Ok(GpuTarget {
            _texture: texture,
            view,
            extent,
        })
    }

    fn draw_fullscreen<P: SimulationProgram>(
        &mut self,
        program: &mut GpuProgram,
        uniforms: &P::Uniforms,
        source: &GpuTarget,
        dest: &mut GpuTarget,
    ) {
        debug_assert_eq!(source.extent(), dest.extent());

        self.queue
            .write_buffer(&program.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        // Rebuilt every pass: the source texture alternates between the pair.
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tidepool sim bind group"),
            layout: &program.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: program.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&program.sampler),
                },
            ],
        });

        // Render destination is only `dest` for the lifetime of this pass.
        let mut rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tidepool sim pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &dest.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        program.quad.draw(&mut rpass);
    }
}

/// Turns the errors caught around one texture allocation into a result.
fn allocation_result(
    label: &str,
    out_of_memory: Option<wgpu::Error>,
    validation: Option<wgpu::Error>,
) -> Result<()> {
    match out_of_memory.or(validation) {
        None => Ok(()),
        Some(err) => Err(anyhow::anyhow!("{label}: texture allocation failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out_of_memory() -> wgpu::Error {
        wgpu::Error::OutOfMemory {
            source: Box::new(std::io::Error::other("device memory exhausted")),
        }
    }

    fn validation(description: &str) -> wgpu::Error {
        wgpu::Error::Validation {
            source: Box::new(std::io::Error::other(description.to_string())),
            description: description.to_string(),
        }
    }

    #[test]
    fn clean_scopes_allocate() {
        assert!(allocation_result("water a", None, None).is_ok());
    }

    #[test]
    fn out_of_memory_becomes_an_error() {
        let err = allocation_result("water a", Some(out_of_memory()), None).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("water a"), "{msg}");
        assert!(msg.contains("Out of Memory"), "{msg}");
    }

    #[test]
    fn validation_failure_becomes_an_error() {
        let err = allocation_result("trail b", None, Some(validation("bad usage"))).unwrap_err();
        assert!(format!("{err}").contains("bad usage"));
    }

    #[test]
    fn out_of_memory_is_reported_before_validation() {
        let err = allocation_result("trail b", Some(out_of_memory()), Some(validation("bad usage")))
            .unwrap_err();
        assert!(format!("{err}").contains("Out of Memory"));
    }
}
