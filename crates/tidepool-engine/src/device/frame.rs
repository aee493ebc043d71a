/// One acquired swapchain frame.
///
/// Simulation passes and consumer draws are recorded into `encoder`; the
/// frame is presented when it is handed back to [`Gpu::submit`](super::Gpu::submit).
/// Holding it blocks acquisition of the next frame.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
