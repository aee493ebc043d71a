use crate::sim::Extent;

/// Renderer-facing context (device/queue + surface format + surface size).
///
/// Borrowed for one frame; renderers keep their own GPU resources.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub surface_extent: Extent,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        surface_extent: Extent,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            surface_extent,
        }
    }
}

/// Target for drawing (encoder + color view).
///
/// Simulation passes record into the same encoder before consumers draw into
/// `color_view`, so one submission carries the whole frame in order.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
