use bytemuck::{Pod, Zeroable};

use tidepool_engine::core::{AppControl, FrameCtx};
use tidepool_engine::effects::{water_extent, WaterParams, WaterSimulation, DEFAULT_TEXEL_DENSITY};
use tidepool_engine::feed::InteractionSample;
use tidepool_engine::input::Key;
use tidepool_engine::render::SurfacePass;
use tidepool_engine::sim::GpuBackend;

use crate::config::PageKind;
use crate::controls::{DAMPING, PRESSURE_DAMPING, SURFACE_HEIGHT, SURFACE_WIDTH, TIME_STEP};

use super::{rgb, Page};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.012,
    g: 0.018,
    b: 0.03,
    a: 1.0,
};

/// Share of the window the surface may cover along its limiting axis.
const FIT_MARGIN: f32 = 0.9;

/// Look of the water surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceStyle {
    pub color: [f32; 3],
    pub highlight: [f32; 3],
    pub opacity: f32,
    /// Direction towards the light, surface space (+Z out of the surface).
    pub light: [f32; 3],
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            color: rgb(0x00aaff),
            highlight: rgb(0xffffff),
            opacity: 0.5,
            light: [10.0, 10.0, 10.0],
        }
    }
}

/// Placement of the surface in window UV (`0..1`, top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceRect {
    pub origin: [f32; 2],
    pub size: [f32; 2],
}

impl SurfaceRect {
    /// Centers a `surface` aspect inside `window`, scaled to fit with a margin.
    pub fn fit(window: (f32, f32), surface: (f32, f32)) -> Option<Self> {
        let (ww, wh) = window;
        let (sw, sh) = surface;
        if ww <= 0.0 || wh <= 0.0 || sw <= 0.0 || sh <= 0.0 {
            return None;
        }

        let scale = (FIT_MARGIN * ww / sw).min(FIT_MARGIN * wh / sh);
        let size = [sw * scale / ww, sh * scale / wh];

        Some(Self {
            origin: [(1.0 - size[0]) * 0.5, (1.0 - size[1]) * 0.5],
            size,
        })
    }

    /// Surface UV under `window_uv`, or `None` when the point misses the surface.
    pub fn to_local(&self, window_uv: [f32; 2]) -> Option<[f32; 2]> {
        let u = (window_uv[0] - self.origin[0]) / self.size[0];
        let v = (window_uv[1] - self.origin[1]) / self.size[1];
        ((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v)).then_some([u, v])
    }
}

/// Uniform block (64 bytes):
///
///  offset  0  rect       vec4<f32>  (.xy = origin, .zw = size, window UV)
///  offset 16  color      vec4<f32>  (.rgb = color, .a = opacity)
///  offset 32  highlight  vec4<f32>
///  offset 48  light      vec4<f32>  (.xyz = direction)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct WaterSurfaceUniforms {
    rect: [f32; 4],
    color: [f32; 4],
    highlight: [f32; 4],
    light: [f32; 4],
}

impl WaterSurfaceUniforms {
    fn new(rect: SurfaceRect, style: &SurfaceStyle) -> Self {
        let [cr, cg, cb] = style.color;
        let [hr, hg, hb] = style.highlight;
        let [lx, ly, lz] = style.light;
        Self {
            rect: [rect.origin[0], rect.origin[1], rect.size[0], rect.size[1]],
            color: [cr, cg, cb, style.opacity],
            highlight: [hr, hg, hb, 1.0],
            light: [lx, ly, lz, 0.0],
        }
    }
}

/// Rippling water surface driven by the water simulator.
pub struct WaterPage {
    sim: WaterSimulation,
    surface: SurfacePass<WaterSurfaceUniforms>,
    style: SurfaceStyle,

    /// Surface dimensions in panel units; their ratio sets the buffer aspect.
    width: f32,
    height: f32,

    /// Largest buffer side the device accepts; learned on the first frame.
    max_dimension: u32,

    /// Placement used for the last drawn frame; pointer mapping follows it.
    rect: Option<SurfaceRect>,
}

impl WaterPage {
    pub fn new() -> Self {
        let (width, height) = (2.9, 1.7);
        let max_dimension = wgpu::Limits::default().max_texture_dimension_2d;
        Self {
            sim: WaterSimulation::new(
                water_extent(width, height, DEFAULT_TEXEL_DENSITY, max_dimension),
                WaterParams::default(),
            ),
            // Rgba32Float is not filterable on every adapter.
            surface: SurfacePass::new(
                "tidepool water surface",
                include_str!("../shaders/water_surface.wgsl"),
                false,
            ),
            style: SurfaceStyle::default(),
            width,
            height,
            max_dimension,
            rect: None,
        }
    }

    fn resize_simulation(&mut self) {
        self.sim.resize(water_extent(
            self.width,
            self.height,
            DEFAULT_TEXEL_DENSITY,
            self.max_dimension,
        ));
    }
}

impl Page for WaterPage {
    fn kind(&self) -> PageKind {
        PageKind::Water
    }

    fn pointer_uv(&self, window_uv: [f32; 2], window_size: (f32, f32)) -> Option<[f32; 2]> {
        let rect = self
            .rect
            .or_else(|| SurfaceRect::fit(window_size, (self.width, self.height)))?;
        rect.to_local(window_uv)
    }

    fn on_key(&mut self, key: Key) -> bool {
        let mut params = self.sim.params();
        let consumed = TIME_STEP.apply(key, &mut params.time_step)
            || DAMPING.apply(key, &mut params.damping)
            || PRESSURE_DAMPING.apply(key, &mut params.pressure_damping);
        if consumed {
            self.sim.set_params(params);
            return true;
        }

        let (width, height) = (self.width, self.height);
        let consumed = SURFACE_WIDTH.apply(key, &mut self.width)
            || SURFACE_HEIGHT.apply(key, &mut self.height);
        if (width, height) != (self.width, self.height) {
            self.resize_simulation();
        }
        consumed
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, interaction: InteractionSample) -> AppControl {
        let max_dimension = ctx.gpu.device().limits().max_texture_dimension_2d;
        if max_dimension != self.max_dimension {
            self.max_dimension = max_dimension;
            self.resize_simulation();
        }

        self.rect = SurfaceRect::fit(ctx.window.logical_size(), (self.width, self.height));
        let uniforms = self
            .rect
            .map(|rect| WaterSurfaceUniforms::new(rect, &self.style));

        let sim = &mut self.sim;
        let surface = &mut self.surface;

        ctx.render(CLEAR, |rctx, target| {
            {
                let mut backend = GpuBackend::new(rctx.device, rctx.queue, &mut *target.encoder);
                sim.advance(&mut backend, interaction);
            }

            if let (Some(output), Some(uniforms)) = (sim.output_target(), uniforms.as_ref()) {
                surface.render(rctx, target, output.view(), uniforms);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_64_bytes() {
        assert_eq!(std::mem::size_of::<WaterSurfaceUniforms>(), 64);
    }

    #[test]
    fn wide_surface_is_limited_by_window_width() {
        let rect = SurfaceRect::fit((1000.0, 1000.0), (2.0, 1.0)).unwrap();
        assert!((rect.size[0] - 0.9).abs() < 1e-6);
        assert!((rect.size[1] - 0.45).abs() < 1e-6);
        assert!((rect.origin[0] - 0.05).abs() < 1e-6);
        assert!((rect.origin[1] - 0.275).abs() < 1e-6);
    }

    #[test]
    fn pointer_outside_surface_maps_to_none() {
        let rect = SurfaceRect::fit((1000.0, 1000.0), (2.0, 1.0)).unwrap();
        assert_eq!(rect.to_local([0.5, 0.1]), None);
        let center = rect.to_local([0.5, 0.5]).unwrap();
        assert!((center[0] - 0.5).abs() < 1e-6);
        assert!((center[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_window_has_no_surface() {
        assert_eq!(SurfaceRect::fit((0.0, 720.0), (2.9, 1.7)), None);
    }

    #[test]
    fn width_keys_resize_the_simulation() {
        let mut page = WaterPage::new();
        let before = page.sim.extent();
        assert!(page.on_key(Key::Z));
        assert_ne!(page.sim.extent(), before);
        assert_eq!(page.sim.extent().height, DEFAULT_TEXEL_DENSITY);
    }

    #[test]
    fn widest_panel_surface_stays_allocatable() {
        let mut page = WaterPage::new();
        page.width = SURFACE_WIDTH.max;
        page.height = SURFACE_HEIGHT.min;
        page.resize_simulation();

        let extent = page.sim.extent();
        assert!(extent.is_valid());
        assert!(extent.width <= page.max_dimension);
        assert!(extent.height <= page.max_dimension);
    }

    #[test]
    fn tunable_keys_update_params() {
        let mut page = WaterPage::new();
        assert!(page.on_key(Key::A));
        assert!((page.sim.params().time_step - 0.9).abs() < 1e-6);
        assert!(!page.on_key(Key::R));
    }
}
