use bytemuck::{Pod, Zeroable};

use tidepool_engine::core::{AppControl, FrameCtx};
use tidepool_engine::effects::{TrailParams, TrailSimulation};
use tidepool_engine::feed::InteractionSample;
use tidepool_engine::input::Key;
use tidepool_engine::render::SurfacePass;
use tidepool_engine::sim::{Extent, GpuBackend};

use crate::config::PageKind;
use crate::controls::{FADE, INFLUENCE_SIZE, THRESHOLD};

use super::Page;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.012,
    a: 1.0,
};

/// Cosine palette `a + b * cos(2π (c * t + d))`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CosinePalette {
    pub a: [f32; 3],
    pub b: [f32; 3],
    pub c: [f32; 3],
    pub d: [f32; 3],
}

impl Default for CosinePalette {
    fn default() -> Self {
        Self {
            a: [0.543, 0.030, 0.563],
            b: [0.827, 0.907, 0.754],
            c: [1.054, 1.394, 1.047],
            d: [1.707, 1.572, 5.885],
        }
    }
}

/// Uniform block (80 bytes):
///
///  offset  0  palette_a..d  4 x vec4<f32>  (.xyz used)
///  offset 64  params        vec4<f32>      (threshold, elapsed, resolution)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SortingUniforms {
    palette: [[f32; 4]; 4],
    params: [f32; 4],
}

impl SortingUniforms {
    fn new(palette: &CosinePalette, threshold: f32, elapsed: f32, resolution: Extent) -> Self {
        let v = |[x, y, z]: [f32; 3]| [x, y, z, 0.0];
        let [w, h] = resolution.as_uniform();
        Self {
            palette: [v(palette.a), v(palette.b), v(palette.c), v(palette.d)],
            params: [threshold, elapsed, w, h],
        }
    }
}

/// Full-window glitch plane fed by the pointer trail simulator.
pub struct GlitchPage {
    sim: TrailSimulation,
    plane: SurfacePass<SortingUniforms>,
    palette: CosinePalette,
    threshold: f32,
}

impl GlitchPage {
    pub fn new() -> Self {
        Self {
            // Sized from the surface on the first frame.
            sim: TrailSimulation::new(Extent::new(0, 0), TrailParams::default()),
            plane: SurfacePass::new(
                "tidepool sorting plane",
                include_str!("../shaders/sorting_plane.wgsl"),
                true,
            ),
            palette: CosinePalette::default(),
            threshold: 0.1,
        }
    }
}

impl Page for GlitchPage {
    fn kind(&self) -> PageKind {
        PageKind::Glitch
    }

    fn pointer_uv(&self, window_uv: [f32; 2], _window_size: (f32, f32)) -> Option<[f32; 2]> {
        Some(window_uv)
    }

    fn on_key(&mut self, key: Key) -> bool {
        let mut params = self.sim.params();
        let consumed = FADE.apply(key, &mut params.fade)
            || INFLUENCE_SIZE.apply(key, &mut params.influence_size);
        if consumed {
            self.sim.set_params(params);
            return true;
        }
        THRESHOLD.apply(key, &mut self.threshold)
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, interaction: InteractionSample) -> AppControl {
        // Follows the window; a minimized window yields an invalid extent and
        // the simulator skips until it is restored.
        self.sim.resize(ctx.gpu.surface_extent());

        let uniforms = SortingUniforms::new(
            &self.palette,
            self.threshold,
            ctx.time.elapsed,
            self.sim.extent(),
        );

        let sim = &mut self.sim;
        let plane = &mut self.plane;

        ctx.render(CLEAR, |rctx, target| {
            {
                let mut backend = GpuBackend::new(rctx.device, rctx.queue, &mut *target.encoder);
                sim.advance(&mut backend, interaction);
            }

            if let Some(output) = sim.output_target() {
                plane.render(rctx, target, output.view(), &uniforms);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_80_bytes() {
        assert_eq!(std::mem::size_of::<SortingUniforms>(), 80);
    }

    #[test]
    fn uniforms_carry_threshold_time_and_resolution() {
        let u = SortingUniforms::new(&CosinePalette::default(), 0.1, 2.5, Extent::new(640, 480));
        assert_eq!(u.params, [0.1, 2.5, 640.0, 480.0]);
        assert_eq!(u.palette[3], [1.707, 1.572, 5.885, 0.0]);
    }

    #[test]
    fn control_keys_reach_trail_params_and_threshold() {
        let mut page = GlitchPage::new();
        assert!(page.on_key(Key::G));
        assert!((page.sim.params().influence_size - 0.04).abs() < 1e-6);
        assert!(page.on_key(Key::Y));
        assert!((page.threshold - 0.15).abs() < 1e-6);
        assert!(!page.on_key(Key::Q));
    }
}
