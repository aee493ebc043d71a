use bytemuck::{Pod, Zeroable};

use crate::feed::FeedInputs;
use crate::sim::{texel_noise, Extent, Sampling, SimulationProgram, Texel, TexelGrid};

/// Texels along the short axis of the water buffer.
pub const DEFAULT_TEXEL_DENSITY: u32 = 512;

/// Restoring force pulling height back towards rest.
const SPRING: f32 = 0.005;

/// Click brush radius in UV units.
const BRUSH_RADIUS: f32 = 0.02;

/// Height added at the brush center on a full-strength click.
const BRUSH_STRENGTH: f32 = 2.0;

/// Share of the brush strength modulated by per-texel noise.
const BRUSH_JITTER: f32 = 0.1;

/// Water tunables.
///
/// Panel ranges: `time_step` 0.1..2.0, `damping` 0..0.01,
/// `pressure_damping` 0.9..0.999. The simulator does not enforce them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WaterParams {
    pub time_step: f32,
    pub damping: f32,
    pub pressure_damping: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            damping: 0.002,
            pressure_damping: 0.98,
        }
    }
}

/// Uniform block (48 bytes):
///
///  offset  0  mouse             vec4<f32>  (.xy = uv, .z = active)
///  offset 16  resolution        vec2<f32>
///  offset 24  time_step         f32
///  offset 28  damping           f32
///  offset 32  pressure_damping  f32
///  offset 36  frame             u32
///  offset 40  _pad              vec2<f32>
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct WaterUniforms {
    pub mouse: [f32; 4],
    pub resolution: [f32; 2],
    pub time_step: f32,
    pub damping: f32,
    pub pressure_damping: f32,
    pub frame: u32,
    pub _pad: [f32; 2],
}

/// Shallow-water style height/velocity field.
///
/// Channels: r = height, g = vertical velocity, b/a = height gradient along
/// x/y (central differences, for surface normals downstream).
pub struct WaterProgram;

/// Buffer resolution for a water surface of `width x height` world units:
/// `density` texels on the vertical axis, aspect preserved horizontally.
///
/// Neither side exceeds `max_dimension`; a surface too wide for it trades
/// density for aspect, keeping the long axis at the limit.
pub fn water_extent(width: f32, height: f32, density: u32, max_dimension: u32) -> Extent {
    let aspect = width / height;
    let rows = density.min(max_dimension);
    if !(aspect.is_finite() && aspect > 0.0) {
        return Extent::new(0, rows);
    }

    let columns = (rows as f32 * aspect).floor();
    if columns <= max_dimension as f32 {
        return Extent::new(columns as u32, rows);
    }

    let rows = (max_dimension as f32 / aspect).floor().max(1.0);
    Extent::new(max_dimension, rows as u32)
}

impl SimulationProgram for WaterProgram {
    type Params = WaterParams;
    type Uniforms = WaterUniforms;

    const LABEL: &'static str = "water";
    const WGSL: &'static str = include_str!("shaders/water.wgsl");
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
    const SAMPLING: Sampling = Sampling::Nearest;

    fn feed(inputs: &FeedInputs<WaterParams>) -> WaterUniforms {
        WaterUniforms {
            mouse: inputs.interaction.to_uniform(),
            resolution: inputs.resolution.as_uniform(),
            time_step: inputs.params.time_step,
            damping: inputs.params.damping,
            pressure_damping: inputs.params.pressure_damping,
            frame: inputs.frame,
            _pad: [0.0; 2],
        }
    }

    fn shade(u: &WaterUniforms, prev: &TexelGrid, x: u32, y: u32) -> Texel {
        let (xi, yi) = (x as i64, y as i64);
        let last_x = u.resolution[0] as u32 - 1;
        let last_y = u.resolution[1] as u32 - 1;

        let [mut height, mut velocity, _, _] = prev.get(x, y);

        let mut right = prev.load(xi + 1, yi)[0];
        let mut left = prev.load(xi - 1, yi)[0];
        let mut up = prev.load(xi, yi + 1)[0];
        let mut down = prev.load(xi, yi - 1)[0];

        // Mirror at the borders.
        if x == 0 {
            left = right;
        }
        if x == last_x {
            right = left;
        }
        if y == 0 {
            down = up;
        }
        if y == last_y {
            up = down;
        }

        let dt = u.time_step;
        velocity += dt * (-2.0 * height + right + left) / 4.0;
        velocity += dt * (-2.0 * height + up + down) / 4.0;
        height += dt * velocity;
        velocity -= SPRING * dt * height;
        velocity *= 1.0 - u.damping * dt;
        height *= u.pressure_damping;

        let [mx, my, active, _] = u.mouse;
        if active > 0.0 {
            let uv = [
                (x as f32 + 0.5) / u.resolution[0],
                (y as f32 + 0.5) / u.resolution[1],
            ];
            let dist = ((uv[0] - mx).powi(2) + (uv[1] - my).powi(2)).sqrt();
            if dist <= BRUSH_RADIUS {
                let jitter = 1.0 - BRUSH_JITTER + BRUSH_JITTER * texel_noise(x, y, u.frame);
                height += BRUSH_STRENGTH * (1.0 - dist / BRUSH_RADIUS) * active * jitter;
            }
        }

        [height, velocity, (right - left) / 2.0, (up - down) / 2.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::InteractionSample;

    fn uniforms(extent: Extent, interaction: InteractionSample, frame: u32) -> WaterUniforms {
        WaterProgram::feed(&FeedInputs {
            resolution: extent,
            interaction,
            params: WaterParams::default(),
            frame,
        })
    }

    #[test]
    fn uniform_block_is_48_bytes() {
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 48);
    }

    #[test]
    fn extent_keeps_aspect_at_fixed_density() {
        assert_eq!(water_extent(10.0, 5.0, 512, 8192), Extent::new(1024, 512));
        assert_eq!(water_extent(2.9, 1.7, 512, 8192), Extent::new(873, 512));
    }

    #[test]
    fn widest_panel_surface_fits_the_texture_limit() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let extent = water_extent(20.0, 1.0, DEFAULT_TEXEL_DENSITY, max);

        assert!(extent.is_valid());
        assert_eq!(extent.width, max);
        assert!(extent.height <= DEFAULT_TEXEL_DENSITY);
        let aspect = extent.width as f32 / extent.height as f32;
        assert!((aspect - 20.0).abs() / 20.0 < 0.01, "aspect {aspect}");
    }

    #[test]
    fn density_above_the_limit_is_capped() {
        assert_eq!(water_extent(1.0, 1.0, 4096, 2048), Extent::new(2048, 2048));
    }

    #[test]
    fn degenerate_height_gives_invalid_extent() {
        assert!(!water_extent(1.0, 0.0, 512, 8192).is_valid());
    }

    #[test]
    fn feed_passes_params_through_unclamped() {
        let u = WaterProgram::feed(&FeedInputs {
            resolution: Extent::new(8, 8),
            interaction: InteractionSample::pressed([0.25, 0.5]),
            params: WaterParams {
                time_step: 7.5,
                damping: -1.0,
                pressure_damping: 3.0,
            },
            frame: 42,
        });
        assert_eq!(u.time_step, 7.5);
        assert_eq!(u.damping, -1.0);
        assert_eq!(u.pressure_damping, 3.0);
        assert_eq!(u.frame, 42);
        assert_eq!(u.mouse, [0.25, 0.5, 1.0, 0.0]);
        assert_eq!(u.resolution, [8.0, 8.0]);
    }

    #[test]
    fn still_water_stays_still() {
        let e = Extent::new(16, 16);
        let prev = TexelGrid::zeroed(e);
        let u = uniforms(e, InteractionSample::released([0.5, 0.5]), 3);
        for (x, y) in [(0, 0), (8, 8), (15, 15)] {
            assert_eq!(WaterProgram::shade(&u, &prev, x, y), [0.0; 4]);
        }
    }

    #[test]
    fn click_raises_height_under_pointer_only() {
        let e = Extent::new(100, 100);
        let prev = TexelGrid::zeroed(e);
        let u = uniforms(e, InteractionSample::pressed([0.505, 0.505]), 0);

        let hit = WaterProgram::shade(&u, &prev, 50, 50);
        assert!(hit[0] > 1.5, "height under pointer: {}", hit[0]);

        let miss = WaterProgram::shade(&u, &prev, 10, 10);
        assert_eq!(miss, [0.0; 4]);
    }
}
