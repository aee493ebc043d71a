use bytemuck::{Pod, Zeroable};

use crate::feed::FeedInputs;
use crate::sim::{smoothstep, Sampling, SimulationProgram, Texel, TexelGrid};

/// Trail tunables.
///
/// Panel ranges: `fade` 0.8..0.999, `influence_size` 0.01..0.2.
/// The simulator does not enforce them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrailParams {
    /// Multiplier applied to the accumulated intensity every pass.
    pub fade: f32,
    /// Brush radius in aspect-corrected UV units.
    pub influence_size: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            fade: 0.96,
            influence_size: 0.05,
        }
    }
}

/// Uniform block (32 bytes):
///
///  offset  0  mouse       vec4<f32>  (.xy = uv, .z = active)
///  offset 16  resolution  vec2<f32>
///  offset 24  fade        f32
///  offset 28  size        f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TrailUniforms {
    pub mouse: [f32; 4],
    pub resolution: [f32; 2],
    pub fade: f32,
    pub size: f32,
}

/// Pointer trail with geometric fade.
///
/// Channels: r = accumulated intensity (`max(prev * fade, brush)`),
/// g = brush deposited by this pass alone, a = 1.
pub struct TrailProgram;

impl SimulationProgram for TrailProgram {
    type Params = TrailParams;
    type Uniforms = TrailUniforms;

    const LABEL: &'static str = "trail";
    const WGSL: &'static str = include_str!("shaders/trail.wgsl");
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
    const SAMPLING: Sampling = Sampling::Linear;

    fn feed(inputs: &FeedInputs<TrailParams>) -> TrailUniforms {
        TrailUniforms {
            mouse: inputs.interaction.to_uniform(),
            resolution: inputs.resolution.as_uniform(),
            fade: inputs.params.fade,
            size: inputs.params.influence_size,
        }
    }

    fn shade(u: &TrailUniforms, prev: &TexelGrid, x: u32, y: u32) -> Texel {
        let [intensity, ..] = prev.get(x, y);

        let uv = [
            (x as f32 + 0.5) / u.resolution[0],
            (y as f32 + 0.5) / u.resolution[1],
        ];
        let aspect = u.resolution[0] / u.resolution[1];
        let dx = (uv[0] - u.mouse[0]) * aspect;
        let dy = uv[1] - u.mouse[1];
        let dist = (dx * dx + dy * dy).sqrt();

        let brush = smoothstep(u.size, 0.0, dist) * u.mouse[2];
        let value = (intensity * u.fade).max(brush);

        [value, brush, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::InteractionSample;
    use crate::sim::Extent;

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(std::mem::size_of::<TrailUniforms>(), 32);
    }

    #[test]
    fn inactive_pointer_only_fades() {
        let e = Extent::new(4, 4);
        let mut prev = TexelGrid::zeroed(e);
        prev.set(1, 2, [0.5, 0.0, 0.0, 1.0]);

        let u = TrailProgram::feed(&FeedInputs {
            resolution: e,
            interaction: InteractionSample::released([0.375, 0.625]),
            params: TrailParams {
                fade: 0.9,
                influence_size: 0.5,
            },
            frame: 0,
        });

        let out = TrailProgram::shade(&u, &prev, 1, 2);
        assert!((out[0] - 0.45).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn fade_above_one_is_not_clamped() {
        let e = Extent::new(2, 2);
        let mut prev = TexelGrid::zeroed(e);
        prev.set(0, 0, [1.0, 0.0, 0.0, 1.0]);

        let u = TrailProgram::feed(&FeedInputs {
            resolution: e,
            interaction: InteractionSample::default(),
            params: TrailParams {
                fade: 1.5,
                influence_size: 0.05,
            },
            frame: 0,
        });
        assert_eq!(u.fade, 1.5);
        assert!((TrailProgram::shade(&u, &prev, 0, 0)[0] - 1.5).abs() < 1e-6);
    }
}
