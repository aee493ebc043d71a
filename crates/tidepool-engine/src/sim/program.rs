use bytemuck::Pod;

use crate::feed::FeedInputs;

use super::{Texel, TexelGrid};

/// How a program reads the previous frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sampling {
    /// Exact texel fetch; the buffer format does not need to be filterable.
    Nearest,
    /// Bilinear sampling; requires a filterable format.
    Linear,
}

/// Schema of one full-screen simulation pass.
///
/// A program names its shader, the storage format of its buffers, and its
/// uniform block. `feed` is the per-frame translation of tunables and the
/// interaction sample into that block. `shade` evaluates the same program for
/// one texel on the CPU; backends without a GPU run it over the whole grid.
///
/// The shader's view of the world is fixed:
/// - binding 0: `Uniforms`
/// - binding 1: previous-frame texture
/// - binding 2: sampler matching [`Self::SAMPLING`]
pub trait SimulationProgram {
    /// Tunables supplied by the control collaborator, stored verbatim.
    type Params: Copy + std::fmt::Debug;

    /// GPU uniform block. Its size must be a multiple of 16 bytes.
    type Uniforms: Pod;

    const LABEL: &'static str;
    const WGSL: &'static str;
    const FORMAT: wgpu::TextureFormat;
    const SAMPLING: Sampling;

    fn feed(inputs: &FeedInputs<Self::Params>) -> Self::Uniforms;

    fn shade(uniforms: &Self::Uniforms, prev: &TexelGrid, x: u32, y: u32) -> Texel;
}

/// GLSL/WGSL `smoothstep`, shared by programs' CPU paths.
///
/// Degenerate edges (`edge0 == edge1`) behave as a step at the edge.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// PCG integer hash; the WGSL programs carry the same function.
pub fn pcg_hash(v: u32) -> u32 {
    let state = v.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Per-texel noise in `[0, 1]` seeded by a frame counter.
pub fn texel_noise(x: u32, y: u32, seed: u32) -> f32 {
    let h = pcg_hash(x ^ pcg_hash(y ^ pcg_hash(seed)));
    h as f32 / u32::MAX as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_matches_reference_points() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reversed_smoothstep_peaks_at_zero_distance() {
        assert_eq!(smoothstep(0.05, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.05, 0.0, 0.06), 0.0);
    }

    #[test]
    fn texel_noise_is_unit_range_and_varies_by_frame() {
        let a = texel_noise(3, 7, 0);
        let b = texel_noise(3, 7, 1);
        assert!((0.0..=1.0).contains(&a));
        assert!((0.0..=1.0).contains(&b));
        assert_ne!(a, b);
    }
}
