/// Simulation resolution in texels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area extent can never back a render target.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn texel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Resolution as the `vec2<f32>` uniform the programs expect.
    #[inline]
    pub fn as_uniform(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Texel containing the normalized coordinate `uv` (clamped to the grid).
    pub fn texel_at(self, uv: [f32; 2]) -> (u32, u32) {
        let x = (uv[0] * self.width as f32).floor().max(0.0) as u32;
        let y = (uv[1] * self.height as f32).floor().max(0.0) as u32;
        (
            x.min(self.width.saturating_sub(1)),
            y.min(self.height.saturating_sub(1)),
        )
    }

    /// Normalized coordinate of a texel center.
    #[inline]
    pub fn texel_center(self, x: u32, y: u32) -> [f32; 2] {
        [
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_is_invalid() {
        assert!(!Extent::new(0, 4).is_valid());
        assert!(!Extent::new(4, 0).is_valid());
        assert!(Extent::new(1, 1).is_valid());
    }

    #[test]
    fn texel_at_clamps_to_grid() {
        let e = Extent::new(64, 32);
        assert_eq!(e.texel_at([0.5, 0.5]), (32, 16));
        assert_eq!(e.texel_at([1.0, 1.0]), (63, 31));
        assert_eq!(e.texel_at([-0.2, 0.0]), (0, 0));
    }

    #[test]
    fn texel_center_round_trips_through_texel_at() {
        let e = Extent::new(10, 5);
        for (x, y) in [(0, 0), (9, 4), (3, 2)] {
            assert_eq!(e.texel_at(e.texel_center(x, y)), (x, y));
        }
    }
}
