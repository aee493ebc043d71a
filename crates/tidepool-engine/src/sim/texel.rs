use super::Extent;

/// One RGBA texel.
pub type Texel = [f32; 4];

/// CPU-side 2D array of RGBA float texels, row-major, origin at `(0, 0)`.
///
/// Backs the software pass backend and is the view programs read the previous
/// frame through when evaluated on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct TexelGrid {
    extent: Extent,
    texels: Vec<Texel>,
}

impl TexelGrid {
    /// Allocates a blank (all zero) grid.
    pub fn zeroed(extent: Extent) -> Self {
        Self {
            extent,
            texels: vec![[0.0; 4]; extent.texel_count()],
        }
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.extent.width as usize + x as usize
    }

    /// Reads a texel. Coordinates outside the grid are clamped to the edge,
    /// matching clamp-to-edge addressing on the GPU.
    pub fn load(&self, x: i64, y: i64) -> Texel {
        let cx = x.clamp(0, self.extent.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.extent.height as i64 - 1) as u32;
        self.texels[self.index(cx, cy)]
    }

    /// Reads a texel by unsigned coordinates (no clamping beyond the grid edge).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Texel {
        self.load(x as i64, y as i64)
    }

    pub fn set(&mut self, x: u32, y: u32, texel: Texel) {
        let i = self.index(x, y);
        self.texels[i] = texel;
    }

    /// Overwrites every texel with `value`.
    pub fn fill(&mut self, value: Texel) {
        self.texels.iter_mut().for_each(|t| *t = value);
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Maximum of one channel over the whole grid.
    pub fn max_channel(&self, channel: usize) -> f32 {
        self.texels
            .iter()
            .map(|t| t[channel])
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// True when every channel of every texel is exactly zero.
    pub fn is_blank(&self) -> bool {
        self.texels.iter().all(|t| t.iter().all(|c| *c == 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_grid_is_blank() {
        let g = TexelGrid::zeroed(Extent::new(3, 2));
        assert!(g.is_blank());
        assert_eq!(g.texels().len(), 6);
    }

    #[test]
    fn load_clamps_out_of_range_coordinates() {
        let mut g = TexelGrid::zeroed(Extent::new(2, 2));
        g.set(0, 0, [1.0, 0.0, 0.0, 0.0]);
        g.set(1, 1, [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(g.load(-5, -1)[0], 1.0);
        assert_eq!(g.load(7, 9)[0], 2.0);
    }

    #[test]
    fn max_channel_reports_peak() {
        let mut g = TexelGrid::zeroed(Extent::new(4, 4));
        g.set(2, 3, [0.0, 0.75, 0.0, 0.0]);
        assert_eq!(g.max_channel(1), 0.75);
        assert!(!g.is_blank());
    }
}
