use anyhow::Result;

use super::{Extent, PassBackend, PassResources, SimulationProgram, TexelGrid};

/// CPU pass backend.
///
/// Targets are plain [`TexelGrid`]s and a full-screen draw evaluates the
/// program's `shade` for every texel. Runs headless, so it is what tests and
/// offline tools drive simulators with.
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    fail_allocations: bool,
    draws: u64,
    allocations: u64,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create_target` fail until switched off again.
    pub fn fail_allocations(&mut self, fail: bool) {
        self.fail_allocations = fail;
    }

    /// Full-screen draws executed so far.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Targets successfully allocated so far.
    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}

/// Resources of [`SoftwareBackend`]: texel grids and no per-program state.
#[derive(Debug)]
pub enum Software {}

impl PassResources for Software {
    type Target = TexelGrid;
    type Program = ();
}

impl PassBackend<Software> for SoftwareBackend {
    fn create_program<P: SimulationProgram>(&mut self) -> Result<()> {
        Ok(())
    }

    fn create_target<P: SimulationProgram>(&mut self, label: &str, extent: Extent) -> Result<TexelGrid> {
        anyhow::ensure!(!self.fail_allocations, "out of memory allocating {label}");
        anyhow::ensure!(
            extent.is_valid(),
            "{label}: zero-sized target {}x{}",
            extent.width,
            extent.height
        );

        self.allocations += 1;
        Ok(TexelGrid::zeroed(extent))
    }

    fn draw_fullscreen<P: SimulationProgram>(
        &mut self,
        _program: &mut (),
        uniforms: &P::Uniforms,
        source: &TexelGrid,
        dest: &mut TexelGrid,
    ) {
        debug_assert_eq!(source.extent(), dest.extent());

        dest.fill([0.0; 4]);

        let extent = dest.extent();
        for y in 0..extent.height {
            for x in 0..extent.width {
                dest.set(x, y, P::shade(uniforms, source, x, y));
            }
        }

        self.draws += 1;
    }
}
