use anyhow::Result;

use super::{Extent, SimulationProgram};

/// Resource types a renderer allocates for simulators.
///
/// Implemented by lifetime-free marker types so a simulator can keep its
/// buffers across frames while the backend itself is borrowed per frame.
pub trait PassResources {
    /// Offscreen color buffer.
    type Target;

    /// Per-program state that outlives a frame (pipelines, uniform buffers).
    type Program;
}

/// Capability a simulator needs from the renderer: allocate offscreen targets
/// and run one full-screen draw of a program against one of them.
///
/// Backends are borrowed per frame and handed to
/// [`PingPong::advance`](super::PingPong::advance); simulators never hold one.
pub trait PassBackend<R: PassResources> {
    fn create_program<P: SimulationProgram>(&mut self) -> Result<R::Program>;

    /// Allocates a blank target. Failure leaves the caller's state untouched.
    fn create_target<P: SimulationProgram>(&mut self, label: &str, extent: Extent)
    -> Result<R::Target>;

    /// Clears `dest`, binds `source` and `uniforms`, and draws the program once
    /// over the whole of `dest`.
    ///
    /// `source` and `dest` are always distinct buffers of the same extent.
    fn draw_fullscreen<P: SimulationProgram>(
        &mut self,
        program: &mut R::Program,
        uniforms: &P::Uniforms,
        source: &R::Target,
        dest: &mut R::Target,
    );
}
