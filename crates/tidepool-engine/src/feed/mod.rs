//! Uniform feed.
//!
//! Carries externally owned interaction state and tunables into a simulation
//! program's uniform block, once per frame, without smoothing or queuing.

mod interaction;

pub use interaction::{InteractionSample, InteractionSlot};

use crate::sim::Extent;

/// Everything a program may read when building its uniforms for one pass.
///
/// `frame` is the simulator's running pass counter. Only the water program
/// reads it, as a noise seed; it restarts at zero after a resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeedInputs<P> {
    pub resolution: Extent,
    pub interaction: InteractionSample,
    pub params: P,
    pub frame: u32,
}
