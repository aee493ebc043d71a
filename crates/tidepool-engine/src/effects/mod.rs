//! Simulation programs.
//!
//! Each effect supplies only its uniform schema, its shader and a CPU
//! evaluation of that shader; the ping-pong lifecycle lives in [`crate::sim`].

mod trail;
mod water;

pub use trail::{TrailParams, TrailProgram, TrailUniforms};
pub use water::{water_extent, WaterParams, WaterProgram, WaterUniforms, DEFAULT_TEXEL_DENSITY};

use crate::sim::{PingPong, Wgpu};

/// Water simulator holding resources of kind `R`.
pub type WaterSimulation<R = Wgpu> = PingPong<WaterProgram, R>;

/// Trail simulator holding resources of kind `R`.
pub type TrailSimulation<R = Wgpu> = PingPong<TrailProgram, R>;
