//! Ping-pong simulation core.
//!
//! A simulator owns two equally sized offscreen buffers. Every frame it renders
//! its program from `read` into `write`, swaps them, and publishes `read` as the
//! latest result. Rendering goes through a [`PassBackend`] handed in per frame:
//! [`GpuBackend`] records wgpu passes, [`SoftwareBackend`] evaluates the program
//! on the CPU. A simulator is typed by the backend's [`PassResources`] marker
//! ([`Wgpu`] or [`Software`]), not by the backend borrow.
//!
//! Scheduling is single-threaded: the host calls `advance` once per tick, then
//! consumers sample [`PingPong::output_target`] later in the same tick.

mod backend;
mod extent;
mod gpu;
mod ping_pong;
mod program;
mod software;
mod texel;

pub use backend::{PassBackend, PassResources};
pub use extent::Extent;
pub use gpu::{GpuBackend, GpuProgram, GpuTarget, Wgpu};
pub use ping_pong::{AdvanceOutcome, BufferId, OutputHandle, PingPong};
pub use program::{pcg_hash, smoothstep, texel_noise, Sampling, SimulationProgram};
pub use software::{Software, SoftwareBackend};
pub use texel::{Texel, TexelGrid};
