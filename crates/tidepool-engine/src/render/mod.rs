//! GPU rendering subsystem.
//!
//! Simulation passes and consumer surfaces share one full-screen quad and one
//! bind layout convention (uniforms, texture, sampler).
//!
//! Convention:
//! - quad corners are in `0..1` target space (top-left origin, +Y down)
//! - vertex shaders convert to NDC; the corner doubles as the UV

mod ctx;
pub(crate) mod quad;
mod surface_pass;

pub use ctx::{RenderCtx, RenderTarget};
pub use surface_pass::SurfacePass;
