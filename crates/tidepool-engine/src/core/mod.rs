//! Contract between the runtime (platform loop) and the application.
//!
//! The runtime owns the window, the GPU context and the frame clock; the
//! application sees one `FrameCtx` per tick and raw window events in between.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
