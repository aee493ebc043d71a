use winit::window::WindowId;

use crate::input::InputEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for each translated input event, before the next frame.
    ///
    /// This is where pointer handlers publish into an interaction slot.
    fn on_input(&mut self, window: &WindowCtx<'_>, event: &InputEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called when the window is closed by the user, before teardown.
    fn on_close(&mut self, window_id: WindowId) {
        let _ = window_id;
    }

    /// Called once per render tick.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
