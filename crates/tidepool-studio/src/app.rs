use tidepool_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use tidepool_engine::feed::InteractionSlot;
use tidepool_engine::input::{
    InputEvent, InputFrame, Key, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

use crate::config::StudioConfig;
use crate::pages::{self, Page};

/// Studio application: one page plus the pointer slot feeding it.
pub struct Studio {
    page: Box<dyn Page>,
    interaction: InteractionSlot,
}

impl Studio {
    pub fn new(config: &StudioConfig) -> Self {
        log::info!("opening {} page", config.page);
        Self {
            page: pages::create(config.page),
            interaction: InteractionSlot::new(),
        }
    }

    /// Applies this frame's key presses. Returns `false` when Escape was hit.
    fn apply_keys(&mut self, input: &InputFrame) -> bool {
        if input.key_pressed(Key::Escape) {
            return false;
        }
        for key in input.pressed_keys() {
            if !self.page.on_key(key) {
                log::trace!("{} page ignores {key:?}", self.page.kind());
            }
        }
        true
    }

    fn simulation_uv(&self, window: &WindowCtx<'_>, x: f32, y: f32) -> Option<[f32; 2]> {
        let uv = window.to_uv(x, y)?;
        self.page.pointer_uv(uv, window.logical_size())
    }
}

impl App for Studio {
    fn on_input(&mut self, window: &WindowCtx<'_>, event: &InputEvent) -> AppControl {
        match event {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if let Some(uv) = self.simulation_uv(window, *x, *y) {
                    self.interaction.set_position(uv);
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => match state {
                MouseButtonState::Pressed => {
                    // Presses off the surface do not disturb it.
                    if let Some(uv) = self.simulation_uv(window, *x, *y) {
                        self.interaction.set_position(uv);
                        self.interaction.set_active(true);
                    }
                }
                MouseButtonState::Released => self.interaction.set_active(false),
            },

            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.interaction.set_active(false);
            }

            _ => {}
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.apply_keys(ctx.input_frame) {
            ctx.runtime.exit();
            return AppControl::Continue;
        }

        // One consistent sample for the whole tick.
        let interaction = self.interaction.latch();
        self.page.frame(ctx, interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(keys: &[Key]) -> InputFrame {
        let mut input = InputFrame::default();
        input.keys_pressed.extend(keys.iter().copied());
        input
    }

    #[test]
    fn escape_in_the_frame_requests_exit() {
        let mut studio = Studio::new(&StudioConfig::default());
        assert!(!studio.apply_keys(&pressed(&[Key::Escape, Key::Z])));
    }

    #[test]
    fn control_keys_keep_running() {
        let mut studio = Studio::new(&StudioConfig::default());
        assert!(studio.apply_keys(&pressed(&[Key::Z, Key::Digit1])));
        assert!(studio.apply_keys(&InputFrame::default()));
    }
}
