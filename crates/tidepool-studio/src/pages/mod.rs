//! Effect pages: one simulator plus the consumer surface that samples it.

mod glitch;
mod water;

pub use glitch::GlitchPage;
pub use water::WaterPage;

use tidepool_engine::core::{AppControl, FrameCtx};
use tidepool_engine::feed::InteractionSample;
use tidepool_engine::input::Key;

use crate::config::PageKind;

pub trait Page {
    fn kind(&self) -> PageKind;

    /// Maps a window UV to the simulation UV under the pointer, if any.
    fn pointer_uv(&self, window_uv: [f32; 2], window_size: (f32, f32)) -> Option<[f32; 2]>;

    /// Handles a control key. Returns whether it was consumed.
    fn on_key(&mut self, key: Key) -> bool;

    /// Advances the simulator once and draws the consumer surface.
    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>, interaction: InteractionSample) -> AppControl;
}

pub fn create(kind: PageKind) -> Box<dyn Page> {
    match kind {
        PageKind::Water => Box::new(WaterPage::new()),
        PageKind::Glitch => Box::new(GlitchPage::new()),
    }
}

/// Straight-alpha RGB from a `0xRRGGBB` literal.
pub(crate) const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_wgsl(name: &str, source: &str) {
        let module = match naga::front::wgsl::parse_str(source) {
            Ok(module) => module,
            Err(err) => panic!("{name}: {}", err.emit_to_string(source)),
        };
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        if let Err(err) = validator.validate(&module) {
            panic!("{name}: {}", err.emit_to_string(source));
        }
    }

    #[test]
    fn consumer_shaders_are_valid() {
        assert_valid_wgsl(
            "water surface",
            include_str!("../shaders/water_surface.wgsl"),
        );
        assert_valid_wgsl(
            "sorting plane",
            include_str!("../shaders/sorting_plane.wgsl"),
        );
    }

    #[test]
    fn rgb_unpacks_channels() {
        assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb(0x00aaff), [0.0, 170.0 / 255.0, 1.0]);
    }
}
