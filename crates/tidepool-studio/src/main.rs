mod app;
mod config;
mod controls;
mod pages;

use anyhow::Result;
use winit::dpi::LogicalSize;

use tidepool_engine::device::GpuInit;
use tidepool_engine::logging::{init_logging, LoggingConfig};
use tidepool_engine::window::{Runtime, RuntimeConfig};

use crate::app::Studio;
use crate::config::StudioConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = StudioConfig::from_args(std::env::args().skip(1))?;

    log::info!(
        "controls: Q/A time step, W/S damping, E/D pressure damping, Z/X width, C/V height, \
         R/F fade, T/G influence size, Y/H threshold, Esc quits"
    );

    let runtime = RuntimeConfig {
        title: config.title(),
        initial_size: LogicalSize::new(config.width, config.height),
    };

    Runtime::run(runtime, GpuInit::default(), Studio::new(&config))
}
