//! Tidepool engine crate.
//!
//! Ping-pong GPU simulations (water ripples, pointer trail), the per-frame
//! uniform feed that drives them, and the platform + GPU runtime that hosts
//! the consumer surfaces.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;

pub mod sim;
pub mod feed;
pub mod effects;
