#![no_std]

//! Control plane of a single BLE-controlled RGB light.
//!
//! A [`ControlState`] is shared between the [`AnimationEngine`], which renders
//! it onto a [`PixelSink`] in a periodic loop, and the [`ControlBridge`], which
//! serves remote attribute reads and writes.

pub mod animation;
pub mod bridge;
pub mod color;
pub mod config;
pub mod sink;
pub mod state;

pub use animation::{AnimationEngine, AnimationPhase, TickResult};
pub use bridge::{AttributeError, AttributeId, ControlAttribute, ControlBridge, Registration};
pub use color::{ColorChannel, Rgb};
pub use config::EngineConfig;
pub use sink::{PixelSink, PixelSinkError, SmartLedsSink};
pub use state::{ControlSnapshot, ControlState, Mode};

pub use embassy_time::Duration;

/// Route `log` output to the ESP serial console
#[cfg(feature = "esp32-log")]
pub fn init_logger() {
    esp_println::logger::init_logger_from_env();
}
