//! Shared control state
//!
//! The only state shared between the animation loop and the attribute
//! bridge. Every access takes the same critical section and copies a few
//! bytes in or out, so readers never observe a partially written field.

use core::cell::Cell;

use critical_section::Mutex;

use crate::color::{ColorChannel, Rgb};

/// Default step period of the color wheel in milliseconds.
pub const DEFAULT_DELAY_MS: u32 = 50;

/// Default static color.
pub const DEFAULT_COLOR: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Operating mode selected by the step period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Render the stored color as is
    Static,
    /// Run the color wheel, one step every `delay_ms`
    Cycling,
}

impl Mode {
    pub const fn from_delay(delay_ms: u32) -> Self {
        if delay_ms == 0 {
            Self::Static
        } else {
            Self::Cycling
        }
    }
}

/// Copy of every control field taken under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSnapshot {
    pub color: Rgb,
    pub delay_ms: u32,
}

impl ControlSnapshot {
    pub const DEFAULT: Self = Self {
        color: DEFAULT_COLOR,
        delay_ms: DEFAULT_DELAY_MS,
    };

    pub const fn mode(&self) -> Mode {
        Mode::from_delay(self.delay_ms)
    }
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Color channels and animation period of the light.
///
/// Intended to live in a `static` for the lifetime of the firmware and to be
/// shared by reference between the engine and the bridge.
pub struct ControlState {
    inner: Mutex<Cell<ControlSnapshot>>,
}

impl ControlState {
    /// Create a state holding `(0, 0, 0)` and a 50 ms period
    pub const fn new() -> Self {
        Self::with_values(ControlSnapshot::DEFAULT)
    }

    pub const fn with_values(values: ControlSnapshot) -> Self {
        Self {
            inner: Mutex::new(Cell::new(values)),
        }
    }

    /// Get a single color channel
    pub fn channel(&self, channel: ColorChannel) -> u8 {
        channel.of(self.snapshot().color)
    }

    /// Set a single color channel
    pub fn set_channel(&self, channel: ColorChannel, value: u8) {
        self.update(|values| match channel {
            ColorChannel::Red => values.color.r = value,
            ColorChannel::Green => values.color.g = value,
            ColorChannel::Blue => values.color.b = value,
        });
    }

    /// Get the static color
    pub fn color(&self) -> Rgb {
        self.snapshot().color
    }

    /// Get the step period in milliseconds, `0` means static mode
    pub fn delay_ms(&self) -> u32 {
        self.snapshot().delay_ms
    }

    pub fn set_delay_ms(&self, delay_ms: u32) {
        self.update(|values| values.delay_ms = delay_ms);
    }

    /// Copy all fields at once
    pub fn snapshot(&self) -> ControlSnapshot {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    fn update(&self, apply: impl FnOnce(&mut ControlSnapshot)) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut values = cell.get();
            apply(&mut values);
            cell.set(values);
        });
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
