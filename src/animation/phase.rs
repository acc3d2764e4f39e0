//! Color wheel phase
//!
//! Linear crossfade between adjacent primaries. The active color fades out
//! while the next one fades in; when the fade completes the next color
//! becomes active and the ramp restarts.

use crate::color::{ColorChannel, Rgb};

/// Position of the color wheel animation.
///
/// Invariant: `current + next == max` after every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationPhase {
    active: ColorChannel,
    current: u8,
    next: u8,
    max: u8,
}

impl AnimationPhase {
    /// Start fully on red
    pub const fn new(max_intensity: u8) -> Self {
        Self {
            active: ColorChannel::Red,
            current: max_intensity,
            next: 0,
            max: max_intensity,
        }
    }

    pub const fn active_color(&self) -> ColorChannel {
        self.active
    }

    /// Intensity of the fading-out color
    pub const fn current(&self) -> u8 {
        self.current
    }

    /// Intensity of the fading-in color
    pub const fn next(&self) -> u8 {
        self.next
    }

    /// Move one step along the wheel.
    ///
    /// The step that completes a crossfade hands over to the next color right
    /// away, so a full turn takes exactly `3 * max` steps and no frame is
    /// rendered twice.
    pub fn advance(&mut self) {
        if self.next < self.max {
            self.next += 1;
            self.current -= 1;
        }
        if self.next == self.max {
            self.active = self.active.next();
            self.current = self.max;
            self.next = 0;
        }
    }

    pub const fn pixel(&self) -> Rgb {
        let (current, next) = (self.current, self.next);
        match self.active {
            ColorChannel::Red => Rgb {
                r: current,
                g: next,
                b: 0,
            },
            ColorChannel::Green => Rgb {
                r: 0,
                g: current,
                b: next,
            },
            ColorChannel::Blue => Rgb {
                r: next,
                g: 0,
                b: current,
            },
        }
    }
}
