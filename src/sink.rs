//! Pixel output
//!
//! [`PixelSink`] is the hardware boundary of the engine. [`SmartLedsSink`]
//! adapts any `smart-leds` driver (RMT, SPI, bit-banged) to it.

use core::fmt;

use smart_leds::SmartLedsWrite;

use crate::color::{BLACK, Rgb};

/// Error reported by a pixel sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelSinkError {
    /// Pixel index is outside of the attached strip
    IndexOutOfRange { index: usize, len: usize },
    /// The driver failed to push the frame to the hardware
    Write,
}

impl fmt::Display for PixelSinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "pixel index {} out of range (len {})", index, len)
            }
            Self::Write => f.write_str("driver write failed"),
        }
    }
}

/// Abstract LED output
///
/// Implement this trait to support different hardware platforms.
/// All calls are expected to be synchronous and short.
pub trait PixelSink {
    /// Stage a color for the pixel at `index`
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), PixelSinkError>;

    /// Push staged pixels to the hardware
    fn refresh(&mut self) -> Result<(), PixelSinkError>;

    /// Turn every pixel off immediately
    fn clear(&mut self) -> Result<(), PixelSinkError>;
}

/// Pixel sink backed by a `smart-leds` writer
///
/// N is the number of LEDs attached to the data line
pub struct SmartLedsSink<W, const N: usize> {
    writer: W,
    frame: [Rgb; N],
}

impl<W, const N: usize> SmartLedsSink<W, N>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            frame: [BLACK; N],
        }
    }

    /// Staged frame, as it will be written on the next refresh
    pub fn frame(&self) -> &[Rgb; N] {
        &self.frame
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_frame(&mut self) -> Result<(), PixelSinkError> {
        self.writer
            .write(self.frame.iter().copied())
            .map_err(|_| PixelSinkError::Write)
    }
}

impl<W, const N: usize> PixelSink for SmartLedsSink<W, N>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), PixelSinkError> {
        let slot = self
            .frame
            .get_mut(index)
            .ok_or(PixelSinkError::IndexOutOfRange { index, len: N })?;
        *slot = color;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), PixelSinkError> {
        self.write_frame()
    }

    fn clear(&mut self) -> Result<(), PixelSinkError> {
        self.frame = [BLACK; N];
        self.write_frame()
    }
}
