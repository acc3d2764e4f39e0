use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Output with every channel off.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// One of the three primary channels of the light.
///
/// Selects a field of [`ControlState`](crate::ControlState) and doubles as the
/// active color of the color wheel animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorChannel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl ColorChannel {
    /// Next channel around the wheel: red, green, blue, red...
    pub const fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Read this channel out of a color
    pub const fn of(self, color: Rgb) -> u8 {
        match self {
            Self::Red => color.r,
            Self::Green => color.g,
            Self::Blue => color.b,
        }
    }
}
