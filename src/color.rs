//! Color types for black/red e-paper displays
//!
//! Every plane is a packed 1-bit image where a **cleared** bit means ink is
//! present and a **set** bit means background. [`Color`] describes one plane,
//! [`TriColor`] describes the composite seen on the panel.
//!
//! | TriColor | Black plane bit | Red plane bit |
//! |----------|-----------------|---------------|
//! | White    | 1               | 1             |
//! | Black    | 0               | 1             |
//! | Red      | 1               | 0             |
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{Color, TriColor};
//!
//! assert_eq!(Color::Colored.byte(), 0x00);
//! assert_eq!(Color::Uncolored.byte(), 0xFF);
//!
//! assert_eq!(TriColor::Red.black_plane(), Color::Uncolored);
//! assert_eq!(TriColor::Red.red_plane(), Color::Colored);
//! ```

/// Per-plane pixel state
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Ink present (bit cleared)
    Colored,
    /// Background (bit set)
    #[default]
    Uncolored,
}

impl Color {
    /// Byte value with all eight pixels in this state
    pub fn byte(self) -> u8 {
        match self {
            Self::Colored => 0x00,
            Self::Uncolored => 0xFF,
        }
    }

    /// Whether ink is present
    pub fn is_colored(self) -> bool {
        self == Self::Colored
    }
}

impl From<bool> for Color {
    fn from(colored: bool) -> Self {
        if colored {
            Self::Colored
        } else {
            Self::Uncolored
        }
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        Self::from(color.is_on())
    }
}

/// Colors shown by the black/red panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TriColor {
    /// Background on both planes
    #[default]
    White,
    /// Ink on the black plane
    Black,
    /// Ink on the red plane
    Red,
}

impl TriColor {
    /// State of the black plane for this color
    pub fn black_plane(self) -> Color {
        match self {
            Self::Black => Color::Colored,
            Self::White | Self::Red => Color::Uncolored,
        }
    }

    /// State of the red plane for this color
    pub fn red_plane(self) -> Color {
        match self {
            Self::Red => Color::Colored,
            Self::White | Self::Black => Color::Uncolored,
        }
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for TriColor {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}
