//! Pixel colors for monochrome panels
//!
//! The controller reads one bit per pixel from the new-data plane: a set bit
//! is black, a clear bit is white.
//!
//! ## Example
//!
//! ```
//! use uc8179::Color;
//!
//! assert_eq!(Color::Black.plane_byte(), 0xFF);
//! assert_eq!(Color::White.plane_byte(), 0x00);
//! ```

/// Colors supported by UC8179 monochrome panels
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Byte that fills eight pixels of the new-data plane with this color
    pub fn plane_byte(self) -> u8 {
        match self {
            Self::Black => 0xFF,
            Self::White => 0x00,
        }
    }

    /// Whether the pixel bit is set for this color
    pub fn is_ink(self) -> bool {
        self == Self::Black
    }
}
