//! Coordinate rotation utilities
//!
//! Logical coordinates are what drawing code uses; physical coordinates are
//! what the packed frame is addressed with. The physical width `W` and height
//! `H` never change; only the mapping between the two spaces does.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: identity
//! - **Rotate90**: `x' = W - y`, `y' = x`
//! - **Rotate180**: `x' = W - x`, `y' = H - y`
//! - **Rotate270**: `x' = y`, `y' = H - x`
//!
//! The mapping reproduces the panel vendor's reference: a logical point on
//! row 0 under `Rotate90` lands on physical column `W`, which is outside the
//! frame and therefore dropped by absolute addressing.
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{rotation::{to_physical, to_logical}, Dimensions, Rotation};
//!
//! let dims = Dimensions::EPD_1IN54B;
//! let physical = to_physical(10, 20, dims, Rotation::Rotate90);
//! assert_eq!(physical, (180, 10));
//! assert_eq!(to_logical(physical.0, physical.1, dims, Rotation::Rotate90), (10, 20));
//! ```

use crate::config::{Dimensions, Rotation};

/// Map a logical point to physical frame coordinates
///
/// # Arguments
///
/// * `x`, `y` - Logical coordinates
/// * `physical` - Unrotated frame dimensions
/// * `rotation` - Active rotation
pub fn to_physical(x: i32, y: i32, physical: Dimensions, rotation: Rotation) -> (i32, i32) {
    let w = physical.width as i32;
    let h = physical.height as i32;
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (w - y, x),
        Rotation::Rotate180 => (w - x, h - y),
        Rotation::Rotate270 => (y, h - x),
    }
}

/// Map a physical point back to logical coordinates
///
/// Inverse of [`to_physical`] for the same dimensions and rotation.
pub fn to_logical(x: i32, y: i32, physical: Dimensions, rotation: Rotation) -> (i32, i32) {
    let w = physical.width as i32;
    let h = physical.height as i32;
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (y, w - x),
        Rotation::Rotate180 => (w - x, h - y),
        Rotation::Rotate270 => (h - y, x),
    }
}

/// Byte index and bit mask of a physical pixel
///
/// The frame is one continuous MSB-first bit stream, so a pixel's bit number is
/// `x + y * width`. The caller is responsible for bounds checking.
///
/// ```
/// use epd1in54b::rotation::bit_position;
///
/// assert_eq!(bit_position(0, 0, 200), (0, 0x80));
/// assert_eq!(bit_position(7, 0, 200), (0, 0x01));
/// // 3 pixel wide frame: (1, 2) is bit 7
/// assert_eq!(bit_position(1, 2, 3), (0, 0x01));
/// ```
pub fn bit_position(x: u32, y: u32, width: u32) -> (usize, u8) {
    let bit_number = (x as usize) + (y as usize) * (width as usize);
    // Same as `x % 8` whenever the width is byte aligned
    let bit = 0x80 >> (bit_number % 8);
    (bit_number / 8, bit)
}
