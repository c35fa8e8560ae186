//! Drawing core for the 1.54" black/red e-paper panel
//!
//! Renders lines, rectangles, circles, bitmap-font text and monochrome BMP
//! images into the two bit-packed planes (black and red) of a 200x200
//! tri-color panel, with rotation support. The finished planes are handed to
//! a panel driver through the [`DisplayInterface`] transport contract.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation required
//! - `embedded-hal` v1.0 transport ([`Interface`])
//! - `embedded-io` sources for bitmap decoding
//! - `embedded-graphics` integration (with `graphics` feature)
//! - `alloc`: heap-allocated planes
//! - `std`: bitmap loading from the filesystem
//!
//! ## Usage
//!
//! ```rust
//! use epd1in54b::{Builder, Color, Font, FrameBuffer, Painter, Rotation};
//!
//! let config = Builder::new().rotation(Rotation::Rotate90).build();
//! let mut storage = [0u8; 5000];
//! let mut black = match FrameBuffer::new(&mut storage[..], config.dimensions) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//! black.clear();
//!
//! // 8x1 font holding a single glyph for ' ' (a full bar)
//! const BAR: [u8; 1] = [0xFF];
//! let font = Font::new(8, 1, &BAR);
//!
//! let painter = Painter::from_config(&config);
//! painter.draw_string(&mut black, 4, 4, "  ", &font, Color::Colored);
//! painter.draw_circle(&mut black, 100, 100, 40, Color::Colored);
//! assert_eq!(painter.pixel(&black, 4, 4), Some(Color::Colored));
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Monochrome bitmap decoding
pub mod bmp;
/// Packed single-plane frame buffer
pub mod buffer;
/// Pixel colors for the black and red planes
pub mod color;
/// Panel configuration types and builder
pub mod config;
/// Error types for the crate
pub mod error;
/// Fixed-size bitmap font contract
pub mod font;
/// Hardware interface abstraction
pub mod interface;
/// Rasterization primitives
pub mod painter;
/// Coordinate rotation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use bmp::{BitmapHeader, BitmapHeaderInfo, InvalidSeek, SliceReader, VisibleRegion};
#[cfg(feature = "std")]
pub use bmp::{FileError, FileSource};
pub use buffer::FrameBuffer;
pub use color::{Color, TriColor};
pub use config::{Builder, Config, Dimensions, HEIGHT, Rotation, WIDTH};
pub use error::{BitmapError, BuilderError, Error, FormatError};
pub use font::Font;
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use painter::Painter;

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
