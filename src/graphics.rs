//! Graphics support via embedded-graphics
//!
//! This module provides the [`GraphicDisplay`] struct which pairs a
//! [`Painter`] with the black and red planes of the panel and implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait from
//! the embedded-graphics ecosystem.
//!
//! Pixels go through the painter, so embedded-graphics drawing honours the
//! active rotation and is clipped to the logical frame exactly like the
//! native primitives.
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//! };
//! use epd1in54b::{Dimensions, GraphicDisplay, TriColor};
//!
//! let mut black = [0u8; 5000];
//! let mut red = [0u8; 5000];
//! let dims = Dimensions::EPD_1IN54B;
//! let mut display = match GraphicDisplay::new(dims, &mut black[..], &mut red[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! display.clear_planes();
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(TriColor::Black))
//!     .draw(&mut display);
//! let _ = Circle::new(Point::new(100, 100), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(TriColor::Red, 2))
//!     .draw(&mut display);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::buffer::FrameBuffer;
use crate::color::TriColor;
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::painter::Painter;

/// Black/red plane pair with embedded-graphics support
///
/// `B1` and `B2` are the storage types of the black and red planes; any
/// `AsRef<[u8]> + AsMut<[u8]>` works, including `&mut [u8]`.
pub struct GraphicDisplay<B1, B2> {
    painter: Painter,
    black: FrameBuffer<B1>,
    red: FrameBuffer<B2>,
}

impl<B1, B2> GraphicDisplay<B1, B2>
where
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a display over caller-provided plane storage
    ///
    /// Both buffers must hold at least `dimensions.buffer_size()` bytes. Their
    /// contents are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if either buffer is too short.
    pub fn new(dimensions: Dimensions, black: B1, red: B2) -> Result<Self, Error> {
        Self::from_config(
            &Config {
                dimensions,
                rotation: Rotation::Rotate0,
            },
            black,
            red,
        )
    }

    /// Create a display with the dimensions and rotation of a [`Config`]
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if either buffer is too short.
    pub fn from_config(config: &Config, black: B1, red: B2) -> Result<Self, Error> {
        Ok(Self {
            painter: Painter::from_config(config),
            black: FrameBuffer::new(black, config.dimensions)?,
            red: FrameBuffer::new(red, config.dimensions)?,
        })
    }

    /// Reset both planes to background
    pub fn clear_planes(&mut self) {
        self.black.clear();
        self.red.clear();
    }

    /// Drawing session shared by both planes
    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    /// Mutable access to the drawing session
    pub fn painter_mut(&mut self) -> &mut Painter {
        &mut self.painter
    }

    /// Change the rotation used for subsequent drawing
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.painter.set_rotation(rotation);
    }

    /// Black plane
    pub fn black(&self) -> &FrameBuffer<B1> {
        &self.black
    }

    /// Mutable black plane, for the native primitives
    pub fn black_mut(&mut self) -> &mut FrameBuffer<B1> {
        &mut self.black
    }

    /// Red plane
    pub fn red(&self) -> &FrameBuffer<B2> {
        &self.red
    }

    /// Mutable red plane, for the native primitives
    pub fn red_mut(&mut self) -> &mut FrameBuffer<B2> {
        &mut self.red
    }

    /// Painter and both planes at once
    pub fn split(&mut self) -> (&Painter, &mut FrameBuffer<B1>, &mut FrameBuffer<B2>) {
        (&self.painter, &mut self.black, &mut self.red)
    }

    /// Release the plane storage
    pub fn into_planes(self) -> (B1, B2) {
        (self.black.into_inner(), self.red.into_inner())
    }

    /// Color at a logical point, `None` outside the frame
    pub fn pixel(&self, x: i32, y: i32) -> Option<TriColor> {
        let black = self.painter.pixel(&self.black, x, y)?;
        let red = self.painter.pixel(&self.red, x, y)?;
        Some(if red.is_colored() {
            TriColor::Red
        } else if black.is_colored() {
            TriColor::Black
        } else {
            TriColor::White
        })
    }
}

impl<B1, B2> DrawTarget for GraphicDisplay<B1, B2>
where
    B1: AsRef<[u8]> + AsMut<[u8]>,
    B2: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = TriColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.painter.set_pixel(&mut self.black, x, y, color.black_plane());
            self.painter.set_pixel(&mut self.red, x, y, color.red_plane());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.black.fill(color.black_plane());
        self.red.fill(color.red_plane());
        Ok(())
    }
}

impl<B1, B2> OriginDimensions for GraphicDisplay<B1, B2> {
    fn size(&self) -> Size {
        let logical = self.painter.logical_dimensions();
        Size::new(logical.width as u32, logical.height as u32)
    }
}
