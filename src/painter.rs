//! Drawing session and rasterization primitives
//!
//! A [`Painter`] holds the state shared by every plane of one drawing session:
//! the fixed physical dimensions, the active [`Rotation`] and the logical
//! dimensions derived from the two. Planes are passed to each call by mutable
//! reference and are never retained, so the same painter draws on the black
//! and the red [`FrameBuffer`].
//!
//! All primitives take logical coordinates. Anything falling outside the
//! logical frame is silently skipped, which lets shapes hang off the edges of
//! the panel.
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{Color, Dimensions, FrameBuffer, Painter, Rotation};
//!
//! let dims = Dimensions::EPD_1IN54B;
//! let mut black = [0xFFu8; 5000];
//! let mut red = [0xFFu8; 5000];
//! let (Ok(mut black), Ok(mut red)) = (
//!     FrameBuffer::new(&mut black[..], dims),
//!     FrameBuffer::new(&mut red[..], dims),
//! ) else {
//!     return;
//! };
//!
//! let mut painter = Painter::new(dims);
//! painter.draw_rectangle(&mut black, 10, 60, 50, 110, Color::Colored);
//! painter.draw_line(&mut black, 10, 60, 50, 110, Color::Colored);
//! painter.draw_filled_circle(&mut red, 120, 150, 30, Color::Colored);
//!
//! painter.set_rotation(Rotation::Rotate90);
//! painter.draw_filled_rectangle(&mut red, 0, 0, 20, 20, Color::Colored);
//! ```

use crate::buffer::FrameBuffer;
use crate::color::Color;
use crate::config::{Config, Dimensions, Rotation};
use crate::error::BuilderError;
use crate::font::Font;
use crate::rotation::to_physical;

/// Rotation-aware drawing session over one or more planes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Painter {
    /// Physical (unrotated) dimensions, fixed for the session
    dimensions: Dimensions,
    /// Active rotation
    rotation: Rotation,
    /// Dimensions seen by drawing code, recomputed on every rotation change
    logical: Dimensions,
}

impl Painter {
    /// Start a session over planes of the given physical dimensions
    pub fn new(dimensions: Dimensions) -> Self {
        Self::from_config(&Config {
            dimensions,
            rotation: Rotation::Rotate0,
        })
    }

    /// Start a session from a built configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            dimensions: config.dimensions,
            rotation: config.rotation,
            logical: config.rotated_dimensions(),
        }
    }

    /// Change the rotation used by subsequent drawing
    ///
    /// Pixels already drawn stay where they are.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.logical = if rotation.is_transposed() {
            self.dimensions.transposed()
        } else {
            self.dimensions
        };
        log::debug!(
            "rotation set to {} degrees, logical size {}x{}",
            rotation.degrees(),
            self.logical.width,
            self.logical.height
        );
    }

    /// Change the rotation from a vendor orientation index (0..=3)
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidRotation` for unknown indices; the current
    /// rotation is kept in that case.
    pub fn set_rotation_index(&mut self, index: u8) -> Result<(), BuilderError> {
        let rotation = Rotation::try_from(index)?;
        self.set_rotation(rotation);
        Ok(())
    }

    /// Active rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Physical dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Logical dimensions under the active rotation
    pub fn logical_dimensions(&self) -> Dimensions {
        self.logical
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.logical.width as i32 && y < self.logical.height as i32
    }

    /// Set a pixel in logical coordinates
    ///
    /// Points outside the logical frame are ignored.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on (black or red)
    /// * `x`, `y` - Logical coordinates
    /// * `color` - `Colored` clears the bit, `Uncolored` sets it
    pub fn set_pixel<B>(&self, frame: &mut FrameBuffer<B>, x: i32, y: i32, color: Color)
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if !self.contains(x, y) {
            return;
        }
        let (px, py) = to_physical(x, y, self.dimensions, self.rotation);
        frame.set_absolute_pixel(px, py, color);
    }

    /// Read a pixel in logical coordinates
    ///
    /// Returns `None` outside the logical frame, and for the points the
    /// rotation maps past the physical edge.
    pub fn pixel<B>(&self, frame: &FrameBuffer<B>, x: i32, y: i32) -> Option<Color>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if !self.contains(x, y) {
            return None;
        }
        let (px, py) = to_physical(x, y, self.dimensions, self.rotation);
        frame.pixel(px, py)
    }

    /// Draw a line between two points, both ends included
    ///
    /// Horizontal and vertical lines are drawn with the dedicated primitives;
    /// everything else uses Bresenham's algorithm.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `x0`, `y0` - Start point
    /// * `x1`, `y1` - End point
    /// * `color` - Pixel state to write
    pub fn draw_line<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if y0 == y1 {
            let length = x0.abs_diff(x1).saturating_add(1);
            self.draw_horizontal_line(frame, x0.min(x1), y0, length, color);
            return;
        }
        if x0 == x1 {
            let length = y0.abs_diff(y1).saturating_add(1);
            self.draw_vertical_line(frame, x0, y0.min(y1), length, color);
            return;
        }

        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = -(i64::from(y1) - i64::from(y0)).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(frame, x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw `length` pixels to the right of `(x, y)`, starting point included
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `x`, `y` - Leftmost point
    /// * `length` - Number of pixels; 0 draws nothing
    /// * `color` - Pixel state to write
    pub fn draw_horizontal_line<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        length: u32,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if y < 0 || y >= self.logical.height as i32 {
            return;
        }
        let (start, end) = clip_span(x, length, self.logical.width);
        for column in start..end {
            self.set_pixel(frame, column, y, color);
        }
    }

    /// Draw `length` pixels downwards from `(x, y)`, starting point included
    pub fn draw_vertical_line<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        length: u32,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if x < 0 || x >= self.logical.width as i32 {
            return;
        }
        let (start, end) = clip_span(y, length, self.logical.height);
        for row in start..end {
            self.set_pixel(frame, x, row, color);
        }
    }

    /// Draw the outline of the rectangle spanned by two corners, edges included
    ///
    /// The corners may be given in any order.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `x0`, `y0` - One corner
    /// * `x1`, `y1` - Opposite corner
    /// * `color` - Pixel state to write
    pub fn draw_rectangle<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        let width = min_x.abs_diff(max_x).saturating_add(1);
        let height = min_y.abs_diff(max_y).saturating_add(1);

        self.draw_horizontal_line(frame, min_x, min_y, width, color);
        self.draw_horizontal_line(frame, min_x, max_y, width, color);
        self.draw_vertical_line(frame, min_x, min_y, height, color);
        self.draw_vertical_line(frame, max_x, min_y, height, color);
    }

    /// Fill the rectangle spanned by two corners, edges included
    pub fn draw_filled_rectangle<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        let height = min_y.abs_diff(max_y).saturating_add(1);
        let (start, end) = clip_range(x0.min(x1), x0.max(x1), self.logical.width);

        for column in start..end {
            self.draw_vertical_line(frame, column, min_y, height, color);
        }
    }

    /// Draw a circle outline around `(x, y)`
    ///
    /// Nothing is drawn when the center lies right of or below the logical
    /// frame. Centers left of or above it are still drawn, clipped.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `x`, `y` - Center
    /// * `radius` - Radius in pixels
    /// * `color` - Pixel state to write
    pub fn draw_circle<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        radius: u16,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.circle(frame, x, y, radius, color, false);
    }

    /// Draw a filled disc around `(x, y)`
    ///
    /// Uses the same center check as [`draw_circle`](Self::draw_circle).
    pub fn draw_filled_circle<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        radius: u16,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.circle(frame, x, y, radius, color, true);
    }

    fn circle<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        radius: u16,
        color: Color,
        filled: bool,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        if x >= self.logical.width as i32 || y >= self.logical.height as i32 {
            return;
        }

        let mut x_pos = -i32::from(radius);
        let mut y_pos = 0i32;
        let mut err = 2 - 2 * i32::from(radius);

        loop {
            self.set_pixel(frame, x.saturating_sub(x_pos), y.saturating_add(y_pos), color);
            self.set_pixel(frame, x.saturating_add(x_pos), y.saturating_add(y_pos), color);
            self.set_pixel(frame, x.saturating_add(x_pos), y.saturating_sub(y_pos), color);
            self.set_pixel(frame, x.saturating_sub(x_pos), y.saturating_sub(y_pos), color);
            if filled {
                let span = (2 * -x_pos + 1) as u32;
                let left = x.saturating_add(x_pos);
                self.draw_horizontal_line(frame, left, y.saturating_add(y_pos), span, color);
                self.draw_horizontal_line(frame, left, y.saturating_sub(y_pos), span, color);
            }

            let mut e2 = err;
            if e2 <= y_pos {
                y_pos += 1;
                err += y_pos * 2 + 1;
                if -x_pos == y_pos && e2 <= x_pos {
                    e2 = 0;
                }
            }
            if e2 > x_pos {
                x_pos += 1;
                err += x_pos * 2 + 1;
            }
            if x_pos > 0 {
                break;
            }
        }
    }

    /// Draw one character with its top-left corner at `(x, y)`
    ///
    /// Only set glyph bits are drawn; the glyph background is left untouched.
    /// Characters the font does not cover draw nothing.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `x`, `y` - Top-left corner of the glyph cell
    /// * `c` - Character to draw
    /// * `font` - Glyph table
    /// * `color` - State written for set glyph bits
    pub fn draw_char<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        c: char,
        font: &Font<'_>,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let stride = font.bytes_per_row();
        if stride == 0 {
            return;
        }
        let Some(glyph) = font.glyph(c) else {
            return;
        };

        for (row, bits) in glyph.chunks(stride).enumerate() {
            for column in 0..font.width as usize {
                if bits[column / 8] & (0x80 >> (column % 8)) != 0 {
                    self.set_pixel(
                        frame,
                        x.saturating_add(column as i32),
                        y.saturating_add(row as i32),
                        color,
                    );
                }
            }
        }
    }

    /// Draw a string on one line, advancing by the font width per character
    ///
    /// There is no wrapping; text running off the frame is clipped.
    pub fn draw_string<B>(
        &self,
        frame: &mut FrameBuffer<B>,
        x: i32,
        y: i32,
        text: &str,
        font: &Font<'_>,
        color: Color,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let mut column = x;
        for c in text.chars() {
            self.draw_char(frame, column, y, c, font, color);
            column = column.saturating_add(i32::from(font.width));
        }
    }
}

/// Visible part `[start, end)` of `length` pixels starting at `start`
fn clip_span(start: i32, length: u32, limit: u16) -> (i32, i32) {
    let end = (i64::from(start) + i64::from(length)).min(i64::from(limit));
    (start.max(0), end as i32)
}

/// Visible part `[start, end)` of the inclusive range `min..=max`
fn clip_range(min: i32, max: i32, limit: u16) -> (i32, i32) {
    let end = (i64::from(max) + 1).min(i64::from(limit));
    (min.max(0), end as i32)
}
