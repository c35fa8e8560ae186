//! Packed single-plane frame buffer
//!
//! A [`FrameBuffer`] is one plane (black or red) of the panel image: a
//! row-major, MSB-first bit stream of `width * height` pixels where a cleared
//! bit is ink and a set bit is background. It is addressed in **physical**
//! coordinates only; rotation is applied by the [`Painter`](crate::Painter)
//! before a pixel reaches the buffer.
//!
//! The storage is anything that can be borrowed as a byte slice, so the same
//! type works over a heap `Vec<u8>`, a static array or a `&mut [u8]` owned by
//! the caller.
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{Color, Dimensions, FrameBuffer};
//!
//! let dims = Dimensions::EPD_1IN54B;
//! let mut storage = [0u8; 5000];
//! let mut frame = match FrameBuffer::new(&mut storage[..], dims) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//! frame.clear();
//! frame.set_absolute_pixel(9, 0, Color::Colored);
//! assert_eq!(frame.as_bytes()[1], 0b1011_1111);
//! ```

use crate::color::Color;
use crate::config::Dimensions;
use crate::error::Error;
use crate::rotation::bit_position;

/// Byte value of an all-background plane
pub const BACKGROUND: u8 = 0xFF;

/// One bit-packed plane of the panel image
#[derive(Clone, Debug)]
pub struct FrameBuffer<B> {
    /// Packed pixel storage, at least `dimensions.buffer_size()` bytes
    storage: B,
    /// Physical (unrotated) dimensions
    dimensions: Dimensions,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap caller-provided storage
    ///
    /// The contents are left untouched; call [`clear`](Self::clear) to start
    /// from an all-background plane.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if the storage is shorter than
    /// `dimensions.buffer_size()`.
    pub fn new(storage: B, dimensions: Dimensions) -> Result<Self, Error> {
        let required = dimensions.buffer_size();
        let provided = storage.as_ref().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        Ok(Self {
            storage,
            dimensions,
        })
    }

    /// Physical dimensions of the plane
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Reset every pixel to background (`0xFF`)
    pub fn clear(&mut self) {
        self.fill(Color::Uncolored);
    }

    /// Set every pixel to the same state
    pub fn fill(&mut self, color: Color) {
        let size = self.dimensions.buffer_size();
        self.storage.as_mut()[..size].fill(color.byte());
    }

    /// Set a pixel in physical coordinates
    ///
    /// Coordinates outside the physical frame are ignored.
    pub fn set_absolute_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, bit)) = self.locate(x, y) else {
            return;
        };
        let byte = &mut self.storage.as_mut()[index];
        match color {
            Color::Colored => *byte &= !bit,
            Color::Uncolored => *byte |= bit,
        }
    }

    /// Read a pixel in physical coordinates
    ///
    /// Returns `None` outside the physical frame.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (index, bit) = self.locate(x, y)?;
        let colored = self.storage.as_ref()[index] & bit == 0;
        Some(Color::from(colored))
    }

    /// Packed bytes in transmission order, exactly `buffer_size()` long
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.as_ref()[..self.dimensions.buffer_size()]
    }

    /// Mutable access to the packed bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size = self.dimensions.buffer_size();
        &mut self.storage.as_mut()[..size]
    }

    /// Release the underlying storage
    pub fn into_inner(self) -> B {
        self.storage
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let width = self.dimensions.width as i32;
        let height = self.dimensions.height as i32;
        if x < 0 || x >= width || y < 0 || y >= height {
            return None;
        }
        Some(bit_position(x as u32, y as u32, width as u32))
    }
}

#[cfg(feature = "alloc")]
impl FrameBuffer<alloc::vec::Vec<u8>> {
    /// Allocate a background-filled plane on the heap
    ///
    /// ```
    /// use epd1in54b::{Dimensions, FrameBuffer};
    ///
    /// let frame = FrameBuffer::allocate(Dimensions::EPD_1IN54B);
    /// assert_eq!(frame.as_bytes().len(), 5000);
    /// assert!(frame.as_bytes().iter().all(|byte| *byte == 0xFF));
    /// ```
    pub fn allocate(dimensions: Dimensions) -> Self {
        Self {
            storage: alloc::vec![BACKGROUND; dimensions.buffer_size()],
            dimensions,
        }
    }
}
