//! Fixed-size bitmap font contract
//!
//! A [`Font`] borrows a glyph table laid out the way the panel vendor ships its
//! fonts: glyphs for consecutive code points starting at the space character,
//! each glyph `height` rows of `ceil(width / 8)` bytes, MSB-first. The width
//! does not have to be a multiple of 8; the unused low bits of the last byte in
//! each row are ignored.

/// First code point present in every glyph table
pub const FIRST_CHAR: char = ' ';

/// Borrowed fixed-size bitmap font
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font<'a> {
    /// Glyph width in pixels
    pub width: u16,
    /// Glyph height in pixels
    pub height: u16,
    /// Concatenated glyph bitmaps
    pub data: &'a [u8],
}

impl<'a> Font<'a> {
    /// Describe a glyph table
    pub const fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Bytes per glyph row
    pub const fn bytes_per_row(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Bytes per glyph
    pub const fn glyph_size(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }

    /// Number of complete glyphs in the table
    pub fn glyph_count(&self) -> usize {
        match self.glyph_size() {
            0 => 0,
            size => self.data.len() / size,
        }
    }

    /// Bitmap of a character, `None` if the table does not cover it
    ///
    /// ```
    /// use epd1in54b::Font;
    ///
    /// // 3x2 font with two glyphs: ' ' and '!'
    /// const DATA: [u8; 4] = [0x00, 0x00, 0x40, 0xE0];
    /// let font = Font::new(3, 2, &DATA);
    /// assert_eq!(font.glyph('!'), Some(&DATA[2..]));
    /// assert_eq!(font.glyph('"'), None);
    /// assert_eq!(font.glyph('\n'), None);
    /// ```
    pub fn glyph(&self, c: char) -> Option<&'a [u8]> {
        let index = (c as u32).checked_sub(FIRST_CHAR as u32)? as usize;
        let size = self.glyph_size();
        let start = index.checked_mul(size)?;
        self.data.get(start..start.checked_add(size)?)
    }
}
