//! Monochrome bitmap decoding
//!
//! Streams an uncompressed 1-bit-per-pixel Windows BMP into a plane through a
//! [`Painter`], so the image follows the active rotation and is clipped to the
//! logical frame like every other primitive.
//!
//! Only the two fixed-size headers are parsed: the 14-byte file header and the
//! 40-byte `BITMAPINFOHEADER`. Everything that is not a plain bottom-up, single
//! plane, 1 bpp, `BI_RGB` image is rejected before anything is drawn. Pixel
//! rows are then read one at a time through a small stack buffer, so decoding
//! needs no allocation and works on any [`embedded_io`] source that can seek.
//!
//! Set bits are drawn with the requested color; cleared bits leave the plane
//! untouched.
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{Color, Dimensions, FrameBuffer, Painter, SliceReader};
//!
//! # fn image() -> [u8; 72] {
//! #     let mut file = [0u8; 72];
//! #     file[0..2].copy_from_slice(b"BM");
//! #     file[2..6].copy_from_slice(&72u32.to_le_bytes());
//! #     file[10..14].copy_from_slice(&62u32.to_le_bytes());
//! #     file[14..18].copy_from_slice(&40u32.to_le_bytes());
//! #     file[18..22].copy_from_slice(&8i32.to_le_bytes());
//! #     file[22..26].copy_from_slice(&2i32.to_le_bytes());
//! #     file[26..28].copy_from_slice(&1u16.to_le_bytes());
//! #     file[28..30].copy_from_slice(&1u16.to_le_bytes());
//! #     file[62] = 0x0F;
//! #     file[66] = 0xF0;
//! #     file
//! # }
//! let dims = Dimensions::EPD_1IN54B;
//! let mut storage = [0xFFu8; 5000];
//! let mut frame = match FrameBuffer::new(&mut storage[..], dims) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//!
//! let file = image();
//! let painter = Painter::new(dims);
//! let mut source = SliceReader::new(&file);
//! if painter.draw_bitmap(&mut frame, &mut source, 0, 0, Color::Colored).is_err() {
//!     return;
//! }
//! // Rows are stored bottom-up: the last row in the file is drawn on top
//! assert_eq!(frame.as_bytes()[0], 0x0F);
//! assert_eq!(frame.as_bytes()[25], 0xF0);
//! ```

use core::ops::Range;

use embedded_io::{ErrorKind, ErrorType, Read, ReadExactError, Seek, SeekFrom};

use crate::buffer::FrameBuffer;
use crate::color::Color;
use crate::config::Dimensions;
use crate::error::{BitmapError, FormatError};
use crate::painter::Painter;

/// Bitmap file marker
pub const MAGIC: [u8; 2] = *b"BM";

/// Bytes read from the source per transfer while decoding a row
const CHUNK_SIZE: usize = 32;

/// Little-endian field readers; callers guarantee the slice length
fn le_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn le_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn le_i32(bytes: &[u8], offset: usize) -> i32 {
    le_u32(bytes, offset) as i32
}

/// 14-byte file header
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapHeader {
    /// Declared size of the whole file
    pub file_size: u32,
    /// Offset of the first pixel row
    pub data_offset: u32,
}

impl BitmapHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 14;

    /// Parse and validate the file header
    ///
    /// # Errors
    ///
    /// * `FormatError::InvalidHeaderSize` - `bytes` is not exactly 14 bytes
    /// * `FormatError::BadMagic` - the file does not start with `BM`
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() != Self::SIZE {
            return Err(FormatError::InvalidHeaderSize {
                expected: Self::SIZE,
                provided: bytes.len(),
            });
        }
        let magic = [bytes[0], bytes[1]];
        if magic != MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        Ok(Self {
            file_size: le_u32(bytes, 2),
            data_offset: le_u32(bytes, 10),
        })
    }

    /// End of the pixel data
    ///
    /// Row offsets are computed backwards from here. Reference images carry
    /// two bytes of trailing padding after the last row.
    pub fn data_end(&self) -> u64 {
        u64::from(self.file_size.saturating_sub(2))
    }
}

/// 40-byte `BITMAPINFOHEADER`, validated for 1 bpp images
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapHeaderInfo {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Declared size of the pixel data (may be 0 for `BI_RGB`)
    pub data_size: u32,
    /// Horizontal resolution in pixels per meter
    pub pixels_per_meter_x: i32,
    /// Vertical resolution in pixels per meter
    pub pixels_per_meter_y: i32,
    /// Palette entries used
    pub colors_used: u32,
    /// Palette entries required to display the image
    pub important_colors: u32,
}

impl BitmapHeaderInfo {
    /// Encoded size in bytes
    pub const SIZE: usize = 40;

    /// Parse and validate the info header
    ///
    /// # Errors
    ///
    /// Any `FormatError` except `BadMagic` and `TruncatedData`. Fields are
    /// checked in file order: planes, bit depth, compression, palette colors,
    /// important colors and finally the dimensions.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() != Self::SIZE {
            return Err(FormatError::InvalidHeaderSize {
                expected: Self::SIZE,
                provided: bytes.len(),
            });
        }
        let width = le_i32(bytes, 4);
        let height = le_i32(bytes, 8);

        let planes = le_u16(bytes, 12);
        if planes != 1 {
            return Err(FormatError::UnsupportedPlanes(planes));
        }
        let depth = le_u16(bytes, 14);
        if depth != 1 {
            return Err(FormatError::UnsupportedBitDepth(depth));
        }
        let compression = le_u32(bytes, 16);
        if compression != 0 {
            return Err(FormatError::UnsupportedCompression(compression));
        }
        let colors_used = le_u32(bytes, 32);
        if colors_used > 1 {
            return Err(FormatError::TooManyColors(colors_used));
        }
        let important_colors = le_u32(bytes, 36);
        if important_colors > 1 {
            return Err(FormatError::TooManyImportantColors(important_colors));
        }
        if width <= 0 || height <= 0 {
            return Err(FormatError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            data_size: le_u32(bytes, 20),
            pixels_per_meter_x: le_i32(bytes, 24),
            pixels_per_meter_y: le_i32(bytes, 28),
            colors_used,
            important_colors,
        })
    }

    /// Bytes holding the pixels of one row, without padding
    pub fn width_in_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Stored row length, padded to a 4-byte boundary
    pub fn line_width(&self) -> usize {
        self.width_in_bytes().div_ceil(4) * 4
    }

    /// Padding bits at the end of each stored row
    pub fn width_padding(&self) -> usize {
        self.line_width() * 8 - self.width as usize
    }

    /// Unused low bits in the last pixel byte of a row
    pub fn last_byte_padding(&self) -> u32 {
        (8 - self.width % 8) % 8
    }

    /// Part of the image that lands inside `target` when drawn at `(x, y)`
    ///
    /// Ranges are in image coordinates (row 0 is the top row). Returns `None`
    /// when nothing is visible.
    ///
    /// ```
    /// use epd1in54b::{BitmapHeaderInfo, Dimensions};
    ///
    /// let info = BitmapHeaderInfo {
    ///     width: 64,
    ///     height: 32,
    ///     data_size: 0,
    ///     pixels_per_meter_x: 0,
    ///     pixels_per_meter_y: 0,
    ///     colors_used: 0,
    ///     important_colors: 0,
    /// };
    /// let target = Dimensions::EPD_1IN54B;
    /// let Some(region) = info.visible_region(-10, 180, target) else {
    ///     return;
    /// };
    /// assert_eq!(region.columns, 10..64);
    /// assert_eq!(region.rows, 0..20);
    /// assert!(info.visible_region(200, 0, target).is_none());
    /// ```
    pub fn visible_region(&self, x: i32, y: i32, target: Dimensions) -> Option<VisibleRegion> {
        Some(VisibleRegion {
            columns: visible_span(x, self.width, target.width)?,
            rows: visible_span(y, self.height, target.height)?,
        })
    }
}

/// Visible columns and rows of a bitmap, in image coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRegion {
    /// Image columns inside the target
    pub columns: Range<u32>,
    /// Image rows inside the target, 0 being the top row
    pub rows: Range<u32>,
}

fn visible_span(offset: i32, length: u32, limit: u16) -> Option<Range<u32>> {
    let offset = i64::from(offset);
    let start = (-offset).max(0);
    let end = i64::from(length).min(i64::from(limit) - offset);
    (start < end).then(|| start as u32..end as u32)
}

/// Seekable reader over an in-memory image, e.g. one embedded with
/// `include_bytes!`
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceReader<'a> {
    /// Start reading at the first byte
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Seek target before the start of a [`SliceReader`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidSeek;

impl core::fmt::Display for InvalidSeek {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Seek before the start of the data")
    }
}

impl core::error::Error for InvalidSeek {}

impl embedded_io::Error for InvalidSeek {
    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl ErrorType for SliceReader<'_> {
    type Error = InvalidSeek;
}

impl Read for SliceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.get(self.position..).unwrap_or_default();
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count;
        Ok(count)
    }
}

impl Seek for SliceReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::End(delta) => self.data.len() as i128 + i128::from(delta),
            SeekFrom::Current(delta) => self.position as i128 + i128::from(delta),
        };
        let position = usize::try_from(target).map_err(|_| InvalidSeek)?;
        self.position = position;
        Ok(position as u64)
    }
}

/// Fill `buf` from the source, stopping early at end of data
fn read_header<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize, R::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..])? {
            0 => break,
            count => filled += count,
        }
    }
    Ok(filled)
}

fn map_read_error<E>(err: ReadExactError<E>) -> BitmapError<E> {
    match err {
        ReadExactError::UnexpectedEof => BitmapError::UnexpectedEof,
        ReadExactError::Other(err) => BitmapError::Io(err),
    }
}

impl Painter {
    /// Draw a 1 bpp bitmap with its top-left corner at logical `(x, y)`
    ///
    /// The source is read from its start. Set bits are drawn with `color`;
    /// anything outside the logical frame is clipped.
    ///
    /// # Arguments
    ///
    /// * `frame` - Plane to draw on
    /// * `source` - Seekable byte source holding the whole file
    /// * `x`, `y` - Logical position of the image's top-left corner
    /// * `color` - State written for set image bits
    ///
    /// # Errors
    ///
    /// * `BitmapError::Format` - headers rejected, nothing drawn
    /// * `BitmapError::Io` / `BitmapError::UnexpectedEof` - the source failed
    ///   mid-image; rows drawn before the failure are kept
    pub fn draw_bitmap<B, R>(
        &self,
        frame: &mut FrameBuffer<B>,
        source: &mut R,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), BitmapError<R::Error>>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
        R: Read + Seek,
    {
        source.seek(SeekFrom::Start(0)).map_err(BitmapError::Io)?;

        let mut header = [0u8; BitmapHeader::SIZE];
        let count = read_header(source, &mut header).map_err(BitmapError::Io)?;
        let header = BitmapHeader::parse(&header[..count])?;

        let mut info = [0u8; BitmapHeaderInfo::SIZE];
        let count = read_header(source, &mut info).map_err(BitmapError::Io)?;
        let info = BitmapHeaderInfo::parse(&info[..count])?;

        log::debug!(
            "bitmap {}x{} ({} bytes, data at {})",
            info.width,
            info.height,
            header.file_size,
            header.data_offset
        );

        let Some(region) = info.visible_region(x, y, self.logical_dimensions()) else {
            log::debug!("bitmap at ({x}, {y}) is outside the frame");
            return Ok(());
        };

        let line_width = info.line_width() as u64;
        let data_end = header.data_end();
        let required = u64::from(region.rows.end) * line_width;
        if required > data_end {
            return Err(FormatError::TruncatedData {
                required,
                available: data_end,
            }
            .into());
        }

        for row in region.rows.clone() {
            let offset = data_end - (u64::from(row) + 1) * line_width;
            let result =
                self.draw_bitmap_row(frame, source, &info, &region, offset, row, x, y, color);
            if let Err(err) = result {
                log::warn!("bitmap decoding aborted at row {row}: {err:?}");
                return Err(err);
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bitmap_row<B, R>(
        &self,
        frame: &mut FrameBuffer<B>,
        source: &mut R,
        info: &BitmapHeaderInfo,
        region: &VisibleRegion,
        offset: u64,
        row: u32,
        x: i32,
        y: i32,
        color: Color,
    ) -> Result<(), BitmapError<R::Error>>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
        R: Read + Seek,
    {
        let first_byte = (region.columns.start / 8) as usize;
        let end_byte = (region.columns.end as usize).div_ceil(8);
        let last_pixel_byte = info.width_in_bytes() - 1;
        let padding = info.last_byte_padding();
        let py = y + row as i32;

        source
            .seek(SeekFrom::Start(offset + first_byte as u64))
            .map_err(BitmapError::Io)?;

        let mut chunk = [0u8; CHUNK_SIZE];
        let mut index = first_byte;
        while index < end_byte {
            let len = (end_byte - index).min(CHUNK_SIZE);
            let bytes = &mut chunk[..len];
            source.read_exact(bytes).map_err(map_read_error)?;

            for byte in bytes.iter() {
                let mut bits = *byte;
                if padding > 0 && index == last_pixel_byte {
                    bits &= 0xFF << padding;
                }
                for bit in 0..8u32 {
                    let column = index as u32 * 8 + bit;
                    if bits & (0x80 >> bit) != 0 && region.columns.contains(&column) {
                        self.set_pixel(frame, x + column as i32, py, color);
                    }
                }
                index += 1;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use self::file::{FileError, FileSource};

#[cfg(feature = "std")]
mod file {
    use std::path::Path;

    use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};

    use crate::buffer::FrameBuffer;
    use crate::color::Color;
    use crate::error::BitmapError;
    use crate::painter::Painter;

    /// I/O error of a [`FileSource`]
    #[derive(Debug)]
    pub struct FileError(pub std::io::Error);

    impl core::fmt::Display for FileError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for FileError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    impl embedded_io::Error for FileError {
        fn kind(&self) -> ErrorKind {
            self.0.kind().into()
        }
    }

    /// Bitmap source backed by an open file
    #[derive(Debug)]
    pub struct FileSource(std::fs::File);

    impl FileSource {
        /// Open a file for reading
        pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
            std::fs::File::open(path).map(Self).map_err(FileError)
        }
    }

    impl ErrorType for FileSource {
        type Error = FileError;
    }

    impl Read for FileSource {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            std::io::Read::read(&mut self.0, buf).map_err(FileError)
        }
    }

    impl Seek for FileSource {
        fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
            std::io::Seek::seek(&mut self.0, pos.into()).map_err(FileError)
        }
    }

    impl Painter {
        /// Draw a bitmap file with its top-left corner at logical `(x, y)`
        ///
        /// The file is only open for the duration of the call.
        ///
        /// # Errors
        ///
        /// As [`Painter::draw_bitmap`]; failing to open the file is reported
        /// as `BitmapError::Io`.
        pub fn draw_bitmap_file<B>(
            &self,
            frame: &mut FrameBuffer<B>,
            path: impl AsRef<Path>,
            x: i32,
            y: i32,
            color: Color,
        ) -> Result<(), BitmapError<FileError>>
        where
            B: AsRef<[u8]> + AsMut<[u8]>,
        {
            let path = path.as_ref();
            let mut source = FileSource::open(path).map_err(|err| {
                log::warn!("cannot open bitmap {}: {}", path.display(), err);
                BitmapError::Io(err)
            })?;
            self.draw_bitmap(frame, &mut source, x, y, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Deterministic LCG so randomized cases are reproducible
    struct Lcg(u32);

    impl Lcg {
        fn next(&mut self) -> u32 {
            self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12345);
            self.0 >> 8
        }

        fn range(&mut self, min: i32, max: i32) -> i32 {
            min + (self.next() % (max - min + 1) as u32) as i32
        }
    }

    /// Encode a 1 bpp bitmap; `pixel(column, row)` with row 0 at the top
    fn encode(width: u32, height: u32, pixel: impl Fn(u32, u32) -> bool) -> Vec<u8> {
        let width_in_bytes = (width as usize).div_ceil(8);
        let line_width = width_in_bytes.div_ceil(4) * 4;
        let data_offset = 14 + 40 + 8;
        let file_size = data_offset + line_width * height as usize + 2;

        let mut file = Vec::with_capacity(file_size);
        file.extend_from_slice(b"BM");
        file.extend_from_slice(&(file_size as u32).to_le_bytes());
        file.extend_from_slice(&[0; 4]);
        file.extend_from_slice(&(data_offset as u32).to_le_bytes());

        file.extend_from_slice(&40u32.to_le_bytes());
        file.extend_from_slice(&(width as i32).to_le_bytes());
        file.extend_from_slice(&(height as i32).to_le_bytes());
        file.extend_from_slice(&1u16.to_le_bytes());
        file.extend_from_slice(&1u16.to_le_bytes());
        file.extend_from_slice(&0u32.to_le_bytes());
        file.extend_from_slice(&((line_width * height as usize) as u32).to_le_bytes());
        file.extend_from_slice(&2835i32.to_le_bytes());
        file.extend_from_slice(&2835i32.to_le_bytes());
        file.extend_from_slice(&0u32.to_le_bytes());
        file.extend_from_slice(&0u32.to_le_bytes());

        // Palette: black, white
        file.extend_from_slice(&[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0]);

        for row in (0..height).rev() {
            let mut line = alloc::vec![0u8; line_width];
            for column in 0..width {
                if pixel(column, row) {
                    line[(column / 8) as usize] |= 0x80 >> (column % 8);
                }
            }
            file.extend_from_slice(&line);
        }
        file.extend_from_slice(&[0, 0]);
        file
    }

    fn frame(width: u16, height: u16) -> FrameBuffer<Vec<u8>> {
        let dims = Dimensions::new(width, height).unwrap();
        FrameBuffer::new(alloc::vec![0xFFu8; dims.buffer_size()], dims).unwrap()
    }

    fn colored(painter: &Painter, frame: &FrameBuffer<Vec<u8>>) -> Vec<(i32, i32)> {
        let logical = painter.logical_dimensions();
        let mut points = Vec::new();
        for y in 0..logical.height as i32 {
            for x in 0..logical.width as i32 {
                if painter.pixel(frame, x, y) == Some(Color::Colored) {
                    points.push((x, y));
                }
            }
        }
        points
    }

    fn decode(
        painter: &Painter,
        frame: &mut FrameBuffer<Vec<u8>>,
        file: &[u8],
        x: i32,
        y: i32,
    ) -> Result<(), BitmapError<InvalidSeek>> {
        painter.draw_bitmap(frame, &mut SliceReader::new(file), x, y, Color::Colored)
    }

    fn info_bytes(edit: impl FnOnce(&mut [u8])) -> [u8; 40] {
        let file = encode(16, 4, |_, _| false);
        let mut info = [0u8; 40];
        info.copy_from_slice(&file[14..54]);
        edit(&mut info);
        info
    }

    /// Reader that records how far into the data anything was read
    struct CountingReader<'a> {
        inner: SliceReader<'a>,
        furthest: usize,
    }

    impl ErrorType for CountingReader<'_> {
        type Error = InvalidSeek;
    }

    impl Read for CountingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let count = self.inner.read(buf)?;
            self.furthest = self.furthest.max(self.inner.position());
            Ok(count)
        }
    }

    impl Seek for CountingReader<'_> {
        fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
            self.inner.seek(pos)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Unplugged;

    impl embedded_io::Error for Unplugged {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Reader that fails on the n-th seek
    struct FailingReader<'a> {
        inner: SliceReader<'a>,
        seeks_left: usize,
    }

    impl ErrorType for FailingReader<'_> {
        type Error = Unplugged;
    }

    impl Read for FailingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.inner.read(buf).map_err(|_| Unplugged)
        }
    }

    impl Seek for FailingReader<'_> {
        fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
            if self.seeks_left == 0 {
                return Err(Unplugged);
            }
            self.seeks_left -= 1;
            self.inner.seek(pos).map_err(|_| Unplugged)
        }
    }

    /// Reader whose data runs out after a number of reads
    struct EndingReader<'a> {
        inner: SliceReader<'a>,
        reads_left: usize,
    }

    impl ErrorType for EndingReader<'_> {
        type Error = InvalidSeek;
    }

    impl Read for EndingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.reads_left == 0 {
                return Ok(0);
            }
            self.reads_left -= 1;
            self.inner.read(buf)
        }
    }

    impl Seek for EndingReader<'_> {
        fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_header_parse() {
        let file = encode(13, 3, |_, _| false);
        let header = BitmapHeader::parse(&file[..14]).unwrap();
        assert_eq!(header.file_size as usize, file.len());
        assert_eq!(header.data_offset, 62);
        assert_eq!(header.data_end() as usize, file.len() - 2);
    }

    #[test]
    fn test_header_rejections() {
        let file = encode(8, 1, |_, _| false);
        assert_eq!(
            BitmapHeader::parse(&file[..10]),
            Err(FormatError::InvalidHeaderSize {
                expected: 14,
                provided: 10
            })
        );
        let mut header = [0u8; 14];
        header.copy_from_slice(&file[..14]);
        header[0] = b'P';
        assert_eq!(
            BitmapHeader::parse(&header),
            Err(FormatError::BadMagic([b'P', b'M']))
        );
    }

    #[test]
    fn test_info_rejections() {
        let cases: [(usize, &[u8], FormatError); 5] = [
            (12, &[2, 0], FormatError::UnsupportedPlanes(2)),
            (14, &[24, 0], FormatError::UnsupportedBitDepth(24)),
            (16, &[1, 0, 0, 0], FormatError::UnsupportedCompression(1)),
            (32, &[2, 0, 0, 0], FormatError::TooManyColors(2)),
            (36, &[2, 0, 0, 0], FormatError::TooManyImportantColors(2)),
        ];
        for (offset, value, expected) in cases {
            let info =
                info_bytes(|info| info[offset..offset + value.len()].copy_from_slice(value));
            assert_eq!(BitmapHeaderInfo::parse(&info), Err(expected));
        }

        let top_down = info_bytes(|info| info[8..12].copy_from_slice(&(-4i32).to_le_bytes()));
        assert_eq!(
            BitmapHeaderInfo::parse(&top_down),
            Err(FormatError::InvalidDimensions {
                width: 16,
                height: -4
            })
        );
        let empty = info_bytes(|info| info[4..8].copy_from_slice(&0i32.to_le_bytes()));
        assert!(matches!(
            BitmapHeaderInfo::parse(&empty),
            Err(FormatError::InvalidDimensions { width: 0, .. })
        ));
        assert!(matches!(
            BitmapHeaderInfo::parse(&[0u8; 39]),
            Err(FormatError::InvalidHeaderSize { expected: 40, .. })
        ));
    }

    #[test]
    fn test_row_geometry() {
        let file = encode(13, 2, |_, _| false);
        let info = BitmapHeaderInfo::parse(&file[14..54]).unwrap();
        assert_eq!(info.width_in_bytes(), 2);
        assert_eq!(info.line_width(), 4);
        assert_eq!(info.width_padding(), 19);
        assert_eq!(info.last_byte_padding(), 3);

        let file = encode(32, 1, |_, _| false);
        let info = BitmapHeaderInfo::parse(&file[14..54]).unwrap();
        assert_eq!(info.line_width(), 4);
        assert_eq!(info.width_padding(), 0);
        assert_eq!(info.last_byte_padding(), 0);
    }

    #[test]
    fn test_decode_reproduces_bit_pattern() {
        let mut rng = Lcg(7);
        for _ in 0..40 {
            let width = rng.range(1, 40) as u32;
            let height = rng.range(1, 20) as u32;
            let seed = rng.next();
            let pattern =
                |c: u32, r: u32| (c.wrapping_mul(31) ^ r.wrapping_mul(17) ^ seed) % 3 == 0;
            let file = encode(width, height, pattern);

            let mut frame = frame(width as u16, height as u16);
            let painter = Painter::new(frame.dimensions());
            decode(&painter, &mut frame, &file, 0, 0).unwrap();

            for r in 0..height {
                for c in 0..width {
                    let expected = Some(Color::from(pattern(c, r)));
                    let actual = frame.pixel(c as i32, r as i32);
                    assert_eq!(actual, expected, "{width}x{height} ({c}, {r})");
                }
            }
        }
    }

    #[test]
    fn test_bad_magic_rejected_before_info_header() {
        let mut file = encode(8, 8, |_, _| true);
        file[1] = b'A';
        let mut source = CountingReader {
            inner: SliceReader::new(&file),
            furthest: 0,
        };
        let mut frame = frame(8, 8);
        let painter = Painter::new(frame.dimensions());
        let result = painter.draw_bitmap(&mut frame, &mut source, 0, 0, Color::Colored);
        assert!(matches!(
            result,
            Err(BitmapError::Format(FormatError::BadMagic([b'B', b'A'])))
        ));
        assert!(source.furthest <= BitmapHeader::SIZE);
        assert!(frame.as_bytes().iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn test_short_source_is_a_header_error() {
        let file = encode(8, 8, |_, _| true);
        let mut frame = frame(8, 8);
        let painter = Painter::new(frame.dimensions());
        let result = decode(&painter, &mut frame, &file[..30], 0, 0);
        assert!(matches!(
            result,
            Err(BitmapError::Format(FormatError::InvalidHeaderSize {
                expected: 40,
                provided: 16
            }))
        ));
    }

    #[test]
    fn test_clipping_matches_intersection() {
        let mut rng = Lcg(42);
        for _ in 0..200 {
            let width = rng.range(1, 60) as u32;
            let height = rng.range(1, 60) as u32;
            let target_w = rng.range(8, 48) as u16;
            let target_h = rng.range(8, 48) as u16;
            let x = rng.range(-70, 70);
            let y = rng.range(-70, 70);
            let seed = rng.next();
            let pattern = |c: u32, r: u32| (c ^ r.rotate_left(3) ^ seed) & 1 == 1;
            let file = encode(width, height, pattern);

            let mut frame = frame(target_w, target_h);
            let painter = Painter::new(frame.dimensions());
            decode(&painter, &mut frame, &file, x, y).unwrap();

            let mut expected = Vec::new();
            for py in 0..target_h as i32 {
                for px in 0..target_w as i32 {
                    let (c, r) = (px - x, py - y);
                    if c >= 0
                        && r >= 0
                        && (c as u32) < width
                        && (r as u32) < height
                        && pattern(c as u32, r as u32)
                    {
                        expected.push((px, py));
                    }
                }
            }
            assert_eq!(
                colored(&painter, &frame),
                expected,
                "{width}x{height} at ({x}, {y}) on {target_w}x{target_h}"
            );
        }
    }

    #[test]
    fn test_offscreen_draws_nothing() {
        let file = encode(16, 16, |_, _| true);
        let mut frame = frame(32, 32);
        let painter = Painter::new(frame.dimensions());
        for (x, y) in [(32, 0), (0, 32), (-16, 0), (0, -16), (i32::MIN, i32::MAX)] {
            decode(&painter, &mut frame, &file, x, y).unwrap();
        }
        assert!(frame.as_bytes().iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn test_last_byte_padding_is_masked() {
        // Stored padding bits set: only the 5 real columns may be drawn
        let mut file = encode(5, 1, |_, _| true);
        let row = file.len() - 2 - 4;
        file[row] = 0xFF;
        let mut frame = frame(16, 1);
        let painter = Painter::new(frame.dimensions());
        decode(&painter, &mut frame, &file, 0, 0).unwrap();
        assert_eq!(frame.as_bytes(), &[0x07, 0xFF]);
    }

    #[test]
    fn test_declared_size_too_small() {
        let mut file = encode(8, 4, |_, _| true);
        file[2..6].copy_from_slice(&14u32.to_le_bytes());
        let mut frame = frame(8, 4);
        let painter = Painter::new(frame.dimensions());
        let result = decode(&painter, &mut frame, &file, 0, 0);
        assert!(matches!(
            result,
            Err(BitmapError::Format(FormatError::TruncatedData {
                required: 16,
                available: 12
            }))
        ));
        assert!(frame.as_bytes().iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn test_io_failure_keeps_drawn_rows() {
        let file = encode(8, 4, |_, _| true);
        // Initial rewind plus two rows succeed, the third row seek fails
        let mut source = FailingReader {
            inner: SliceReader::new(&file),
            seeks_left: 3,
        };
        let mut frame = frame(8, 4);
        let painter = Painter::new(frame.dimensions());
        let result = painter.draw_bitmap(&mut frame, &mut source, 0, 0, Color::Colored);
        assert!(matches!(result, Err(BitmapError::Io(Unplugged))));
        assert_eq!(frame.as_bytes(), &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_missing_rows_are_unexpected_eof() {
        let file = encode(8, 4, |_, _| true);
        // Rows sit at 74, 70, 66 and 62; the declared size is kept but the
        // data stops short of the top row, which is read first
        let cut = &file[..file.len() - 6];
        let mut frame = frame(8, 4);
        let painter = Painter::new(frame.dimensions());
        let result = decode(&painter, &mut frame, cut, 0, 0);
        assert!(matches!(result, Err(BitmapError::UnexpectedEof)));
        assert!(frame.as_bytes().iter().all(|byte| *byte == 0xFF));

        // Still enough bytes for every row
        let mut frame = self::frame(8, 4);
        decode(&painter, &mut frame, &file[..file.len() - 2], 0, 0).unwrap();
        assert_eq!(frame.as_bytes(), &[0x00; 4]);
    }

    #[test]
    fn test_source_ending_mid_image_keeps_drawn_rows() {
        let file = encode(8, 4, |_, _| true);
        // Both headers and the top two rows, one read each
        let mut source = EndingReader {
            inner: SliceReader::new(&file),
            reads_left: 4,
        };
        let mut frame = frame(8, 4);
        let painter = Painter::new(frame.dimensions());
        let result = painter.draw_bitmap(&mut frame, &mut source, 0, 0, Color::Colored);
        assert!(matches!(result, Err(BitmapError::UnexpectedEof)));
        assert_eq!(frame.as_bytes(), &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_follows_rotation() {
        let file = encode(8, 1, |c, _| c == 0);
        let mut frame = frame(16, 8);
        let mut painter = Painter::new(frame.dimensions());
        painter.set_rotation(crate::Rotation::Rotate180);
        decode(&painter, &mut frame, &file, 1, 1).unwrap();
        assert_eq!(painter.pixel(&frame, 1, 1), Some(Color::Colored));
        assert_eq!(frame.pixel(15, 7), Some(Color::Colored));
    }

    #[test]
    fn test_slice_reader_seek() {
        let data = [1u8, 2, 3, 4];
        let mut reader = SliceReader::new(&data);
        assert_eq!(reader.seek(SeekFrom::End(-1)), Ok(3));
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf), Ok(1));
        assert_eq!(buf[0], 4);
        assert_eq!(reader.read(&mut buf), Ok(0));
        assert_eq!(reader.seek(SeekFrom::Current(-5)), Err(InvalidSeek));
        assert_eq!(reader.seek(SeekFrom::Start(10)), Ok(10));
        assert_eq!(reader.read(&mut buf), Ok(0));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_error_keeps_io_kind() {
        use std::io::ErrorKind as IoKind;

        for (io, expected) in [
            (IoKind::NotFound, ErrorKind::NotFound),
            (IoKind::InvalidData, ErrorKind::InvalidData),
            (IoKind::TimedOut, ErrorKind::TimedOut),
            (IoKind::Unsupported, ErrorKind::Unsupported),
            (IoKind::OutOfMemory, ErrorKind::OutOfMemory),
        ] {
            let err = FileError(std::io::Error::from(io));
            assert_eq!(embedded_io::Error::kind(&err), expected);
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_source_seeks() {
        let path = std::env::temp_dir().join("epd1in54b_file_source_seeks.bin");
        std::fs::write(&path, [1u8, 2, 3, 4, 5]).unwrap();

        let mut source = FileSource::open(&path).unwrap();
        let mut byte = [0u8; 1];
        assert_eq!(source.seek(SeekFrom::End(-2)).unwrap(), 3);
        source.read_exact(&mut byte).unwrap();
        assert_eq!(byte, [4]);
        assert_eq!(source.seek(SeekFrom::Current(-3)).unwrap(), 1);
        source.read_exact(&mut byte).unwrap();
        assert_eq!(byte, [2]);
        assert_eq!(source.seek(SeekFrom::Start(0)).unwrap(), 0);
        source.read_exact(&mut byte).unwrap();
        assert_eq!(byte, [1]);

        drop(source);
        std::fs::remove_file(&path).unwrap();
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_draw_bitmap_file() {
        let file = encode(8, 2, |c, r| c == r);
        let path = std::env::temp_dir().join("epd1in54b_draw_bitmap_file.bmp");
        std::fs::write(&path, &file).unwrap();

        let mut frame = frame(8, 2);
        let painter = Painter::new(frame.dimensions());
        painter
            .draw_bitmap_file(&mut frame, &path, 0, 0, Color::Colored)
            .unwrap();
        assert_eq!(frame.as_bytes(), &[0x7F, 0xBF]);
        std::fs::remove_file(&path).unwrap();

        let missing = painter.draw_bitmap_file(&mut frame, &path, 0, 0, Color::Colored);
        assert!(matches!(
            missing,
            Err(BitmapError::Io(ref err)) if embedded_io::Error::kind(err) == ErrorKind::NotFound
        ));
    }
}
