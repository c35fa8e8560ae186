//! Error types for the crate
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! frame buffer construction ([`Error`]) and bitmap decoding ([`FormatError`],
//! [`BitmapError`]).
//!
//! Drawing primitives never fail: coordinates outside the frame are silently
//! ignored so that shapes can be composed without caller-side bounds checks.
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Frame buffer storage errors
//! - [`FormatError`] - Malformed or unsupported bitmap headers
//! - [`BitmapError`] - Bitmap decoding failures (format or I/O)
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use epd1in54b::{BuilderError, Dimensions, Rotation};
//!
//! // Zero-sized panels are rejected
//! let result = Dimensions::new(0, 200);
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//!
//! // Only quarter turns exist
//! let result = Rotation::from_degrees(45);
//! assert!(matches!(result, Err(BuilderError::InvalidRotation(45))));
//! ```

/// Errors related to frame buffer storage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Buffer is too small for the frame
    ///
    /// The provided storage must be at least `dimensions.buffer_size()` bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl core::error::Error for Error {}

/// Errors that can occur when building configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Rotation value outside of the four supported orientations
    ///
    /// Carries the rejected raw value (an orientation index or a number of degrees).
    InvalidRotation(u16),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions {width}x{height} (both must be non-zero)")
            }
            Self::InvalidRotation(value) => write!(f, "Invalid rotation: {value}"),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Reasons a bitmap is rejected before anything is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatError {
    /// A header is not of its fixed size (the source ended inside it)
    InvalidHeaderSize {
        /// Header size in bytes
        expected: usize,
        /// Bytes available
        provided: usize,
    },
    /// The file does not start with the `BM` marker
    BadMagic([u8; 2]),
    /// Plane count other than 1
    UnsupportedPlanes(u16),
    /// Bit depth other than 1
    UnsupportedBitDepth(u16),
    /// Any compression mode other than `BI_RGB` (0)
    UnsupportedCompression(u32),
    /// More than one palette color declared
    TooManyColors(u32),
    /// More than one important color declared
    TooManyImportantColors(u32),
    /// Non-positive width or height (top-down bitmaps are not supported)
    InvalidDimensions {
        /// Declared width
        width: i32,
        /// Declared height
        height: i32,
    },
    /// The declared file size leaves no room for the rows that must be read
    TruncatedData {
        /// Bytes needed before the end of the pixel data
        required: u64,
        /// Bytes available according to the file header
        available: u64,
    },
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidHeaderSize { expected, provided } => write!(
                f,
                "Invalid bitmap header size: expected {expected} bytes, got {provided}"
            ),
            Self::BadMagic(magic) => {
                write!(f, "Bad bitmap magic: {:#04x} {:#04x}", magic[0], magic[1])
            }
            Self::UnsupportedPlanes(planes) => write!(f, "Unsupported plane count: {planes}"),
            Self::UnsupportedBitDepth(depth) => write!(f, "Unsupported bit depth: {depth}"),
            Self::UnsupportedCompression(mode) => {
                write!(f, "Unsupported compression mode: {mode}")
            }
            Self::TooManyColors(count) => write!(f, "Too many palette colors: {count}"),
            Self::TooManyImportantColors(count) => {
                write!(f, "Too many important colors: {count}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid bitmap dimensions: {width}x{height}")
            }
            Self::TruncatedData {
                required,
                available,
            } => write!(
                f,
                "Truncated pixel data: {required} bytes required, {available} available"
            ),
        }
    }
}

impl core::error::Error for FormatError {}

/// Errors that can occur while drawing a bitmap
///
/// Generic over the I/O error of the byte source so the caller can still
/// match on the underlying failure.
#[derive(Debug)]
pub enum BitmapError<E> {
    /// The headers were rejected; nothing was drawn
    Format(FormatError),
    /// Reading or seeking failed; rows drawn before the failure are kept
    Io(E),
    /// The source ended before the last visible row; earlier rows are kept
    UnexpectedEof,
}

impl<E> From<FormatError> for BitmapError<E> {
    fn from(err: FormatError) -> Self {
        Self::Format(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for BitmapError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Format(err) => write!(f, "Bitmap format error: {err}"),
            Self::Io(err) => write!(f, "Bitmap I/O error: {err:?}"),
            Self::UnexpectedEof => write!(f, "Bitmap ended before the last row"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for BitmapError<E> {}
