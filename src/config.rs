//! Frame configuration types and builder

pub use crate::error::BuilderError;

/// Physical width of the 1.54" black/red panel in pixels
pub const WIDTH: u16 = 200;

/// Physical height of the 1.54" black/red panel in pixels
pub const HEIGHT: u16 = 200;

/// Frame dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows)
    pub height: u16,
}

impl Dimensions {
    /// Dimensions of the 1.54" black/red panel
    pub const EPD_1IN54B: Self = Self {
        width: WIDTH,
        height: HEIGHT,
    };

    /// Create new dimensions with validation
    ///
    /// The width does not have to be a multiple of 8: the frame is a single
    /// continuous bit stream without per-row padding.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero.
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || height == 0 {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Calculate required buffer size in bytes, `ceil(width * height / 8)`
    pub fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize).div_ceil(8)
    }

    /// Number of bytes covering one row, `ceil(width / 8)`
    pub fn width_in_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Width and height exchanged
    pub fn transposed(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::EPD_1IN54B
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees
    Rotate270,
}

impl Rotation {
    /// Parse a rotation given in degrees
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidRotation` for anything but 0, 90, 180 or 270.
    pub fn from_degrees(degrees: u16) -> Result<Self, BuilderError> {
        match degrees {
            0 => Ok(Self::Rotate0),
            90 => Ok(Self::Rotate90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Rotate270),
            other => Err(BuilderError::InvalidRotation(other)),
        }
    }

    /// Rotation in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    /// Whether this rotation exchanges width and height
    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Orientation index as used by the panel vendor: 0..=3 for 0°, 90°, 180°, 270°
impl TryFrom<u8> for Rotation {
    type Error = BuilderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Rotate0),
            1 => Ok(Self::Rotate90),
            2 => Ok(Self::Rotate180),
            3 => Ok(Self::Rotate270),
            other => Err(BuilderError::InvalidRotation(other as u16)),
        }
    }
}

/// Drawing session configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Physical frame dimensions
    pub dimensions: Dimensions,
    /// Initial rotation
    pub rotation: Rotation,
}

impl Config {
    /// Get the rotated (logical) dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        if self.rotation.is_transposed() {
            self.dimensions.transposed()
        } else {
            self.dimensions
        }
    }
}

/// Builder for constructing drawing configuration
///
/// Dimensions default to the 200x200 panel.
///
/// # Example
///
/// ```
/// use epd1in54b::{Builder, Dimensions, Rotation};
///
/// let dims = match Dimensions::new(152, 152) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = Builder::new().dimensions(dims).rotation(Rotation::Rotate90).build();
/// assert_eq!(config.rotated_dimensions(), dims);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    dimensions: Dimensions,
    rotation: Rotation,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set physical frame dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = dims;
        self
    }

    /// Set the initial rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial rotation from a vendor orientation index (0..=3)
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidRotation` for indices above 3.
    pub fn rotation_index(mut self, index: u8) -> Result<Self, BuilderError> {
        self.rotation = Rotation::try_from(index)?;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        Config {
            dimensions: self.dimensions,
            rotation: self.rotation,
        }
    }
}
