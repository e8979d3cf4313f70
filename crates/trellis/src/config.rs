//! Screen configuration.

use trellis_render::{Color, ScreenCoord, Size};

use crate::error::ScreenError;

/// Pixel depths a screen may be created with.
pub const SUPPORTED_PIXEL_DEPTHS: [u32; 5] = [8, 15, 16, 24, 32];

/// Which screen measurement ratio-based size properties scale against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioBasis {
    /// The smaller of the screen's width and height.
    #[default]
    MinDimension,
    /// The screen width.
    Width,
    /// The screen height.
    Height,
}

impl RatioBasis {
    /// The basis value for a screen of `size`.
    pub fn resolve(self, size: Size) -> ScreenCoord {
        match self {
            RatioBasis::MinDimension => size.min_component(),
            RatioBasis::Width => size.width,
            RatioBasis::Height => size.height,
        }
    }
}

/// Configuration for creating a [`Screen`](crate::Screen).
///
/// # Example
///
/// ```
/// use trellis::{RatioBasis, ScreenConfig};
/// use trellis::render::{Color, Size};
///
/// let config = ScreenConfig::new(Size::new(1280, 720))
///     .with_pixel_depth(24)
///     .with_ratio_basis(RatioBasis::Height)
///     .with_clear_color(Color::GRAY);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    /// Screen size in pixels.
    pub size: Size,
    /// Bits per pixel of the host surface.
    pub pixel_depth: u32,
    /// Basis for ratio-based size properties.
    pub ratio_basis: RatioBasis,
    /// Color the frame is cleared to before drawing.
    pub clear_color: Color,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            size: Size::new(800, 600),
            pixel_depth: 32,
            ratio_basis: RatioBasis::default(),
            clear_color: Color::BLACK,
        }
    }
}

impl ScreenConfig {
    /// Create a configuration for a screen of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Set the pixel depth.
    pub fn with_pixel_depth(mut self, pixel_depth: u32) -> Self {
        self.pixel_depth = pixel_depth;
        self
    }

    /// Set the ratio basis.
    pub fn with_ratio_basis(mut self, ratio_basis: RatioBasis) -> Self {
        self.ratio_basis = ratio_basis;
        self
    }

    /// Set the clear color.
    pub fn with_clear_color(mut self, clear_color: Color) -> Self {
        self.clear_color = clear_color;
        self
    }

    /// Check the configuration for values no screen can be created with.
    pub fn validate(&self) -> Result<(), ScreenError> {
        validate_size(self.size)?;
        if !SUPPORTED_PIXEL_DEPTHS.contains(&self.pixel_depth) {
            return Err(ScreenError::UnsupportedPixelDepth(self.pixel_depth));
        }
        Ok(())
    }
}

pub(crate) fn validate_size(size: Size) -> Result<(), ScreenError> {
    if size.width <= 0 || size.height <= 0 {
        return Err(ScreenError::InvalidSize(size));
    }
    Ok(())
}
