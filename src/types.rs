//! Shared value types used across the pipeline stages.

use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pixel box: the size of an image or of a requested target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is larger than the matching side of `other`.
    pub fn exceeds(self, other: Dimensions) -> bool {
        self.width > other.width || self.height > other.height
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width divided by height. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio(1.0);

    pub fn new(ratio: f64) -> Result<Self, OptimizerError> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(OptimizerError::InvalidDimensionRequest(format!(
                "aspect ratio must be finite and greater than zero, got {ratio}"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Encoded output format.
///
/// Parsing is strict: only the exact lowercase names are recognized, and
/// anything else is an [`OptimizerError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Webp,
    Png,
    Jpeg,
    Jp2,
    Gif,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Webp,
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Jp2,
        ExportFormat::Gif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Webp => "webp",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Jp2 => "jp2",
            ExportFormat::Gif => "gif",
        }
    }

    /// File extension for persisted output. Only `jpeg` differs from its name.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| OptimizerError::UnsupportedFormat(s.to_string()))
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// White with zero alpha: the canvas fill used before attention crops.
    pub const TRANSPARENT_WHITE: Rgba = Rgba([255, 255, 255, 0]);

    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT_WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_recognized_format() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "bmp".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, OptimizerError::UnsupportedFormat(ref s) if s == "bmp"));
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("PNG".parse::<ExportFormat>().is_err());
        assert!("jpg".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn jpeg_extension_is_normalized() {
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExportFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(ExportFormat::Webp.extension(), "webp");
        assert_eq!(ExportFormat::Jp2.extension(), "jp2");
    }

    #[test]
    fn aspect_ratio_must_be_positive() {
        assert!(AspectRatio::new(0.0).is_err());
        assert!(AspectRatio::new(-1.5).is_err());
        assert!(AspectRatio::new(f64::NAN).is_err());
        assert!(AspectRatio::new(f64::INFINITY).is_err());
        assert_eq!(AspectRatio::new(1.0).unwrap(), AspectRatio::SQUARE);
    }

    #[test]
    fn dimensions_exceeds_on_either_axis() {
        let image = Dimensions::new(600, 400);
        assert!(!Dimensions::new(600, 400).exceeds(image));
        assert!(Dimensions::new(601, 10).exceeds(image));
        assert!(Dimensions::new(10, 401).exceeds(image));
        assert_eq!(image.to_string(), "600x400");
    }
}
