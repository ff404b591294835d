//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module (which decides what geometry
//! to request) and the [`backend`](super::backend) (which does the actual
//! pixel work). Invariants are checked when a value is constructed, so the
//! rest of the pipeline never re-validates them.
//!
//! ## Types
//!
//! - [`DimensionRequest`]: width and/or height, at least one present.
//! - [`ScaleFactor`]: finite, strictly positive resize multiplier.
//! - [`ThumbnailMode`]: fit inside a box, or fill it exactly.
//! - [`ResampleFilter`]: resampling kernel, with automatic selection.

use crate::error::OptimizerError;
use crate::types::Dimensions;
use serde::{Deserialize, Serialize};

/// A target box where either side may be left for the aspect ratio to derive.
///
/// Both sides absent is unrepresentable: [`DimensionRequest::new`] rejects it
/// with [`OptimizerError::InvalidDimensionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionRequest {
    Width(u32),
    Height(u32),
    /// Both given; width takes precedence and height is re-derived.
    Both { width: u32, height: u32 },
}

impl DimensionRequest {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Result<Self, OptimizerError> {
        match (width, height) {
            (Some(width), Some(height)) => Ok(Self::Both { width, height }),
            (Some(width), None) => Ok(Self::Width(width)),
            (None, Some(height)) => Ok(Self::Height(height)),
            (None, None) => Err(OptimizerError::InvalidDimensionRequest(
                "width and height cannot both be absent".into(),
            )),
        }
    }

    pub fn width(self) -> Option<u32> {
        match self {
            Self::Width(width) | Self::Both { width, .. } => Some(width),
            Self::Height(_) => None,
        }
    }

    pub fn height(self) -> Option<u32> {
        match self {
            Self::Height(height) | Self::Both { height, .. } => Some(height),
            Self::Width(_) => None,
        }
    }
}

/// Uniform resize multiplier. Values above 1 enlarge.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(scale: f64) -> Result<Self, OptimizerError> {
        if scale.is_finite() && scale > 0.0 {
            Ok(Self(scale))
        } else {
            Err(OptimizerError::InvalidScale(scale))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// How a thumbnail relates to its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailMode {
    /// Preserve aspect ratio; the result fits inside the box and may be
    /// smaller than it on one axis.
    Fit,
    /// Scale to cover the box, then attention-crop to exactly its size.
    ExactBox,
}

/// Resampling kernel used for every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Lanczos3 when shrinking, Catmull-Rom when enlarging.
    #[default]
    Auto,
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    /// Resolve [`ResampleFilter::Auto`] for a concrete resize.
    pub fn select(self, from: Dimensions, to: Dimensions) -> ResampleFilter {
        match self {
            ResampleFilter::Auto => {
                let enlarging = u64::from(to.width) * u64::from(to.height)
                    > u64::from(from.width) * u64::from(from.height);
                if enlarging {
                    ResampleFilter::CatmullRom
                } else {
                    ResampleFilter::Lanczos3
                }
            }
            explicit => explicit,
        }
    }
}
