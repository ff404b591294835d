//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every rounding rule used by the pipeline lives in this file.

use super::params::{DimensionRequest, ScaleFactor};
use crate::error::OptimizerError;
use crate::types::{AspectRatio, Dimensions};

/// Complete a target box from a partial request and an aspect ratio.
///
/// The derived side is truncated toward zero, never rounded:
/// - width given (alone or with height): `height = trunc(width / ratio)`
/// - height only: `width = trunc(height * ratio)`
///
/// # Examples
/// ```
/// # use image_optimizer::imaging::{DimensionRequest, resolve_dimensions};
/// # use image_optimizer::{AspectRatio, Dimensions};
/// let ratio = AspectRatio::new(16.0 / 9.0).unwrap();
/// assert_eq!(
///     resolve_dimensions(DimensionRequest::Width(100), ratio),
///     Dimensions::new(100, 56)
/// );
/// ```
pub fn resolve_dimensions(request: DimensionRequest, ratio: AspectRatio) -> Dimensions {
    match request {
        DimensionRequest::Width(width) | DimensionRequest::Both { width, .. } => {
            Dimensions::new(width, (f64::from(width) / ratio.value()) as u32)
        }
        DimensionRequest::Height(height) => {
            Dimensions::new((f64::from(height) * ratio.value()) as u32, height)
        }
    }
}

/// [`resolve_dimensions`] for loose optional sides.
///
/// Fails with [`OptimizerError::InvalidDimensionRequest`] when both are absent.
pub fn resolve_target(
    width: Option<u32>,
    height: Option<u32>,
    ratio: AspectRatio,
) -> Result<Dimensions, OptimizerError> {
    DimensionRequest::new(width, height).map(|request| resolve_dimensions(request, ratio))
}

/// Turn crop arguments into a dimension request.
///
/// Zero means "not given". Width wins over height; when neither is given
/// the image's native width is used.
pub fn crop_request(target_width: u32, target_height: u32, native: Dimensions) -> DimensionRequest {
    match (target_width, target_height) {
        (0, 0) => DimensionRequest::Width(native.width),
        (0, height) => DimensionRequest::Height(height),
        (width, 0) => DimensionRequest::Width(width),
        (width, height) => DimensionRequest::Both { width, height },
    }
}

/// Where the source lands on an enlarged canvas.
///
/// The canvas only grows: an axis where the target is not larger than the
/// image keeps the image's size, so it can exceed the target on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPlan {
    /// Size of the expanded canvas.
    pub canvas: Dimensions,
    /// Horizontal offset of the source content.
    pub left: u32,
    /// Vertical offset of the source content.
    pub top: u32,
}

/// Decide whether `image` must be padded before cropping to `target`.
///
/// Returns `None` when the target fits inside the image. Otherwise each axis
/// where the target is larger grows to the target size with the source
/// centered at `trunc(|target - image| / 2)`; an axis where the target is not
/// larger keeps the image size and a zero offset, so no source pixels are
/// clipped before the crop chooses its window.
pub fn plan_padding(image: Dimensions, target: Dimensions) -> Option<PaddingPlan> {
    if !target.exceeds(image) {
        return None;
    }

    let axis = |target: u32, image: u32| -> (u32, u32) {
        if target > image {
            (target, target.abs_diff(image) / 2)
        } else {
            (image, 0)
        }
    };
    let (width, left) = axis(target.width, image.width);
    let (height, top) = axis(target.height, image.height);

    Some(PaddingPlan {
        canvas: Dimensions::new(width, height),
        left,
        top,
    })
}

/// Offset that centers `overlay` on `base`, truncated toward zero.
///
/// Negative when the overlay is larger than the base on that axis.
pub fn centered_offset(base: Dimensions, overlay: Dimensions) -> (i64, i64) {
    let x = (i64::from(base.width) - i64::from(overlay.width)) / 2;
    let y = (i64::from(base.height) - i64::from(overlay.height)) / 2;
    (x, y)
}

fn scale_side(side: u32, factor: f64) -> u32 {
    (f64::from(side) * factor).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Size after multiplying both sides by `scale`, rounded, never below 1px.
pub fn scaled_dimensions(source: Dimensions, scale: ScaleFactor) -> Dimensions {
    Dimensions::new(
        scale_side(source.width, scale.value()),
        scale_side(source.height, scale.value()),
    )
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
///
/// Sources smaller than `bounds` are enlarged. Both sides stay within
/// `1..=bounds`.
pub fn fit_dimensions(source: Dimensions, bounds: Dimensions) -> Dimensions {
    let ratio = (f64::from(bounds.width) / f64::from(source.width))
        .min(f64::from(bounds.height) / f64::from(source.height));

    Dimensions::new(
        scale_side(source.width, ratio).min(bounds.width.max(1)),
        scale_side(source.height, ratio).min(bounds.height.max(1)),
    )
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
pub fn fill_dimensions(source: Dimensions, target: Dimensions) -> Dimensions {
    let src_aspect = f64::from(source.width) / f64::from(source.height);
    let tgt_aspect = f64::from(target.width) / f64::from(target.height);

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let w = (f64::from(target.height) * src_aspect).round() as u32;
        Dimensions::new(w.max(target.width), target.height)
    } else {
        // Source is taller: width will match, height will exceed
        let h = (f64::from(target.width) / src_aspect).round() as u32;
        Dimensions::new(target.width, h.max(target.height))
    }
}
