//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the pixel-level collaborator of the
//! pipeline: decode, measure, resize, attention crop, canvas embed, overlay
//! and encode. Geometry *decisions* never happen here; the
//! [`operations`](super::operations) module computes every size and offset
//! and the backend only executes them.
//!
//! Every transform borrows its input and returns a new image, so a failed
//! call leaves the caller's image exactly as it was.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::calculations::PaddingPlan;
use super::params::ResampleFilter;
use crate::types::{Dimensions, ExportFormat, Rgba};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Decoded raster owned by the backend.
    type Image;

    /// Decode an encoded image of any compiled-in format.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, BackendError>;

    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resample to exactly `size`, ignoring aspect ratio.
    fn resize(
        &self,
        image: &Self::Image,
        size: Dimensions,
        filter: ResampleFilter,
    ) -> Result<Self::Image, BackendError>;

    /// Crop to exactly `size`, placing the window over the most salient
    /// region. Fails when `size` is empty or larger than the image.
    fn attention_crop(&self, image: &Self::Image, size: Dimensions)
    -> Result<Self::Image, BackendError>;

    /// Place the image on a `plan.canvas` sized canvas filled with
    /// `background`, at `(plan.left, plan.top)`. Pixels are copied, not blended.
    fn embed(
        &self,
        image: &Self::Image,
        plan: &PaddingPlan,
        background: Rgba,
    ) -> Result<Self::Image, BackendError>;

    /// Alpha-blend `overlay` onto `base` at `(x, y)`. Offsets may be negative;
    /// whatever falls outside `base` is dropped.
    fn overlay(
        &self,
        base: &Self::Image,
        overlay: &Self::Image,
        x: i64,
        y: i64,
    ) -> Result<Self::Image, BackendError>;

    fn encode(&self, image: &Self::Image, format: ExportFormat) -> Result<Vec<u8>, BackendError>;
}
