//! High-level image operations.
//!
//! These combine the pure [`calculations`](super::calculations) with backend
//! execution: every size and offset is computed here, then a single backend
//! call carries it out. Each operation consumes an [`ImageHandle`] and
//! returns the transformed one, mapping backend failures onto the crate's
//! error taxonomy.

use super::backend::ImageBackend;
use super::calculations::{
    centered_offset, fill_dimensions, fit_dimensions, plan_padding, scaled_dimensions,
};
use super::handle::ImageHandle;
use super::params::{ResampleFilter, ScaleFactor, ThumbnailMode};
use super::BackendError;
use crate::error::{OptimizerError, Result};
use crate::types::{Dimensions, ExportFormat, Rgba};
use log::debug;

impl<'b, B: ImageBackend> ImageHandle<'b, B> {
    /// Pad the canvas so that a crop to `target` is possible.
    ///
    /// A no-op when `target` already fits inside the image.
    pub fn expand_for_crop(self, target: Dimensions, background: Rgba) -> Result<Self> {
        let current = self.dimensions();
        let Some(plan) = plan_padding(current, target) else {
            return Ok(self);
        };
        debug!(
            "expanding {current} canvas to {} (content at {}, {}) for {target} crop",
            plan.canvas, plan.left, plan.top
        );

        self.try_map(|backend, image| backend.embed(image, &plan, background))
            .map_err(|source| OptimizerError::CompositionFailed {
                context: format!("expanding {current} canvas to {}", plan.canvas),
                source,
            })
    }

    /// Uniformly resize by `scale`.
    pub fn scale(self, scale: ScaleFactor, filter: ResampleFilter) -> Result<Self> {
        let target = scaled_dimensions(self.dimensions(), scale);
        debug!("scaling {} by {} to {target}", self.dimensions(), scale.value());

        self.try_map(|backend, image| backend.resize(image, target, filter))
            .map_err(|source| OptimizerError::GeometryOperationFailed {
                operation: "scale",
                source,
            })
    }

    /// Crop to exactly `size`, keeping the most salient region.
    ///
    /// The image must be at least `size` on both axes; run
    /// [`expand_for_crop`](Self::expand_for_crop) first when it may not be.
    pub fn attention_crop(self, size: Dimensions) -> Result<Self> {
        debug!("attention crop {} to {size}", self.dimensions());

        self.try_map(|backend, image| backend.attention_crop(image, size))
            .map_err(|source| OptimizerError::CropFailed {
                width: size.width,
                height: size.height,
                source,
            })
    }

    /// Resize into `bounds`: fit inside it, or fill and crop to it exactly.
    pub fn thumbnail(
        self,
        bounds: Dimensions,
        mode: ThumbnailMode,
        filter: ResampleFilter,
    ) -> Result<Self> {
        let operation = match mode {
            ThumbnailMode::Fit => "thumbnail",
            ThumbnailMode::ExactBox => "thumbnail (exact box)",
        };
        if bounds.is_empty() {
            return Err(OptimizerError::GeometryOperationFailed {
                operation,
                source: BackendError::ProcessingFailed(format!("empty thumbnail box {bounds}")),
            });
        }

        let current = self.dimensions();
        let result = match mode {
            ThumbnailMode::Fit => {
                let target = fit_dimensions(current, bounds);
                debug!("thumbnail fit {current} into {bounds} → {target}");
                self.try_map(|backend, image| backend.resize(image, target, filter))
            }
            ThumbnailMode::ExactBox => {
                let fill = fill_dimensions(current, bounds);
                debug!("thumbnail fill {current} to {fill}, crop to {bounds}");
                self.try_map(|backend, image| {
                    let filled = if fill == current {
                        None
                    } else {
                        Some(backend.resize(image, fill, filter)?)
                    };
                    backend.attention_crop(filled.as_ref().unwrap_or(image), bounds)
                })
            }
        };
        result.map_err(|source| OptimizerError::GeometryOperationFailed { operation, source })
    }

    /// Blend `overlay` onto the center of this image.
    ///
    /// The overlay is consumed. Offsets go negative when the overlay is larger
    /// than this image; the part outside the canvas is dropped.
    pub fn composite(self, overlay: ImageHandle<'b, B>) -> Result<Self> {
        let base = self.dimensions();
        let mark = overlay.dimensions();
        let (x, y) = centered_offset(base, mark);
        debug!("compositing {mark} overlay onto {base} at ({x}, {y})");

        self.try_map(|backend, image| backend.overlay(image, overlay.image(), x, y))
            .map_err(|source| OptimizerError::CompositionFailed {
                context: format!("placing {mark} overlay at ({x}, {y}) on {base}"),
                source,
            })
    }

    /// Encode with the format's default parameters.
    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let bytes = self
            .backend()
            .encode(self.image(), format)
            .map_err(|source| OptimizerError::EncodeFailed { format, source })?;
        if bytes.is_empty() {
            return Err(OptimizerError::EncodeFailed {
                format,
                source: BackendError::ProcessingFailed("encoder produced no data".into()),
            });
        }
        debug!("encoded {} as {format} ({} bytes)", self.dimensions(), bytes.len());
        Ok(bytes)
    }
}
