//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF, TIFF, BMP) | `image::load_from_memory` |
//! | Resize | `image::imageops::resize` with the configured filter |
//! | Attention crop | [`find_attention_window`](super::attention::find_attention_window) + `DynamicImage::crop_imm` |
//! | Canvas embed | `RgbaImage::from_pixel` + `image::imageops::replace` |
//! | Watermark | `image::imageops::overlay` (straight alpha blend) |
//! | Encode | `DynamicImage::write_to`; JPEG is flattened to RGB first |
//!
//! Resizes and canvas expansions are checked against a pixel budget before
//! anything is allocated, so an oversized request fails with
//! [`BackendError::ProcessingFailed`] instead of aborting the process.
//!
//! JPEG 2000 has no encoder in the `image` ecosystem, so `jp2` output is
//! reported as [`BackendError::Unsupported`].

use super::attention::find_attention_window;
use super::backend::{BackendError, ImageBackend};
use super::calculations::PaddingPlan;
use super::params::ResampleFilter;
use crate::config::DEFAULT_MAX_PIXELS;
use crate::types::{Dimensions, ExportFormat, Rgba};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone)]
pub struct RustBackend {
    analysis_size: u32,
    max_pixels: u64,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::with_analysis_size(256)
    }

    /// Longest edge of the interest map used by [`ImageBackend::attention_crop`].
    pub fn with_analysis_size(analysis_size: u32) -> Self {
        Self {
            analysis_size,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Largest raster, in pixels, a resize or embed may produce.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    fn check_budget(&self, what: &str, size: Dimensions) -> Result<(), BackendError> {
        let pixels = u64::from(size.width) * u64::from(size.height);
        let addressable = pixels
            .checked_mul(4)
            .is_some_and(|bytes| usize::try_from(bytes).is_ok());
        if pixels > self.max_pixels || !addressable {
            return Err(BackendError::ProcessingFailed(format!(
                "{what} {size} exceeds the limit of {} pixels",
                self.max_pixels
            )));
        }
        Ok(())
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 | ResampleFilter::Auto => FilterType::Lanczos3,
    }
}

fn dimensions_of(image: &DynamicImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions::new(width, height)
}

/// Convert to a pixel layout the target encoder accepts.
fn prepare_for(image: &DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormat::WebP | ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => match image {
            DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_) => image.clone(),
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        },
    }
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes)
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {e}")))
    }

    fn dimensions(&self, image: &DynamicImage) -> Dimensions {
        dimensions_of(image)
    }

    fn resize(
        &self,
        image: &DynamicImage,
        size: Dimensions,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, BackendError> {
        if size.is_empty() {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot resize to empty box {size}"
            )));
        }
        self.check_budget("resize to", size)?;
        let filter = filter.select(dimensions_of(image), size);
        Ok(image.resize_exact(size.width, size.height, filter_type(filter)))
    }

    fn attention_crop(
        &self,
        image: &DynamicImage,
        size: Dimensions,
    ) -> Result<DynamicImage, BackendError> {
        let current = dimensions_of(image);
        if size.is_empty() {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot crop to empty box {size}"
            )));
        }
        if size.exceeds(current) {
            return Err(BackendError::ProcessingFailed(format!(
                "crop box {size} is larger than image {current}"
            )));
        }
        if size == current {
            return Ok(image.clone());
        }

        let (x, y) = find_attention_window(&image.to_rgba8(), size, self.analysis_size);
        Ok(image.crop_imm(x, y, size.width, size.height))
    }

    fn embed(
        &self,
        image: &DynamicImage,
        plan: &PaddingPlan,
        background: Rgba,
    ) -> Result<DynamicImage, BackendError> {
        let current = dimensions_of(image);
        self.check_budget("canvas", plan.canvas)?;
        let fits_width = u64::from(plan.left) + u64::from(current.width)
            <= u64::from(plan.canvas.width);
        let fits_height = u64::from(plan.top) + u64::from(current.height)
            <= u64::from(plan.canvas.height);
        if plan.canvas.is_empty() || !fits_width || !fits_height {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot place {current} at ({}, {}) on a {} canvas",
                plan.left, plan.top, plan.canvas
            )));
        }

        let mut canvas = RgbaImage::from_pixel(
            plan.canvas.width,
            plan.canvas.height,
            image::Rgba(background.0),
        );
        imageops::replace(
            &mut canvas,
            &image.to_rgba8(),
            i64::from(plan.left),
            i64::from(plan.top),
        );
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn overlay(
        &self,
        base: &DynamicImage,
        overlay: &DynamicImage,
        x: i64,
        y: i64,
    ) -> Result<DynamicImage, BackendError> {
        let mut canvas = base.to_rgba8();
        imageops::overlay(&mut canvas, &overlay.to_rgba8(), x, y);
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn encode(&self, image: &DynamicImage, format: ExportFormat) -> Result<Vec<u8>, BackendError> {
        let image_format = match format {
            ExportFormat::Webp => ImageFormat::WebP,
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Gif => ImageFormat::Gif,
            ExportFormat::Jp2 => {
                return Err(BackendError::Unsupported(
                    "no JPEG 2000 encoder is compiled into this backend".into(),
                ));
            }
        };

        let mut buffer = Cursor::new(Vec::new());
        prepare_for(image, image_format)
            .write_to(&mut buffer, image_format)
            .map_err(|e| BackendError::ProcessingFailed(format!("{format} encode failed: {e}")))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        assert!(backend.decode(b"definitely not an image").is_err());
    }

    #[test]
    fn resize_to_exact_box() {
        let backend = RustBackend::new();
        let resized = backend
            .resize(&gradient(600, 400), Dimensions::new(300, 200), ResampleFilter::Auto)
            .unwrap();
        assert_eq!(backend.dimensions(&resized), Dimensions::new(300, 200));
    }

    #[test]
    fn resize_to_empty_box_errors() {
        let backend = RustBackend::new();
        let result = backend.resize(&gradient(10, 10), Dimensions::new(0, 5), ResampleFilter::Auto);
        assert!(result.is_err());
    }

    #[test]
    fn resize_over_pixel_budget_errors() {
        let backend = RustBackend::new().with_max_pixels(100);
        let source = gradient(10, 10);
        assert!(backend
            .resize(&source, Dimensions::new(10, 10), ResampleFilter::Auto)
            .is_ok());
        let err = backend
            .resize(&source, Dimensions::new(11, 10), ResampleFilter::Auto)
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"));
    }

    #[test]
    fn resize_to_max_dimensions_errors_before_allocating() {
        let backend = RustBackend::new();
        let result = backend.resize(
            &gradient(10, 10),
            Dimensions::new(u32::MAX, u32::MAX),
            ResampleFilter::Auto,
        );
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn embed_huge_canvas_errors_before_allocating() {
        let backend = RustBackend::new();
        let plan = PaddingPlan {
            canvas: Dimensions::new(u32::MAX, u32::MAX),
            left: 0,
            top: 0,
        };
        assert!(matches!(
            backend.embed(&gradient(10, 10), &plan, Rgba::TRANSPARENT_WHITE),
            Err(BackendError::ProcessingFailed(_))
        ));
    }

    #[test]
    fn attention_crop_exact_size() {
        let backend = RustBackend::new();
        let cropped = backend
            .attention_crop(&gradient(600, 400), Dimensions::new(100, 100))
            .unwrap();
        assert_eq!(backend.dimensions(&cropped), Dimensions::new(100, 100));
    }

    #[test]
    fn attention_crop_rejects_oversized_box() {
        let backend = RustBackend::new();
        assert!(backend
            .attention_crop(&gradient(100, 100), Dimensions::new(101, 10))
            .is_err());
        assert!(backend
            .attention_crop(&gradient(100, 100), Dimensions::new(0, 10))
            .is_err());
    }

    #[test]
    fn embed_places_source_on_background() {
        let backend = RustBackend::new();
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            10,
            image::Rgba([1, 2, 3, 255]),
        ));
        let plan = PaddingPlan {
            canvas: Dimensions::new(30, 20),
            left: 10,
            top: 5,
        };
        let embedded = backend
            .embed(&source, &plan, Rgba::TRANSPARENT_WHITE)
            .unwrap()
            .to_rgba8();

        assert_eq!(embedded.dimensions(), (30, 20));
        assert_eq!(embedded.get_pixel(0, 0).0, [255, 255, 255, 0]);
        assert_eq!(embedded.get_pixel(10, 5).0, [1, 2, 3, 255]);
        assert_eq!(embedded.get_pixel(19, 14).0, [1, 2, 3, 255]);
        assert_eq!(embedded.get_pixel(20, 14).0, [255, 255, 255, 0]);
    }

    #[test]
    fn embed_rejects_plan_that_clips_source() {
        let backend = RustBackend::new();
        let plan = PaddingPlan {
            canvas: Dimensions::new(15, 15),
            left: 10,
            top: 0,
        };
        assert!(backend
            .embed(&gradient(10, 10), &plan, Rgba::TRANSPARENT_WHITE)
            .is_err());
    }

    #[test]
    fn overlay_blends_by_alpha_and_clips() {
        let backend = RustBackend::new();
        let base = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            image::Rgba([0, 0, 0, 255]),
        ));
        let mark = DynamicImage::ImageRgba8(RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([255, 255, 255, 0])
            }
        }));

        let merged = backend.overlay(&base, &mark, -1, 0).unwrap().to_rgba8();
        assert_eq!(merged.dimensions(), (4, 4));
        // Column 1 of the mark lands on column 0 of the base.
        assert_eq!(merged.get_pixel(0, 0).0, [255, 255, 255, 255]);
        // Transparent mark pixels leave the base untouched.
        assert_eq!(merged.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(merged.get_pixel(3, 3).0, [0, 0, 0, 255]);
    }

    #[test]
    fn encode_round_trips_dimensions() {
        let backend = RustBackend::new();
        let source = gradient(64, 48);
        for format in [
            ExportFormat::Webp,
            ExportFormat::Png,
            ExportFormat::Jpeg,
            ExportFormat::Gif,
        ] {
            let bytes = backend.encode(&source, format).unwrap();
            assert!(!bytes.is_empty(), "{format} produced no bytes");
            let decoded = backend.decode(&bytes).unwrap();
            assert_eq!(
                backend.dimensions(&decoded),
                Dimensions::new(64, 48),
                "{format} changed dimensions"
            );
        }
    }

    #[test]
    fn encode_jpeg_flattens_alpha() {
        let backend = RustBackend::new();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([10, 20, 30, 128]),
        ));
        let bytes = backend.encode(&rgba, ExportFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn encode_jp2_is_unsupported() {
        let backend = RustBackend::new();
        let err = backend.encode(&gradient(8, 8), ExportFormat::Jp2).unwrap_err();
        assert!(matches!(err, BackendError::Unsupported(_)));
    }
}
