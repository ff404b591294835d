//! Public operation surface.
//!
//! Every operation is one synchronous pipeline:
//!
//! ```text
//! resolve source → decode → (resolve dimensions → pad) → transform → encode → write
//! ```
//!
//! Each stage returns early on failure, so nothing is written unless the
//! encoded payload is complete. Failures are logged once, here, with their
//! full cause chain; the error itself is returned untouched.
//!
//! [`Optimizer`] holds the configuration and backend. The free functions at
//! the bottom of this module use a default optimizer and accept the format
//! as a string.

use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, Result};
use crate::imaging::{
    ImageBackend, ImageHandle, RustBackend, ScaleFactor, ThumbnailMode, crop_request,
    resolve_dimensions,
};
use crate::output::write_output;
use crate::source::read_source;
use crate::types::{AspectRatio, Dimensions, ExportFormat};
use log::{debug, error, info};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Image optimizer bound to a backend and configuration.
pub struct Optimizer<B: ImageBackend = RustBackend> {
    backend: B,
    config: OptimizerConfig,
}

impl Optimizer<RustBackend> {
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new(), OptimizerConfig::default())
    }

    /// Validate `config` and build a [`RustBackend`] from it.
    pub fn with_config(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let backend = RustBackend::with_analysis_size(config.attention.analysis_size)
            .with_max_pixels(config.limits.max_pixels);
        Ok(Self::with_backend(backend, config))
    }
}

impl Default for Optimizer<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

/// `err` followed by each of its sources, separated by `: `.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Log a failed operation once, with its cause chain.
fn logged<T>(operation: &str, input: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        error!("{operation} failed for {input}: {}", error_chain(err));
    }
    result
}

impl<B: ImageBackend> Optimizer<B> {
    pub fn with_backend(backend: B, config: OptimizerConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read and decode an image from a path or `http(s)` URL.
    pub fn load(&self, locator: &str) -> Result<ImageHandle<'_, B>> {
        let bytes = read_source(locator, &self.config.fetch)?;
        let image = self
            .backend
            .decode(&bytes)
            .map_err(|source| OptimizerError::DecodeFailed {
                locator: locator.to_string(),
                source,
            })?;
        let handle = ImageHandle::new(&self.backend, image);
        debug!("decoded {locator} as {}", handle.dimensions());
        Ok(handle)
    }

    /// Serialize `image` without touching the filesystem.
    pub fn encode(&self, image: &ImageHandle<'_, B>, format: ExportFormat) -> Result<Vec<u8>> {
        image.encode(format)
    }

    /// Encode `image` and write it to `output` plus the format's extension.
    pub fn save(
        &self,
        image: &ImageHandle<'_, B>,
        output: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let bytes = self.encode(image, format)?;
        let path = write_output(output, format, &bytes)?;
        info!("wrote {} {format} image to {}", image.dimensions(), path.display());
        Ok(path)
    }

    /// Scale both sides by `scale` (0.5 halves, 2.0 doubles).
    pub fn resize_image(
        &self,
        input: &str,
        output: &Path,
        scale: f64,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let result = ScaleFactor::new(scale).and_then(|scale| {
            let image = self
                .load(input)?
                .scale(scale, self.config.resize.filter)?;
            self.save(&image, output, format)
        });
        logged("resize_image", input, result)
    }

    /// Attention-crop to a box derived from `aspect_ratio`.
    ///
    /// `target_width` wins over `target_height`; `0` means "not given", and
    /// with neither given the image's own width is used. The image is padded
    /// with the configured background first when the box is larger than it.
    pub fn image_crop(
        &self,
        input: &str,
        output: &Path,
        aspect_ratio: f64,
        target_width: u32,
        target_height: u32,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let result = AspectRatio::new(aspect_ratio).and_then(|ratio| {
            let image = self.load(input)?;
            let request = crop_request(target_width, target_height, image.dimensions());
            let target = resolve_dimensions(request, ratio);
            debug!("crop target for {input}: {target}");

            let image = image
                .expand_for_crop(target, self.config.canvas.background)?
                .attention_crop(target)?;
            self.save(&image, output, format)
        });
        logged("image_crop", input, result)
    }

    /// Resize to fit inside `width` x `height`, preserving aspect ratio.
    pub fn create_thumbnail(
        &self,
        input: &str,
        output: &Path,
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let result = self.thumbnail(input, output, width, height, ThumbnailMode::Fit, format);
        logged("create_thumbnail", input, result)
    }

    /// Resize and attention-crop to exactly `width` x `height`.
    pub fn create_thumbnail_with_size(
        &self,
        input: &str,
        output: &Path,
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let result = self.thumbnail(input, output, width, height, ThumbnailMode::ExactBox, format);
        logged("create_thumbnail_with_size", input, result)
    }

    fn thumbnail(
        &self,
        input: &str,
        output: &Path,
        width: u32,
        height: u32,
        mode: ThumbnailMode,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let image = self.load(input)?.thumbnail(
            Dimensions::new(width, height),
            mode,
            self.config.resize.filter,
        )?;
        self.save(&image, output, format)
    }

    /// Blend the image at `watermark` onto the center of `input`.
    pub fn add_watermark(
        &self,
        input: &str,
        watermark: &str,
        output: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let result = self.load(input).and_then(|image| {
            let mark = self.load(watermark)?;
            let image = image.composite(mark)?;
            self.save(&image, output, format)
        });
        logged("add_watermark", input, result)
    }
}

fn parse_format(operation: &str, input: &str, format: &str) -> Result<ExportFormat> {
    logged(operation, input, format.parse())
}

/// [`Optimizer::resize_image`] with default configuration.
pub fn resize_image(input: &str, output: impl AsRef<Path>, scale: f64, format: &str) -> Result<PathBuf> {
    let format = parse_format("resize_image", input, format)?;
    Optimizer::new().resize_image(input, output.as_ref(), scale, format)
}

/// [`Optimizer::image_crop`] with default configuration.
pub fn image_crop(
    input: &str,
    output: impl AsRef<Path>,
    aspect_ratio: f64,
    target_width: u32,
    target_height: u32,
    format: &str,
) -> Result<PathBuf> {
    let format = parse_format("image_crop", input, format)?;
    Optimizer::new().image_crop(
        input,
        output.as_ref(),
        aspect_ratio,
        target_width,
        target_height,
        format,
    )
}

/// [`Optimizer::create_thumbnail`] with default configuration.
pub fn create_thumbnail(
    input: &str,
    output: impl AsRef<Path>,
    width: u32,
    height: u32,
    format: &str,
) -> Result<PathBuf> {
    let format = parse_format("create_thumbnail", input, format)?;
    Optimizer::new().create_thumbnail(input, output.as_ref(), width, height, format)
}

/// [`Optimizer::create_thumbnail_with_size`] with default configuration.
pub fn create_thumbnail_with_size(
    input: &str,
    output: impl AsRef<Path>,
    width: u32,
    height: u32,
    format: &str,
) -> Result<PathBuf> {
    let format = parse_format("create_thumbnail_with_size", input, format)?;
    Optimizer::new().create_thumbnail_with_size(input, output.as_ref(), width, height, format)
}

/// [`Optimizer::add_watermark`] with default configuration.
pub fn add_watermark(
    input: &str,
    watermark: &str,
    output: impl AsRef<Path>,
    format: &str,
) -> Result<PathBuf> {
    let format = parse_format("add_watermark", input, format)?;
    Optimizer::new().add_watermark(input, watermark, output.as_ref(), format)
}
