//! # Image Optimizer
//!
//! Deterministic, parameterized image edits for media pipelines and CMS
//! backends: scale, attention-guided crop to an aspect ratio, thumbnails,
//! and centered watermarks, re-encoded as WebP, PNG, JPEG or GIF.
//!
//! # Architecture: One Pipeline Per Call
//!
//! Every public operation runs the same synchronous pipeline on the
//! caller's thread:
//!
//! ```text
//! 1. Source      path or http(s) URL  →  bytes
//! 2. Decode      bytes                →  ImageHandle
//! 3. Geometry    target box, padding, crop window, overlay offset
//! 4. Encode      ImageHandle          →  bytes in the export format
//! 5. Persist     bytes                →  <output>.<ext>
//! ```
//!
//! Each stage fails fast. Nothing touches the output path until the encoded
//! payload exists, and there is no process-wide state: concurrent calls on
//! different images need no coordination.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`optimizer`] | Public operations: [`resize_image`], [`image_crop`], [`create_thumbnail`], [`create_thumbnail_with_size`], [`add_watermark`] |
//! | [`imaging`] | Geometry math, the [`ImageBackend`](imaging::ImageBackend) trait, [`ImageHandle`](imaging::ImageHandle) transforms |
//! | [`source`] | Reads input bytes from disk or over HTTP |
//! | [`output`] | Writes encoded bytes to `<path>.<ext>` and syncs them |
//! | [`config`] | Optional TOML configuration (canvas color, filter, fetch timeout) |
//! | [`types`] | Shared values: [`Dimensions`], [`AspectRatio`], [`ExportFormat`], [`Rgba`] |
//! | [`error`] | [`OptimizerError`], one variant per pipeline failure |
//!
//! # Design Decisions
//!
//! ## Geometry Is Computed, Pixels Are Delegated
//!
//! Every size, padding offset and overlay position comes from the pure
//! functions in [`imaging`]; the backend only executes them. The geometry is
//! therefore tested without decoding a single pixel, against a mock backend
//! that records what it was asked to do.
//!
//! ## Consume-and-Return Handles
//!
//! Transforms take an [`ImageHandle`](imaging::ImageHandle) by value and
//! return the edited one. An image has exactly one owner, and a failed
//! transform drops the handle instead of leaving a half-edited image around.
//!
//! ## Truncating Dimension Math
//!
//! A side derived from an aspect ratio is truncated, not rounded:
//! width 100 at ratio 1.5 gives height 66. Callers relying on exact pixel
//! counts get the same numbers every time.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and installs no logger. Each
//! failed operation is logged once at `error` level with its cause chain;
//! stages log at `debug`.

pub mod config;
pub mod error;
pub mod imaging;
pub mod optimizer;
pub mod output;
pub mod source;
pub mod types;

pub use config::{OptimizerConfig, load_config};
pub use error::{OptimizerError, Result};
pub use optimizer::{
    Optimizer, add_watermark, create_thumbnail, create_thumbnail_with_size, image_crop,
    resize_image,
};
pub use types::{AspectRatio, Dimensions, ExportFormat, Rgba};
