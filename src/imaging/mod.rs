//! Image processing: geometry decisions on top of a pixel backend.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Decode / encode** | `image` crate codecs |
//! | **Scale** | `resize_exact` with Lanczos3 / Catmull-Rom |
//! | **Attention crop** | Sobel + saturation + skin interest map, summed-area window search |
//! | **Canvas padding** | `imageops::replace` onto a solid canvas |
//! | **Watermark** | `imageops::overlay` at a centered offset |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Validated value types describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Handle**: [`ImageHandle`], the single owner of a decoded image
//! - **Operations**: Transforms on [`ImageHandle`] combining calculations + backend

mod attention;
pub mod backend;
mod calculations;
mod handle;
mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    PaddingPlan, centered_offset, crop_request, fill_dimensions, fit_dimensions, plan_padding,
    resolve_dimensions, resolve_target, scaled_dimensions,
};
pub use handle::ImageHandle;
pub use params::{DimensionRequest, ResampleFilter, ScaleFactor, ThumbnailMode};
pub use rust_backend::RustBackend;
