//! Single-owner image handle.
//!
//! An [`ImageHandle`] owns one decoded raster together with the backend that
//! produced it. Every transform takes the handle by value and hands back a
//! new one, so an image is never aliased between two operations and a failed
//! transform can never leave a half-edited image behind. Dropping the handle
//! releases the raster.

use super::backend::{BackendError, ImageBackend};
use crate::types::Dimensions;
use std::fmt;

pub struct ImageHandle<'b, B: ImageBackend> {
    backend: &'b B,
    image: B::Image,
}

impl<'b, B: ImageBackend> ImageHandle<'b, B> {
    pub(crate) fn new(backend: &'b B, image: B::Image) -> Self {
        Self { backend, image }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.backend.dimensions(&self.image)
    }

    pub fn width(&self) -> u32 {
        self.dimensions().width
    }

    pub fn height(&self) -> u32 {
        self.dimensions().height
    }

    pub(crate) fn backend(&self) -> &'b B {
        self.backend
    }

    pub(crate) fn image(&self) -> &B::Image {
        &self.image
    }

    /// Release the handle and return the backend's raster.
    pub fn into_inner(self) -> B::Image {
        self.image
    }

    /// Replace the raster with the result of `f`, or keep nothing on error.
    pub(crate) fn try_map(
        self,
        f: impl FnOnce(&B, &B::Image) -> Result<B::Image, BackendError>,
    ) -> Result<Self, BackendError> {
        let image = f(self.backend, &self.image)?;
        Ok(Self {
            backend: self.backend,
            image,
        })
    }
}

impl<B: ImageBackend> fmt::Debug for ImageHandle<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("dimensions", &self.dimensions())
            .finish_non_exhaustive()
    }
}
