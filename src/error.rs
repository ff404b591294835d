//! Error taxonomy for every public operation.
//!
//! Each variant corresponds to one pipeline stage. Stage errors carry the
//! root cause as their [`source`](std::error::Error::source), so callers can
//! walk the chain down to the codec, I/O or HTTP error that triggered it.

use crate::config::ConfigError;
use crate::imaging::BackendError;
use crate::types::ExportFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed transport error (filesystem or HTTP) behind a [`OptimizerError::SourceUnavailable`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("source unavailable: {locator}")]
    SourceUnavailable {
        locator: String,
        #[source]
        source: TransportError,
    },
    #[error("failed to decode image from {locator}")]
    DecodeFailed {
        locator: String,
        #[source]
        source: BackendError,
    },
    #[error("invalid dimension request: {0}")]
    InvalidDimensionRequest(String),
    #[error("invalid scale factor {0}: must be finite and greater than zero")]
    InvalidScale(f64),
    #[error("crop to {width}x{height} failed")]
    CropFailed {
        width: u32,
        height: u32,
        #[source]
        source: BackendError,
    },
    #[error("{operation} failed")]
    GeometryOperationFailed {
        operation: &'static str,
        #[source]
        source: BackendError,
    },
    #[error("composition failed: {context}")]
    CompositionFailed {
        context: String,
        #[source]
        source: BackendError,
    },
    #[error("unsupported export format: {0:?} (expected one of webp, png, jpeg, jp2, gif)")]
    UnsupportedFormat(String),
    #[error("encoding as {format} failed")]
    EncodeFailed {
        format: ExportFormat,
        #[source]
        source: BackendError,
    },
    #[error("writing {} failed", path.display())]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for every public operation.
pub type Result<T> = std::result::Result<T, OptimizerError>;
