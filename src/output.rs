//! Persistence of encoded output.
//!
//! Callers pass an output path *without* extension; the format's extension
//! is appended (`jpeg` is written as `.jpg`). The file is created or
//! truncated, written in full and synced before returning.
//!
//! A failure after the file has been created leaves whatever was already
//! written on disk. Nothing is rolled back; the error reports the path.

use crate::error::{OptimizerError, Result};
use crate::types::ExportFormat;
use log::debug;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `base` with `.{extension}` appended, keeping any dots already in it.
pub fn output_path(base: &Path, format: ExportFormat) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(format.extension());
    PathBuf::from(path)
}

/// Write `data` to `base.{ext}` and flush it to storage.
pub fn write_output(base: &Path, format: ExportFormat, data: &[u8]) -> Result<PathBuf> {
    let path = output_path(base, format);
    let persist = |source: std::io::Error| OptimizerError::PersistenceFailed {
        path: path.clone(),
        source,
    };

    let mut file = File::create(&path).map_err(persist)?;
    file.write_all(data).map_err(persist)?;
    file.sync_all().map_err(persist)?;

    debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(path)
}
