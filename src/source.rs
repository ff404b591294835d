//! Input retrieval: local files and `http`/`https` URLs.
//!
//! Any locator starting with `http` is fetched over the network; everything
//! else is read from disk. The whole payload is read into memory and every
//! file handle or connection is closed before the bytes are returned, on
//! success and on failure alike.

use crate::config::FetchConfig;
use crate::error::{OptimizerError, Result, TransportError};
use log::debug;
use reqwest::blocking::Client;
use std::fs;

/// True for locators fetched over HTTP.
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http")
}

/// Read the raw bytes behind `locator`.
///
/// Transport failures (missing file, unreachable host, non-2xx status,
/// timeout) are [`OptimizerError::SourceUnavailable`].
pub fn read_source(locator: &str, fetch: &FetchConfig) -> Result<Vec<u8>> {
    let bytes = if is_remote(locator) {
        fetch_remote(locator, fetch).map_err(|e| unavailable(locator, e.into()))?
    } else {
        fs::read(locator).map_err(|e| unavailable(locator, e.into()))?
    };
    debug!("read {} bytes from {locator}", bytes.len());
    Ok(bytes)
}

fn unavailable(locator: &str, source: TransportError) -> OptimizerError {
    OptimizerError::SourceUnavailable {
        locator: locator.to_string(),
        source,
    }
}

fn fetch_remote(url: &str, fetch: &FetchConfig) -> std::result::Result<Vec<u8>, reqwest::Error> {
    let client = Client::builder()
        .timeout(fetch.timeout())
        .user_agent(fetch.user_agent.as_str())
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    let body = response.bytes()?;
    Ok(body.to_vec())
}
