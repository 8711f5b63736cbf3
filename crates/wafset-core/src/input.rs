//! Loading the desired CIDR delta
//!
//! The delta comes from an inline comma-separated list, a newline-separated
//! file, or both. Invalid entries are dropped by [`crate::cidr::filter_valid`].

use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::cidr::filter_valid;
use crate::error::Result;

/// Parse an inline comma-separated CIDR list
pub fn from_data(data: &str) -> Vec<String> {
    filter_valid(data.split(','))
}

/// Parse the contents of a newline-separated CIDR list
pub fn from_lines(contents: &str) -> Vec<String> {
    filter_valid(contents.lines())
}

/// Read a newline-separated CIDR list from a file
///
/// Lines that are not valid UTF-8 are decoded lossily, then dropped by the
/// CIDR check like any other malformed entry.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read.
pub async fn from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    info!("loading IP list from file [{}]", path.display());

    let bytes = fs::read(path).await?;
    Ok(from_lines(&String::from_utf8_lossy(&bytes)))
}

/// Load the delta from the configured sources
///
/// Inline entries come first, followed by file entries.
///
/// # Returns
///
/// - `Ok(None)`: Neither source was given
/// - `Ok(Some(list))`: The valid entries (possibly empty)
/// - `Err(Error)`: The file could not be read
pub async fn load(data: Option<&str>, file: Option<&Path>) -> Result<Option<Vec<String>>> {
    let data = data.filter(|d| !d.trim().is_empty());
    let file = file.filter(|f| !f.as_os_str().is_empty());

    if data.is_none() && file.is_none() {
        return Ok(None);
    }

    let mut addresses = data.map(from_data).unwrap_or_default();

    if let Some(path) = file {
        addresses.extend(from_file(path).await?);
    }

    Ok(Some(addresses))
}
