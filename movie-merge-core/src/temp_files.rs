//! Temporary file management.
//!
//! Each merge job gets its own temporary directory for normalized
//! intermediates and the concat list. The tempfile crate's Drop handling
//! releases everything on success and failure alike.

use crate::error::CoreResult;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Creates a temporary directory with prefix under `base`. Auto-cleaned when dropped.
pub fn create_temp_dir(base: &Path, prefix: &str) -> CoreResult<TempDir> {
    std::fs::create_dir_all(base)?;

    Ok(TempFileBuilder::new().prefix(prefix).tempdir_in(base)?)
}
