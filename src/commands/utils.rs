//! Utility functions for command implementation

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Check that `path` exists and is a directory
pub fn existing_dir(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}
