//! Whole-file writes under the output root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GenError, Result};

/// What happened to a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WriteState {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "overwritten")]
    Overwritten,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub state: WriteState,
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// Existing files are replaced without diffing.
pub fn write_file(path: &Path, contents: &str) -> Result<WrittenFile> {
    let fs_error = |source| GenError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(fs_error)?;
    }

    let state = if path.exists() {
        WriteState::Overwritten
    } else {
        WriteState::Created
    };
    fs::write(path, contents).map_err(fs_error)?;

    Ok(WrittenFile {
        path: path.to_path_buf(),
        state,
    })
}
