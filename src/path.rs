// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for project files that need to be
//! interacted with, or managed in some way.

use crate::config::CONFIG_FILE_NAME;

use std::path::{Path, PathBuf};

/// Determine absolute path to project root.
///
/// Walks up from `start` until a directory containing a project configuration
/// file is found.
///
/// # Errors
///
/// - Return [`NoProjectRoot`] if no ancestor of `start` holds a project
///   configuration file.
pub fn find_project_root(start: impl AsRef<Path>) -> Result<PathBuf> {
    start
        .as_ref()
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| NoProjectRoot {
            start: start.as_ref().to_path_buf(),
        })
}

/// Path to index file of a custom type inside a custom types directory.
pub fn custom_type_index(custom_types_dir: impl AsRef<Path>, id: &str) -> PathBuf {
    custom_types_dir.as_ref().join(id).join("index.json")
}

/// Path to model file of a slice inside its slice directory.
pub fn slice_model(slice_dir: impl AsRef<Path>) -> PathBuf {
    slice_dir.as_ref().join("model.json")
}

/// Path to screenshot of a variation inside its slice directory.
pub fn variation_screenshot(slice_dir: impl AsRef<Path>, variation_id: &str) -> PathBuf {
    slice_dir
        .as_ref()
        .join(format!("screenshot-{variation_id}.png"))
}

/// No project configuration file in any ancestor directory.
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot find slicemachine.toml in {:?} or any parent directory", start.display())]
pub struct NoProjectRoot {
    start: PathBuf,
}

/// Friendly result alias :3
pub type Result<T, E = NoProjectRoot> = std::result::Result<T, E>;
