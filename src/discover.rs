// src/discover.rs

//! Tool-path discovery.
//!
//! The supervision core never searches the filesystem itself; it receives
//! a resolved executable path. This module is the discovery collaborator:
//! an explicit path in the config is used as given, a bare name is
//! searched on `PATH`. If nothing resolves, the entry point fails fast
//! with [`CommitgenError::ToolNotFound`] before any run is attempted.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{CommitgenError, Result};

/// Resolve `bin` to an executable path.
pub fn resolve_tool_path(bin: &str) -> Result<PathBuf> {
    let given = Path::new(bin);

    // Anything with a directory component is a path, not a name to search.
    if given.components().count() > 1 {
        if given.is_file() {
            return Ok(given.to_path_buf());
        }
        return Err(CommitgenError::ToolNotFound(bin.to_string()));
    }

    let path_var = env::var_os("PATH").unwrap_or_default();
    for dir in env::split_paths(&path_var) {
        for candidate in candidate_names(bin) {
            let full = dir.join(&candidate);
            if full.is_file() {
                debug!(path = %full.display(), "resolved tool binary");
                return Ok(full);
            }
        }
    }

    Err(CommitgenError::ToolNotFound(bin.to_string()))
}

/// Filenames to probe per PATH entry.
///
/// Windows launchers are usually `.cmd`/`.exe` shims, so those are tried
/// before the bare name.
fn candidate_names(bin: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![
            format!("{bin}.exe"),
            format!("{bin}.cmd"),
            format!("{bin}.bat"),
            bin.to_string(),
        ]
    } else {
        vec![bin.to_string()]
    }
}
