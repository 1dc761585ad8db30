//! # Workspace Module
//!
//! This module resolves the repository root that licer operates on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::git;

/// Resolve the repository root from an optional requested folder.
///
/// The folder defaults to the current directory, is made absolute, and must
/// be the root of a git work tree.
///
/// # Errors
///
/// Returns an error if the folder does not exist or is not a repository root.
pub fn resolve_repo_root(requested: Option<&Path>) -> Result<PathBuf> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  let candidate = match requested {
    Some(path) => abs_path_or_current(path, &current_dir),
    None => current_dir,
  };

  let root = candidate
    .canonicalize()
    .with_context(|| format!("Repository folder does not exist: {}", candidate.display()))?;

  if !git::is_repository_root(&root) {
    bail!("Not a git repository: {}", root.display());
  }

  Ok(root)
}

fn abs_path_or_current(path: &Path, current_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    current_dir.join(path)
  }
}
