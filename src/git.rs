//! # Git Module
//!
//! This module contains functionality for interacting with git repositories:
//! checking that a folder is a work tree root, listing newly staged files for
//! pre-commit runs, and re-staging files after they were rewritten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Delta, ErrorCode, Repository};

use crate::verbose_log;

/// Whether `path` is the root of a non-bare git work tree.
///
/// Unlike discovery, this does not search parent directories: a
/// subdirectory of a repository is not a repository root.
pub fn is_repository_root(path: &Path) -> bool {
  match Repository::open(path) {
    Ok(repo) => !repo.is_bare(),
    Err(_) => false,
  }
}

/// Gets the files added to the index relative to HEAD.
///
/// On a branch without commits every index entry counts as added. Paths are
/// relative to the repository root.
///
/// # Errors
///
/// Returns an error if the repository, its index or HEAD cannot be read.
pub fn staged_new_files(root: &Path) -> Result<Vec<PathBuf>> {
  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository: {}", root.display()))?;
  let index = repo.index().with_context(|| "Failed to read git index")?;

  let head_tree = match repo.head() {
    Ok(head) => Some(head.peel_to_tree().with_context(|| "Failed to get tree for HEAD commit")?),
    Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
    Err(e) => return Err(e).with_context(|| "Failed to get HEAD reference"),
  };

  let diff = repo
    .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
    .with_context(|| "Failed to diff HEAD against the index")?;

  let files: Vec<PathBuf> = diff
    .deltas()
    .filter(|delta| delta.status() == Delta::Added)
    .filter_map(|delta| delta.new_file().path().map(Path::to_path_buf))
    .collect();

  verbose_log!("Found {} newly staged files", files.len());

  Ok(files)
}

/// Adds `files` (relative to `root`) back to the index.
///
/// # Errors
///
/// Returns an error if any file cannot be staged or the index cannot be
/// written.
pub fn restage(root: &Path, files: &[PathBuf]) -> Result<()> {
  if files.is_empty() {
    return Ok(());
  }

  let repo = Repository::open(root).with_context(|| format!("Failed to open git repository: {}", root.display()))?;
  let mut index = repo.index().with_context(|| "Failed to read git index")?;

  for file in files {
    verbose_log!("Re-staging {}", file.display());
    index
      .add_path(file)
      .with_context(|| format!("Failed to stage {}", file.display()))?;
  }

  index.write().with_context(|| "Failed to write git index")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_is_repository_root() {
    let temp_dir = TempDir::new().expect("create temp dir");
    assert!(!is_repository_root(temp_dir.path()));

    Repository::init(temp_dir.path()).expect("init repo");
    fs::create_dir(temp_dir.path().join("sub")).expect("mkdir");

    assert!(is_repository_root(temp_dir.path()));
    assert!(!is_repository_root(&temp_dir.path().join("sub")));
  }

  #[test]
  fn test_staged_new_files_on_unborn_branch() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("init repo");
    fs::write(temp_dir.path().join("a.py"), "x = 1\n").expect("write");
    fs::write(temp_dir.path().join("untracked.py"), "y = 2\n").expect("write");

    let mut index = repo.index().expect("index");
    index.add_path(Path::new("a.py")).expect("add");
    index.write().expect("write index");

    let staged = staged_new_files(temp_dir.path()).expect("staged files");
    assert_eq!(staged, vec![PathBuf::from("a.py")]);
  }

  #[test]
  fn test_restage_updates_index() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("init repo");
    let file = temp_dir.path().join("a.py");
    fs::write(&file, "x = 1\n").expect("write");

    let mut index = repo.index().expect("index");
    index.add_path(Path::new("a.py")).expect("add");
    index.write().expect("write index");
    let before = index.get_path(Path::new("a.py"), 0).expect("entry").id;

    fs::write(&file, "# SPDX-License-Identifier: MIT\n\nx = 1\n").expect("rewrite");
    restage(temp_dir.path(), &[PathBuf::from("a.py")]).expect("restage");

    let mut index = repo.index().expect("index");
    index.read(true).expect("reload index");
    let after = index.get_path(Path::new("a.py"), 0).expect("entry").id;
    assert_ne!(before, after);
  }
}
