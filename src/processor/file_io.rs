//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! It encapsulates synchronous file operations; callers on the async walker
//! run them on the blocking pool.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content as UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Replace the content of `path` atomically.
  ///
  /// The new content goes to a temporary file in the same directory, which
  /// takes over the original file's permissions, is synced, and is then
  /// renamed over the original. Readers see either the old or the new file,
  /// never a partial write.
  pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let permissions = std::fs::metadata(path)
      .with_context(|| format!("Failed to stat file: {}", path.display()))?
      .permissions();

    let temp = tempfile::NamedTempFile::new_in(dir)
      .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    let mut file = temp.as_file();
    file
      .write_all(content.as_bytes())
      .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    file
      .sync_all()
      .with_context(|| format!("Failed to sync temp file for {}", path.display()))?;

    std::fs::set_permissions(temp.path(), permissions)
      .with_context(|| format!("Failed to copy permissions for {}", path.display()))?;

    temp
      .persist(path)
      .map_err(|e| e.error)
      .with_context(|| format!("Failed to replace file: {}", path.display()))?;

    Ok(())
  }
}
