//! # Processor Module
//!
//! This module contains the per-file pipeline: select a comment style,
//! classify the header, check ownership when removing, rewrite the content
//! and write it back.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and atomic writing
//! - [`content_transformer`] - Inserting, replacing and removing header blocks
//! - [`walker`] - Bounded-concurrency recursive directory walk
//!
//! The [`Processor`] struct handles one file at a time and never fails: every
//! problem becomes a skip decision with the reason attached, so a single bad
//! file cannot stop a run.

mod content_transformer;
mod file_io;
mod walker;

use std::path::Path;

use anyhow::Result;
pub use content_transformer::{ContentTransformer, Mutation};
pub use file_io::FileIO;
use tracing::{debug, trace, warn};
pub use walker::{DEFAULT_GATE_WIDTH, DirectoryWalker, VCS_DIR, WalkerOptions};

use crate::comment_style::{CommentStyle, Selection, StyleRegistry, format_header};
use crate::config::Identity;
use crate::diff::DiffManager;
use crate::header_detection::{HeaderDetector, HeaderInfo, HeaderKeywords, KeywordHeaderDetector};
use crate::ownership::{Ownership, check_ownership};
use crate::report::{Action, ProcessResult};
use crate::templates::{HeaderRenderer, License};

/// What a run does to each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
  /// Insert headers where none exist
  Add,
  /// Insert headers, replacing our own or third-party blocks
  Force,
  /// Remove headers we own
  Remove,
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub identity: Identity,
  pub renderer: HeaderRenderer,
  pub year: String,
  pub mode: ProcessMode,

  // Behavior flags
  pub dry_run: bool,

  // Optional components
  pub registry: StyleRegistry,
  pub keywords: HeaderKeywords,
  pub diff_manager: Option<DiffManager>,
  pub header_detector: Option<Box<dyn HeaderDetector>>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     dry_run: true,
  ///     ..ProcessorConfig::new(identity, renderer, "2025".to_string())
  /// }
  /// ```
  pub fn new(identity: Identity, renderer: HeaderRenderer, year: String) -> Self {
    Self {
      identity,
      renderer,
      year,
      mode: ProcessMode::Add,
      dry_run: false,
      registry: StyleRegistry::builtin(),
      keywords: HeaderKeywords::default(),
      diff_manager: None,
      header_detector: None,
    }
  }
}

/// Processor for applying header operations to single files.
///
/// The `Processor` is responsible for:
/// - Deciding which files are eligible and with which comment style
/// - Adding headers, optionally replacing existing blocks
/// - Removing headers after the ownership check
/// - Showing diffs in dry run mode
pub struct Processor {
  /// Who headers are written for and checked against
  identity: Identity,

  /// License named in result reasons
  license: License,

  /// Rendered header body, shared by every file of the run
  header_body: String,

  mode: ProcessMode,

  /// Whether to compute changes without writing them
  dry_run: bool,

  registry: StyleRegistry,

  detector: Box<dyn HeaderDetector>,

  /// Manager for handling diff creation and rendering
  diff_manager: DiffManager,
}

impl Processor {
  /// Creates a processor, rendering the header body once for the run.
  ///
  /// Fails when the header template cannot produce a detectable header.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let header_body = config.renderer.render(&config.identity, &config.year)?;
    let license = config.renderer.license_for(&config.identity);

    let detector = config.header_detector.unwrap_or_else(|| {
      let keywords = config.keywords.with_organization(&config.identity.organization);
      Box::new(KeywordHeaderDetector::new(keywords, config.registry.comment_tokens())) as Box<dyn HeaderDetector>
    });

    debug!("Rendered {} header body:\n{}", license, header_body);

    Ok(Self {
      identity: config.identity,
      license,
      header_body,
      mode: config.mode,
      dry_run: config.dry_run,
      registry: config.registry,
      detector,
      diff_manager: config.diff_manager.unwrap_or_default(),
    })
  }

  /// The mode this processor runs in.
  pub const fn mode(&self) -> ProcessMode {
    self.mode
  }

  /// Whether this processor only reports changes.
  pub const fn is_dry_run(&self) -> bool {
    self.dry_run
  }

  /// The header body written into files, before comment formatting.
  pub fn header_body(&self) -> &str {
    &self.header_body
  }

  /// Processes one file and reports the decision.
  ///
  /// This never returns an error: read and write failures are reported as
  /// skips with the error in the reason.
  pub fn process_file(&self, path: &Path) -> ProcessResult {
    let style = match self.registry.select(path) {
      Selection::Include(style) => style,
      Selection::Exclude(reason) => {
        trace!("Skipping {}: {}", path.display(), reason);
        return ProcessResult::skip(reason.to_string());
      }
    };

    let content = match FileIO::read_full_content(path) {
      Ok(content) => content,
      Err(e) => {
        debug!("Failed to read {}: {:#}", path.display(), e);
        return ProcessResult::skip(format!("Error reading file: {e:#}"));
      }
    };

    let info = self.detector.classify_for_style(&content, &style);
    trace!("Classified {}: {:?}", path.display(), info);

    match self.mode {
      ProcessMode::Remove => self.remove_header(path, &content, &info),
      ProcessMode::Add | ProcessMode::Force => self.add_header(path, &content, &info, &style),
    }
  }

  fn add_header(&self, path: &Path, content: &str, info: &HeaderInfo, style: &CommentStyle) -> ProcessResult {
    let force = self.mode == ProcessMode::Force;

    if info.has_header && !force {
      return ProcessResult::skip("Header already exists");
    }
    if info.has_third_party_copyright && !force {
      return ProcessResult::skip("Third-party copyright found (use --force to overwrite)");
    }

    let (action, mutation, reason) = if info.has_header {
      (
        Action::Replace,
        Mutation::Replace,
        format!("Replaced existing header with {} header", self.license),
      )
    } else if info.has_third_party_copyright {
      (
        Action::Replace,
        Mutation::Replace,
        format!("Replaced third-party copyright with {} header", self.license),
      )
    } else {
      (Action::Add, Mutation::Insert, format!("Added {} header", self.license))
    };

    let header = format_header(&self.header_body, style);
    let updated = ContentTransformer::apply(content, info, &header, mutation);
    self.commit(path, content, &updated, action, reason)
  }

  fn remove_header(&self, path: &Path, content: &str, info: &HeaderInfo) -> ProcessResult {
    match check_ownership(content, info, &self.identity) {
      Ownership::NoHeader => ProcessResult::skip("No header found"),
      Ownership::MissingMarker | Ownership::Mismatch => ProcessResult::skip("Header ownership mismatch (safety check)"),
      Ownership::Owned => {
        let updated = ContentTransformer::apply(content, info, "", Mutation::Remove);
        self.commit(path, content, &updated, Action::Remove, "Removed header (ownership match)".to_string())
      }
    }
  }

  /// Writes `updated` unless it is unchanged or this is a dry run.
  fn commit(&self, path: &Path, original: &str, updated: &str, action: Action, reason: String) -> ProcessResult {
    if updated == original {
      return ProcessResult::skip("Content unchanged");
    }

    if self.dry_run {
      if let Err(e) = self.diff_manager.display_diff(path, original, updated) {
        warn!("Failed to render diff for {}: {:#}", path.display(), e);
      }
      return ProcessResult::pending(action, reason);
    }

    match FileIO::write_atomic(path, updated) {
      Ok(()) => ProcessResult::changed(action, reason),
      Err(e) => {
        warn!("Failed to write {}: {:#}", path.display(), e);
        ProcessResult::skip(format!("Error writing file: {e:#}"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;
  use crate::config::Role;

  fn processor(mode: ProcessMode, dry_run: bool) -> Processor {
    let identity = Identity {
      full_name: "A. Researcher".to_string(),
      role: Role::Student,
      department: "Research Computing".to_string(),
      organization: "Example University".to_string(),
    };
    Processor::new(ProcessorConfig {
      mode,
      dry_run,
      ..ProcessorConfig::new(identity, HeaderRenderer::new(), "2025".to_string())
    })
    .expect("processor")
  }

  #[test]
  fn test_accessors_reflect_config() {
    let processor = processor(ProcessMode::Remove, true);
    assert_eq!(processor.mode(), ProcessMode::Remove);
    assert!(processor.is_dry_run());
    assert!(processor.header_body().contains("SPDX-License-Identifier: MIT"));
  }

  #[test]
  fn test_excluded_file_is_not_read() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("data.json");
    fs::write(&path, "{}").expect("write");

    let result = processor(ProcessMode::Add, false).process_file(&path);
    assert_eq!(result, ProcessResult::skip("Excluded file type"));
    assert_eq!(fs::read_to_string(&path).expect("read"), "{}");
  }

  #[test]
  fn test_missing_file_is_a_skip() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let result = processor(ProcessMode::Add, false).process_file(&temp_dir.path().join("gone.py"));
    assert_eq!(result.action, Action::Skip);
    assert!(result.reason.starts_with("Error reading file:"));
  }

  #[test]
  fn test_add_then_skip() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("main.go");
    fs::write(&path, "package main\n").expect("write");

    let processor = processor(ProcessMode::Add, false);
    let first = processor.process_file(&path);
    assert_eq!(first, ProcessResult::changed(Action::Add, "Added MIT header"));

    let after_first = fs::read_to_string(&path).expect("read");
    let second = processor.process_file(&path);
    assert_eq!(second, ProcessResult::skip("Header already exists"));
    assert_eq!(fs::read_to_string(&path).expect("read"), after_first);
  }

  #[test]
  fn test_dry_run_does_not_write() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("main.py");
    fs::write(&path, "print(1)\n").expect("write");

    let result = processor(ProcessMode::Add, true).process_file(&path);
    assert_eq!(result, ProcessResult::pending(Action::Add, "Added MIT header"));
    assert_eq!(fs::read_to_string(&path).expect("read"), "print(1)\n");
  }

  #[test]
  fn test_remove_without_header() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("main.rs");
    fs::write(&path, "fn main() {}\n").expect("write");

    let result = processor(ProcessMode::Remove, false).process_file(&path);
    assert_eq!(result, ProcessResult::skip("No header found"));
  }
}
