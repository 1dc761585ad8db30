//! # Report Module
//!
//! This module holds the per-file decision type and the run-wide counters.
//!
//! [`ProcessingStats`] is shared by every directory task of a walk, so it is
//! built from atomics only; [`StatsSnapshot`] is the plain value read out at
//! the end and serialized for `--json`.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Local;
use serde::Serialize;

/// Decision taken for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
  /// A header was inserted
  Add,
  /// An existing block was replaced
  Replace,
  /// Our header was removed
  Remove,
  /// The file was left alone
  Skip,
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Add => write!(f, "ADD"),
      Self::Replace => write!(f, "REPLACE"),
      Self::Remove => write!(f, "REMOVE"),
      Self::Skip => write!(f, "SKIP"),
    }
  }
}

/// Outcome of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
  /// What happened (or, in a dry run, would happen)
  pub action: Action,
  /// Human-readable explanation
  pub reason: String,
  /// Whether the file on disk was changed
  pub modified: bool,
}

impl ProcessResult {
  /// The file was left alone.
  pub fn skip(reason: impl Into<String>) -> Self {
    Self {
      action: Action::Skip,
      reason: reason.into(),
      modified: false,
    }
  }

  /// The file was rewritten.
  pub fn changed(action: Action, reason: impl Into<String>) -> Self {
    Self {
      action,
      reason: reason.into(),
      modified: true,
    }
  }

  /// The file would be rewritten, but this is a dry run.
  pub fn pending(action: Action, reason: impl Into<String>) -> Self {
    Self {
      action,
      reason: format!("{} (dry run)", reason.into()),
      modified: false,
    }
  }
}

/// Run-wide counters, safe to update from any number of tasks.
#[derive(Debug, Default)]
pub struct ProcessingStats {
  processed: AtomicUsize,
  modified: AtomicUsize,
  skipped: AtomicUsize,
  pending: AtomicUsize,
  failed_directories: AtomicUsize,
}

impl ProcessingStats {
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts one file decision.
  ///
  /// Every file counts as processed; modified files and skips are counted on
  /// top. Dry-run decisions that would change a file count as pending.
  pub fn record(&self, result: &ProcessResult) {
    self.processed.fetch_add(1, Ordering::Relaxed);
    if result.modified {
      self.modified.fetch_add(1, Ordering::Relaxed);
    } else if result.action == Action::Skip {
      self.skipped.fetch_add(1, Ordering::Relaxed);
    } else {
      self.pending.fetch_add(1, Ordering::Relaxed);
    }
  }

  /// Counts a directory whose listing failed.
  pub fn record_failed_directory(&self) {
    self.failed_directories.fetch_add(1, Ordering::Relaxed);
  }

  /// Reads the counters. Only exact once every recording task has finished.
  pub fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      processed: self.processed.load(Ordering::Relaxed),
      modified: self.modified.load(Ordering::Relaxed),
      skipped: self.skipped.load(Ordering::Relaxed),
      pending: self.pending.load(Ordering::Relaxed),
      failed_directories: self.failed_directories.load(Ordering::Relaxed),
      processing_time_secs: None,
      timestamp: None,
    }
  }
}

/// Point-in-time copy of [`ProcessingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
  /// Files examined
  pub processed: usize,
  /// Files rewritten
  pub modified: usize,
  /// Files left alone
  pub skipped: usize,
  /// Files a dry run would have rewritten
  pub pending: usize,
  /// Directories that could not be listed
  pub failed_directories: usize,
  /// Wall-clock duration of the run
  #[serde(rename = "processing_time_seconds", skip_serializing_if = "Option::is_none")]
  pub processing_time_secs: Option<f64>,
  /// Unix timestamp when the run finished
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl StatsSnapshot {
  /// Stamps the snapshot with the run duration and the current time.
  pub fn finished(mut self, elapsed: Duration) -> Self {
    self.processing_time_secs = Some(elapsed.as_secs_f64());
    self.timestamp = Some(Local::now().timestamp());
    self
  }
}
