//! # Output Module
//!
//! This module centralizes all user-facing output for licer.
//! It provides consistent formatting and colors for terminal output.
//!
//! ## Design Goals
//!
//! - **Atomic lines**: each decision line is written under the stdout lock in
//!   one call, so concurrent directory tasks never interleave partial lines
//! - **Progressive**: skips only with `-v`, silence with `-q`
//! - **Scriptable**: decisions on stdout, errors on stderr, `--json` for
//!   machine-readable totals

use std::io::Write as _;
use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use crate::logging::{is_quiet, is_verbose};
use crate::processor::ProcessMode;
use crate::report::{Action, ProcessResult, StatsSnapshot};

/// Print the mode banner before a run.
pub fn print_start_message(root: &Path, mode: ProcessMode, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let verb = match mode {
    ProcessMode::Add => "Adding headers in",
    ProcessMode::Force => "Adding and replacing headers in",
    ProcessMode::Remove => "Removing headers in",
  };
  let suffix = if dry_run { " (dry run)" } else { "" };

  println!("{} {}{}", verb, root.display(), suffix);
}

/// Formats one decision line: `[ADD] path - reason`.
pub fn format_result_line(display_path: &str, result: &ProcessResult) -> String {
  let tag = format!("[{}]", result.action);
  let tag = match result.action {
    Action::Add => tag.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    Action::Replace => tag.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    Action::Remove => tag.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
    Action::Skip => tag.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
  };
  format!("{} {} - {}", tag, display_path, result.reason)
}

/// Print the decision for one file.
///
/// Skips are only shown in verbose mode; nothing is shown in quiet mode.
pub fn print_result(path: &Path, result: &ProcessResult, root: &Path) {
  if is_quiet() || (result.action == Action::Skip && !is_verbose()) {
    return;
  }

  let line = format_result_line(&make_relative_path(path, Some(root)), result);
  let stdout = std::io::stdout();
  let mut handle = stdout.lock();
  if let Err(e) = writeln!(handle, "{line}") {
    debug!("Failed to write result line: {}", e);
  }
}

/// Report a directory that could not be listed. Shown even in quiet mode.
pub fn print_directory_error(dir: &Path, error: &std::io::Error) {
  let line = format!("[ERROR] Failed to read directory {}: {}", dir.display(), error);
  let stderr = std::io::stderr();
  let mut handle = stderr.lock();
  if let Err(e) = writeln!(handle, "{}", line.if_supports_color(Stream::Stderr, |s| s.red())) {
    debug!("Failed to write error line: {}", e);
  }
}

/// Print the final counters.
pub fn print_summary(stats: &StatsSnapshot, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let modified_label = if dry_run { "would modify" } else { "modified" };
  let modified = if dry_run { stats.pending } else { stats.modified };

  let mut summary_line = format!(
    "Summary: {} processed, {} {}, {} skipped",
    stats.processed.if_supports_color(Stream::Stdout, |s| s.cyan()),
    modified.if_supports_color(Stream::Stdout, |s| s.green()),
    modified_label,
    stats.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed()),
  );

  if stats.failed_directories > 0 {
    summary_line.push_str(&format!(
      ", {} unreadable {}",
      stats.failed_directories.if_supports_color(Stream::Stdout, |s| s.red()),
      if stats.failed_directories == 1 { "directory" } else { "directories" }
    ));
  }

  // Show timing in verbose mode
  if is_verbose()
    && let Some(secs) = stats.processing_time_secs
  {
    summary_line.push_str(&format!(" ({secs:.2}s)"));
  }

  println!("{}", summary_line);
}

/// Print the final counters as one JSON object.
pub fn print_json_summary(stats: &StatsSnapshot) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string(stats)?);
  Ok(())
}

/// Print a hint message (e.g. suggesting next steps).
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to the repository root for display.
pub fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  let Some(root) = root else {
    return path.to_string_lossy().to_string();
  };

  if let Ok(relative) = path.strip_prefix(root) {
    return relative.to_string_lossy().to_string();
  }

  pathdiff::diff_paths(path, root)
    .map(|p| p.to_string_lossy().to_string())
    .unwrap_or_else(|| path.to_string_lossy().to_string())
}
