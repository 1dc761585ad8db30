//! # Directory Walker
//!
//! Recursive walk over a repository tree with bounded concurrency.
//!
//! Every subdirectory is walked on its own tokio task. Before descending, a
//! child task takes a permit from its parent directory's gate (a semaphore of
//! `gate_width` permits), so at most `gate_width` siblings are walked at once
//! per directory. Files of one directory are processed one after the other on
//! the blocking pool, each holding one permit of a walk-wide I/O semaphore
//! that caps the total number of files open at any moment. The I/O permit is
//! released before a directory waits on its children, so the gates cannot
//! starve each other.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::Processor;
use crate::output;
use crate::report::{ProcessResult, ProcessingStats, StatsSnapshot};

/// Default number of sibling directories walked concurrently.
pub const DEFAULT_GATE_WIDTH: usize = 10;

/// Version-control metadata directory that is never entered.
pub const VCS_DIR: &str = ".git";

/// Concurrency limits for a walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkerOptions {
  /// Permits per directory gate
  pub gate_width: usize,
  /// Files processed at the same time across the whole walk
  pub io_permits: usize,
}

impl Default for WalkerOptions {
  fn default() -> Self {
    Self {
      gate_width: DEFAULT_GATE_WIDTH,
      io_permits: num_cpus::get() * 2,
    }
  }
}

/// State shared by every task of one walk.
struct WalkState {
  processor: Arc<Processor>,
  stats: ProcessingStats,
  gate_width: usize,
  io_permits: Semaphore,
  /// Paths in output lines are shown relative to this directory
  display_root: PathBuf,
}

/// Walks a tree and feeds every regular file to a [`Processor`].
pub struct DirectoryWalker {
  processor: Arc<Processor>,
  options: WalkerOptions,
}

impl DirectoryWalker {
  pub fn new(processor: Arc<Processor>, options: WalkerOptions) -> Self {
    Self { processor, options }
  }

  /// Walks `root` to completion and returns the final counters.
  ///
  /// Unreadable directories are reported and skipped; the walk itself does
  /// not fail.
  pub async fn walk(&self, root: &Path) -> StatsSnapshot {
    let state = Arc::new(WalkState {
      processor: Arc::clone(&self.processor),
      stats: ProcessingStats::new(),
      gate_width: self.options.gate_width.max(1),
      io_permits: Semaphore::new(self.options.io_permits.max(1)),
      display_root: root.to_path_buf(),
    });

    debug!(
      "Walking {} (gate width {}, {} I/O permits)",
      root.display(),
      state.gate_width,
      self.options.io_permits.max(1)
    );

    walk_dir(Arc::clone(&state), root.to_path_buf()).await;
    state.stats.snapshot()
  }
}

/// Lists `dir` into regular files and subdirectories, both sorted.
async fn list_directory(dir: &Path) -> std::io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
  let mut files = Vec::new();
  let mut subdirs = Vec::new();

  let mut entries = tokio::fs::read_dir(dir).await?;
  while let Some(entry) = entries.next_entry().await? {
    let path = entry.path();
    let file_type = match entry.file_type().await {
      Ok(file_type) => file_type,
      Err(e) => {
        warn!("Failed to stat {}: {}", path.display(), e);
        continue;
      }
    };

    if file_type.is_symlink() {
      trace!("Not following symlink {}", path.display());
    } else if file_type.is_dir() {
      if entry.file_name() == VCS_DIR {
        trace!("Skipping {}", path.display());
        continue;
      }
      subdirs.push(path);
    } else if file_type.is_file() {
      files.push(path);
    }
  }

  files.sort();
  subdirs.sort();
  Ok((files, subdirs))
}

fn walk_dir(state: Arc<WalkState>, dir: PathBuf) -> BoxFuture<'static, ()> {
  async move {
    let (files, subdirs) = match list_directory(&dir).await {
      Ok(listing) => listing,
      Err(e) => {
        warn!("Failed to read directory {}: {}", dir.display(), e);
        output::print_directory_error(&dir, &e);
        state.stats.record_failed_directory();
        return;
      }
    };

    let gate = Arc::new(Semaphore::new(state.gate_width));
    let mut children = JoinSet::new();
    for subdir in subdirs {
      let state = Arc::clone(&state);
      let gate = Arc::clone(&gate);
      children.spawn(async move {
        let Ok(_permit) = gate.acquire_owned().await else {
          return;
        };
        walk_dir(state, subdir).await;
      });
    }

    for file in files {
      process_one(&state, file).await;
    }

    while let Some(joined) = children.join_next().await {
      if let Err(e) = joined {
        warn!("Directory task under {} failed: {}", dir.display(), e);
      }
    }
  }
  .boxed()
}

async fn process_one(state: &Arc<WalkState>, path: PathBuf) {
  let Ok(_permit) = state.io_permits.acquire().await else {
    return;
  };

  let processor = Arc::clone(&state.processor);
  let task_path = path.clone();
  let result = match tokio::task::spawn_blocking(move || processor.process_file(&task_path)).await {
    Ok(result) => result,
    Err(e) => ProcessResult::skip(format!("Processing task failed: {e}")),
  };

  state.stats.record(&result);
  output::print_result(&path, &result, &state.display_root);
}
