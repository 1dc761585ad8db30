//! # Apply Command
//!
//! This module implements the default command: resolve the repository, load
//! the identity, then add, replace or remove headers across the tree or
//! across newly staged files only.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use tracing::debug;

use crate::comment_style::StyleRegistry;
use crate::config::{CliOverrides, Identity, Role, load_config};
use crate::diff::DiffManager;
use crate::logging::{ColorMode, Verbosity, init_tracing};
use crate::output::{print_hint, print_json_summary, print_result, print_start_message, print_summary};
use crate::processor::{DEFAULT_GATE_WIDTH, DirectoryWalker, ProcessMode, Processor, ProcessorConfig, WalkerOptions};
use crate::report::{ProcessingStats, StatsSnapshot};
use crate::templates::{HeaderRenderer, License};
use crate::workspace::resolve_repo_root;
use crate::{git, verbose_log};

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
  /// Repository root to process (default: current directory)
  #[arg(value_name = "PATH", conflicts_with = "git_folder")]
  pub path: Option<PathBuf>,

  /// Path to git repository (default: current directory)
  #[arg(long, value_name = "DIR")]
  pub git_folder: Option<PathBuf>,

  /// Replace existing headers and third-party copyright notices
  #[arg(long, conflicts_with = "remove")]
  pub force: bool,

  /// Remove existing headers (requires SPDX-License-Identifier and an
  /// ownership match)
  #[arg(long)]
  pub remove: bool,

  /// Pre-commit mode: only process newly staged files and re-stage the ones
  /// that were modified
  #[arg(long, conflicts_with_all = ["force", "remove"])]
  pub staged: bool,

  /// Compute changes without writing them
  #[arg(long)]
  pub dry_run: bool,

  /// Show diff of changes in dry run mode
  #[arg(long, requires = "dry_run")]
  pub show_diff: bool,

  /// Save diff of changes to a file in dry run mode
  #[arg(long, short = 'o', value_name = "FILE", requires = "dry_run")]
  pub save_diff: Option<PathBuf>,

  /// Path to config file (default: LICER_CONFIG, then the user config
  /// directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Full name written into headers
  #[arg(long, value_name = "NAME")]
  pub name: Option<String>,

  /// Role deciding the default license
  #[arg(long, value_enum)]
  pub role: Option<Role>,

  /// Department or lab
  #[arg(long, value_name = "DEPT")]
  pub department: Option<String>,

  /// Organization written into Apache-2.0 headers
  #[arg(long, value_name = "ORG")]
  pub organization: Option<String>,

  /// Override the license implied by the role
  #[arg(long, value_enum)]
  pub license: Option<License>,

  /// Copyright year (default: current year)
  #[arg(long)]
  pub year: Option<String>,

  /// Subdirectories walked concurrently per directory
  #[arg(long, short = 'j', value_name = "N", default_value_t = DEFAULT_GATE_WIDTH)]
  pub jobs: usize,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Print the final counters as JSON
  #[arg(long)]
  pub json: bool,
}

impl ApplyArgs {
  const fn mode(&self) -> ProcessMode {
    if self.remove {
      ProcessMode::Remove
    } else if self.force {
      ProcessMode::Force
    } else {
      ProcessMode::Add
    }
  }

  fn identity_overrides(&self) -> CliOverrides {
    CliOverrides {
      full_name: self.name.clone(),
      role: self.role,
      department: self.department.clone(),
      organization: self.organization.clone(),
      license: self.license,
    }
  }
}

/// Run the apply command with the given arguments
pub async fn run_apply(args: ApplyArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);
  Verbosity::from_flags(args.quiet, args.verbose).install();
  args.colors.apply();

  let started = Instant::now();

  let requested = args.git_folder.as_deref().or(args.path.as_deref());
  let root = resolve_repo_root(requested)?;
  debug!("Using repository root: {}", root.display());

  let mut config = load_config(args.config.as_deref())?.unwrap_or_default();
  config.merge_cli_overrides(args.identity_overrides());
  let identity = config.identity()?;

  let mut renderer = HeaderRenderer::new().with_license(config.license);
  if let Some(template) = &config.template {
    renderer
      .load_template(template)
      .with_context(|| format!("Failed to load header template from {}", template.display()))?;
  }

  let year = args
    .year
    .clone()
    .unwrap_or_else(|| chrono::Local::now().year().to_string());

  let mode = args.mode();
  print_configuration(&root, &identity, renderer.license_for(&identity), mode);

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let registry = StyleRegistry::with_overrides(config.style_overrides());
  let processor = Processor::new(ProcessorConfig {
    mode,
    dry_run: args.dry_run,
    registry,
    keywords: config.keywords,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(identity, renderer, year)
  })?;
  let processor = Arc::new(processor);
  verbose_log!("Header body:\n{}", processor.header_body());

  let dry_run = processor.is_dry_run();
  print_start_message(&root, processor.mode(), dry_run);

  let stats = if args.staged {
    run_staged(&root, processor).await?
  } else {
    let walker = DirectoryWalker::new(
      processor,
      WalkerOptions {
        gate_width: args.jobs.max(1),
        ..WalkerOptions::default()
      },
    );
    walker.walk(&root).await
  };
  let stats = stats.finished(started.elapsed());

  if args.json {
    print_json_summary(&stats)?;
  } else {
    print_summary(&stats, dry_run);
    if dry_run && stats.pending > 0 {
      print_hint("Run without --dry-run to apply these changes.");
    }
  }

  Ok(())
}

fn print_configuration(root: &Path, identity: &Identity, license: License, mode: ProcessMode) {
  verbose_log!("Working in git repository: {}", root.display());
  verbose_log!("Mode: {:?}", mode);
  verbose_log!("Configuration:");
  verbose_log!("  Name: {}", identity.full_name);
  verbose_log!("  Role: {}", identity.role);
  verbose_log!("  Department/Lab: {}", identity.department);
  verbose_log!("  Organization: {}", identity.organization);
  verbose_log!("  License: {}", license);
}

/// Processes the files added to the index and re-stages the modified ones.
///
/// Fails when the modified files cannot be re-staged.
async fn run_staged(root: &Path, processor: Arc<Processor>) -> Result<StatsSnapshot> {
  let staged = git::staged_new_files(root)?;
  verbose_log!("Processing {} newly staged files", staged.len());

  let task_root = root.to_path_buf();
  let (stats, modified) = tokio::task::spawn_blocking(move || {
    let stats = ProcessingStats::new();
    let mut modified = Vec::new();

    for relative in staged {
      let path = task_root.join(&relative);
      if !path.is_file() {
        debug!("Staged path no longer on disk: {}", path.display());
        continue;
      }

      let result = processor.process_file(&path);
      stats.record(&result);
      print_result(&path, &result, &task_root);
      if result.modified {
        modified.push(relative);
      }
    }

    (stats.snapshot(), modified)
  })
  .await
  .context("Staged file processing task failed")?;

  git::restage(root, &modified).context("Failed to re-stage modified files")?;

  Ok(stats)
}
