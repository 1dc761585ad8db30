use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// How much the run prints, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Verbosity {
  /// Errors only
  Quiet = 0,
  /// Changed files and the summary
  Normal = 1,
  /// Also skipped files, configuration and timing
  Verbose = 2,
}

impl Verbosity {
  /// Maps `-q` and the number of `-v` flags to a verbosity.
  pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
    match (quiet, verbose) {
      (true, _) => Self::Quiet,
      (false, 0) => Self::Normal,
      (false, _) => Self::Verbose,
    }
  }

  /// Makes this the process-wide verbosity.
  pub fn install(self) {
    VERBOSITY.store(self as u8, Ordering::Relaxed);
  }

  /// The process-wide verbosity.
  pub fn current() -> Self {
    match VERBOSITY.load(Ordering::Relaxed) {
      0 => Self::Quiet,
      2 => Self::Verbose,
      _ => Self::Normal,
    }
  }
}

pub fn is_verbose() -> bool {
  Verbosity::current() == Verbosity::Verbose
}

pub fn is_quiet() -> bool {
  Verbosity::current() == Verbosity::Quiet
}

/// When to color terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  /// Color when the stream is a terminal
  Auto,
  Never,
  Always,
}

impl ColorMode {
  /// Applies the mode to every `if_supports_color` call in the process.
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Always => owo_colors::set_override(true),
    }
  }
}

/// `tracing` level for this crate when `RUST_LOG` is unset.
fn default_level(quiet: bool, verbose: u8) -> &'static str {
  match (quiet, verbose) {
    (true, _) => "error",
    (false, 0) => "warn",
    (false, 1) => "info",
    (false, 2) => "debug",
    (false, _) => "trace",
  }
}

/// Installs the stderr `tracing` subscriber.
///
/// A second call keeps the first subscriber.
pub fn init_tracing(quiet: bool, verbose: u8) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("licer={}", default_level(quiet, verbose))));

  let _ = tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(filter)
    .with_target(false)
    .try_init();
}
