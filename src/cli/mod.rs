//! # CLI
//!
//! `licer` has a single command; its flags live in [`ApplyArgs`] so the
//! library can drive a run without going through `clap` parsing.

mod apply;

pub use apply::{ApplyArgs, run_apply};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

const HELP_STYLES: Styles = Styles::styled()
  .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
  .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
  .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
  .placeholder(AnsiColor::Cyan.on_default())
  .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
  .valid(AnsiColor::Green.on_default())
  .invalid(AnsiColor::Magenta.on_default());

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = HELP_STYLES,
  after_help = "Students get MIT headers, Faculty and Staff get Apache-2.0 headers.

Examples:
  # Add headers to every eligible file in the current repository
  licer

  # Process a specific repository
  licer --git-folder /path/to/repo

  # Replace existing and third-party headers
  licer --force

  # Remove headers you own (requires SPDX-License-Identifier and a name match)
  licer --remove

  # Preview changes as a diff without writing
  licer --dry-run --show-diff

  # Pre-commit: only newly staged files, re-staged after the header is added
  licer --staged
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub apply_args: ApplyArgs,
}

impl Cli {
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
