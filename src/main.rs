//! # licer
//!
//! Adds, replaces and safely removes SPDX license headers across a git
//! repository.

use anyhow::Result;
use licer::cli::{Cli, run_apply};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_apply(cli.apply_args).await
}
