#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;
use licer::config::{Identity, Role};
use licer::processor::{ProcessMode, Processor, ProcessorConfig};
use licer::templates::HeaderRenderer;

pub const FULL_NAME: &str = "A. Researcher";
pub const ORGANIZATION: &str = "Example University";
pub const DEPARTMENT: &str = "Research Computing";
pub const YEAR: &str = "2025";

/// MIT body for [`FULL_NAME`] and [`YEAR`], before comment formatting.
pub const MIT_BODY: &str =
  "Copyright (c) 2025 A. Researcher\n\nSPDX-License-Identifier: MIT\nSee LICENSE file for full license text.";

/// Identity used across the integration tests.
pub fn identity(role: Role) -> Identity {
  Identity {
    full_name: FULL_NAME.to_string(),
    role,
    department: DEPARTMENT.to_string(),
    organization: ORGANIZATION.to_string(),
  }
}

/// Builds a processor for `role` in `mode`.
pub fn processor(role: Role, mode: ProcessMode, dry_run: bool) -> Result<Processor> {
  Processor::new(ProcessorConfig {
    mode,
    dry_run,
    ..ProcessorConfig::new(identity(role), HeaderRenderer::new(), YEAR.to_string())
  })
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Initializes a git repository in `dir`.
pub fn init_git_repo(dir: &Path) -> Result<Repository> {
  Repository::init(dir).with_context(|| format!("Failed to init repository in {}", dir.display()))
}

/// Adds `relative` to the index of the repository at `dir`.
pub fn stage(dir: &Path, relative: &str) -> Result<()> {
  let repo = Repository::open(dir)?;
  let mut index = repo.index()?;
  index.add_path(Path::new(relative))?;
  index.write()?;
  Ok(())
}

/// Writes a complete identity config for `role` and returns its path.
pub fn write_config(dir: &Path, role: &str) -> Result<PathBuf> {
  let content = format!(
    "full_name = \"{FULL_NAME}\"\nrole = \"{role}\"\ndepartment = \"{DEPARTMENT}\"\norganization = \"{ORGANIZATION}\"\n"
  );
  write_file(dir, "licer.toml", &content)
}
