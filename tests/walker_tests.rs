mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use common::{processor, write_file};
use licer::config::Role;
use licer::processor::{DirectoryWalker, ProcessMode, WalkerOptions};
use licer::report::StatsSnapshot;
use tempfile::TempDir;

async fn walk(root: &Path, mode: ProcessMode, dry_run: bool, options: WalkerOptions) -> Result<StatsSnapshot> {
  let processor = Arc::new(processor(Role::Student, mode, dry_run)?);
  Ok(DirectoryWalker::new(processor, options).walk(root).await)
}

fn narrow(gate_width: usize, io_permits: usize) -> WalkerOptions {
  WalkerOptions { gate_width, io_permits }
}

#[tokio::test]
async fn test_mixed_tree_counts() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  write_file(root, "src/main.rs", "fn main() {}\n")?;
  write_file(root, "src/util/strings.py", "def upper(s):\n    return s.upper()\n")?;
  write_file(root, "scripts/deploy.sh", "#!/bin/sh\necho deploy\n")?;
  write_file(root, "README.md", "# Project\n")?;
  write_file(root, "config/settings.json", "{}\n")?;
  write_file(
    root,
    "vendor/lib.c",
    "/* Copyright 2001 Vendor Inc. */\n\nint f(void) { return 0; }\n",
  )?;
  fs::write(root.join("blob"), [0u8, 1, 2, 3, 255])?;

  let stats = walk(root, ProcessMode::Add, false, WalkerOptions::default()).await?;

  assert_eq!(stats.processed, 7);
  assert_eq!(stats.modified, 3);
  assert_eq!(stats.skipped, 4);
  assert_eq!(stats.pending, 0);
  assert_eq!(stats.failed_directories, 0);
  assert_eq!(stats.processed, stats.modified + stats.skipped + stats.pending);

  assert!(fs::read_to_string(root.join("scripts/deploy.sh"))?.starts_with("#!/bin/sh\n# Copyright (c) 2025"));
  assert_eq!(fs::read_to_string(root.join("README.md"))?, "# Project\n");
  Ok(())
}

#[tokio::test]
async fn test_vcs_directory_is_never_entered() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  write_file(root, ".git/HEAD", "ref: refs/heads/main\n")?;
  write_file(root, ".git/hooks/pre-commit.sh", "exec true\n")?;
  write_file(root, "app.py", "print(1)\n")?;

  let stats = walk(root, ProcessMode::Add, false, WalkerOptions::default()).await?;

  assert_eq!(stats.processed, 1);
  assert_eq!(stats.modified, 1);
  assert_eq!(fs::read_to_string(root.join(".git/HEAD"))?, "ref: refs/heads/main\n");
  assert_eq!(fs::read_to_string(root.join(".git/hooks/pre-commit.sh"))?, "exec true\n");
  Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_wide_tree_with_narrow_limits() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  for dir in 0..40 {
    for file in 0..5 {
      write_file(root, &format!("pkg{dir:02}/mod{file}.go"), "package pkg\n")?;
    }
  }

  let stats = walk(root, ProcessMode::Add, false, narrow(2, 3)).await?;

  assert_eq!(stats.processed, 200);
  assert_eq!(stats.modified, 200);
  assert_eq!(stats.skipped, 0);

  let sample = fs::read_to_string(root.join("pkg17/mod3.go"))?;
  assert!(sample.starts_with("// Copyright (c) 2025 A. Researcher\n"));
  assert!(sample.ends_with("\n\npackage pkg\n"));
  Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_deep_tree_with_single_permit_gates() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  let mut relative = String::new();
  for depth in 0..30 {
    relative.push_str(&format!("level{depth}/"));
    write_file(root, &format!("{relative}file.rb"), "puts 1\n")?;
  }

  let stats = walk(root, ProcessMode::Add, false, narrow(1, 1)).await?;

  assert_eq!(stats.processed, 30);
  assert_eq!(stats.modified, 30);
  Ok(())
}

#[tokio::test]
async fn test_second_walk_changes_nothing() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  for name in ["a.rs", "b/c.py", "b/d/e.ts", "f.sql"] {
    write_file(root, name, "x\n")?;
  }

  let first = walk(root, ProcessMode::Add, false, WalkerOptions::default()).await?;
  assert_eq!(first.modified, 4);
  let snapshot = fs::read_to_string(root.join("b/d/e.ts"))?;

  let second = walk(root, ProcessMode::Add, false, WalkerOptions::default()).await?;
  assert_eq!(second.processed, 4);
  assert_eq!(second.modified, 0);
  assert_eq!(second.skipped, 4);
  assert_eq!(fs::read_to_string(root.join("b/d/e.ts"))?, snapshot);
  Ok(())
}

#[tokio::test]
async fn test_dry_run_walk_counts_pending() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  write_file(root, "one.js", "console.log(1);\n")?;
  write_file(root, "two/three.java", "class Three {}\n")?;
  write_file(root, "notes.txt", "remember\n")?;

  let stats = walk(root, ProcessMode::Add, true, WalkerOptions::default()).await?;

  assert_eq!(stats.processed, 3);
  assert_eq!(stats.pending, 2);
  assert_eq!(stats.modified, 0);
  assert_eq!(stats.skipped, 1);
  assert_eq!(fs::read_to_string(root.join("one.js"))?, "console.log(1);\n");
  Ok(())
}

#[tokio::test]
async fn test_remove_walk_restores_tree() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  let files = [("x.rs", "fn x() {}\n"), ("y/z.py", "z = 1\n"), ("y/w.sh", "#!/bin/sh\nexit 0\n")];
  for (name, content) in files {
    write_file(root, name, content)?;
  }

  walk(root, ProcessMode::Add, false, WalkerOptions::default()).await?;
  let stats = walk(root, ProcessMode::Remove, false, WalkerOptions::default()).await?;

  assert_eq!(stats.modified, 3);
  for (name, content) in files {
    assert_eq!(fs::read_to_string(root.join(name))?, content, "{name} not restored");
  }
  Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_subdirectory_does_not_stop_siblings() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();
  write_file(root, "a/one.rs", "fn one() {}\n")?;
  write_file(root, "locked/hidden.rs", "fn hidden() {}\n")?;
  write_file(root, "z/two.py", "two = 2\n")?;
  write_file(root, "top.go", "package top\n")?;

  let locked = root.join("locked");
  fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;
  if fs::read_dir(&locked).is_ok() {
    // Permission bits do not bind this user.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    return Ok(());
  }

  let stats = walk(root, ProcessMode::Add, false, WalkerOptions::default()).await;
  fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
  let stats = stats?;

  assert_eq!(stats.failed_directories, 1);
  assert_eq!(stats.processed, 3);
  assert_eq!(stats.modified, 3);
  assert!(fs::read_to_string(root.join("a/one.rs"))?.starts_with("// Copyright (c) 2025"));
  assert!(fs::read_to_string(root.join("z/two.py"))?.starts_with("# Copyright (c) 2025"));
  assert_eq!(fs::read_to_string(root.join("locked/hidden.rs"))?, "fn hidden() {}\n");
  Ok(())
}
