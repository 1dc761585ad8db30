//! # licer
//!
//! A tool that adds SPDX license headers to every eligible text file of a git
//! repository, replaces them on request, and removes them only when they are
//! provably yours.
//!
//! ## Features
//!
//! * Comment syntax chosen per file extension, with configurable overrides
//! * Structured data, documents, archives, media and binaries are never touched
//! * Interpreter directives (`#!`) always stay on the first line
//! * Third-party copyright notices are protected unless `--force` is given
//! * Removal requires the SPDX marker and your name or organization in the header
//! * Concurrent directory walk with bounded fan-out and bounded file I/O
//! * Pre-commit mode for newly staged files
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use licer::config::{Identity, Role};
//! use licer::processor::{DirectoryWalker, Processor, ProcessorConfig, WalkerOptions};
//! use licer::templates::HeaderRenderer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let identity = Identity {
//!     full_name: "A. Researcher".to_string(),
//!     role: Role::Student,
//!     department: "Research Computing".to_string(),
//!     organization: "Example University".to_string(),
//!   };
//!
//!   let processor = Processor::new(ProcessorConfig::new(identity, HeaderRenderer::new(), "2025".to_string()))?;
//!   let walker = DirectoryWalker::new(Arc::new(processor), WalkerOptions::default());
//!
//!   let stats = walker.walk(Path::new(".")).await;
//!   println!("{} files modified", stats.modified);
//!   Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`comment_style`] - Extension to comment syntax, exclusions, binary sniffing
//! * [`header_detection`] - Header classification
//! * [`ownership`] - Removal safety check
//! * [`processor`] - Per-file pipeline and the concurrent directory walker
//! * [`templates`] - Header body rendering

pub mod cli;
pub mod comment_style;
pub mod config;
pub mod diff;
pub mod git;
pub mod header_detection;
pub mod logging;
pub mod output;
pub mod ownership;
pub mod processor;
pub mod report;
pub mod templates;
pub mod workspace;
