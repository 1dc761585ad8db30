//! # Content Transformer Module
//!
//! This module rewrites file content around a classified header: inserting a
//! new header below any shebang, replacing a detected block, or removing our
//! own header together with the blank lines that followed it.
//!
//! Content is handled as `\n`-separated lines and joined back with `\n`, so
//! a trailing newline and `\r` line endings survive untouched.

use crate::header_detection::HeaderInfo;

/// Kind of edit applied to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
  /// Put the header at the top (after a shebang), followed by one blank line
  Insert,
  /// Swap the detected block for the header, followed by one blank line
  Replace,
  /// Drop the detected block and the blank lines after it
  Remove,
}

/// Content transformation utilities for header processing.
pub struct ContentTransformer;

impl ContentTransformer {
  /// Applies `mutation` to `content`.
  ///
  /// `header` is the comment-formatted header without a trailing newline.
  /// `Replace` and `Remove` without a detected span fall back to `Insert`
  /// and to the unchanged content respectively.
  pub fn apply(content: &str, info: &HeaderInfo, header: &str, mutation: Mutation) -> String {
    match (mutation, info.span()) {
      (Mutation::Insert, _) | (Mutation::Replace, None) => Self::insert(content, info, header),
      (Mutation::Replace, Some(span)) => Self::replace(content, span, header),
      (Mutation::Remove, Some(span)) => Self::remove(content, span),
      (Mutation::Remove, None) => content.to_string(),
    }
  }

  fn insert(content: &str, info: &HeaderInfo, header: &str) -> String {
    if content.is_empty() {
      return format!("{header}\n");
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let keep = info.body_start().min(lines.len());

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + header.lines().count() + 1);
    out.extend_from_slice(&lines[..keep]);
    out.extend(header.split('\n'));
    out.push("");
    out.extend_from_slice(&lines[keep..]);
    out.join("\n")
  }

  fn replace(content: &str, (start, end): (usize, usize), header: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = start.min(lines.len());
    let after = (end + 1).clamp(start, lines.len());

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + header.lines().count() + 1);
    out.extend_from_slice(&lines[..start]);
    out.extend(header.split('\n'));
    out.push("");
    out.extend_from_slice(&lines[after..]);
    out.join("\n")
  }

  fn remove(content: &str, (start, end): (usize, usize)) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = start.min(lines.len());
    let mut resume = (end + 1).clamp(start, lines.len());
    // The empty element after a final `\n` is the file's trailing newline.
    let limit = match lines.last() {
      Some(last) if last.is_empty() => lines.len() - 1,
      _ => lines.len(),
    };
    while resume < limit && lines[resume].trim().is_empty() {
      resume += 1;
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..start]);
    out.extend_from_slice(&lines[resume..]);
    out.join("\n")
  }
}
