//! # Header Detection Module
//!
//! This module classifies the top of a file: does it carry one of our SPDX
//! headers, a copyright notice written by someone else, or nothing at all, and
//! which lines does that header occupy.
//!
//! The classifier works on lines (split on `\n`) and never looks past the
//! first [`MARKER_WINDOW`] lines for the SPDX marker. Once the marker is
//! found, the header span grows backward over comment, blank and
//! header-start keyword lines, and forward over comment and header-end
//! keyword lines. A bare blank line ends the header going forward.
//!
//! When the file's comment style is known, only that style's tokens mark a
//! comment line; code such as `#include` directly under a header stays code.

use serde::Deserialize;

use crate::comment_style::{BLOCK_INTERIOR, CommentStyle, StyleRegistry};

/// Lowercase form of the SPDX marker line.
pub const LICENSE_MARKER: &str = "spdx-license-identifier";

/// Interpreter directive prefix; the shebang line is never part of a header.
pub const SHEBANG: &str = "#!";

/// Lowercase keyword that signals a third-party notice.
pub const COPYRIGHT: &str = "copyright";

/// Number of leading lines searched for the SPDX marker.
pub const MARKER_WINDOW: usize = 20;

/// Number of lines after the shebang searched for a copyright notice.
pub const THIRD_PARTY_WINDOW: usize = 3;

/// Classification of a file's leading lines.
///
/// At most one of `has_header` and `has_third_party_copyright` is set, and
/// the span is present exactly when one of them is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderInfo {
  /// An SPDX marker was found in the search window
  pub has_header: bool,
  /// A copyright notice without an SPDX marker was found near the top
  pub has_third_party_copyright: bool,
  /// First line of the header block (0-based)
  pub start_line: Option<usize>,
  /// Last line of the header block (0-based, inclusive)
  pub end_line: Option<usize>,
  /// The first line is an interpreter directive
  pub has_shebang: bool,
}

impl HeaderInfo {
  /// Inclusive `(start, end)` line span of the detected block, if any.
  pub const fn span(&self) -> Option<(usize, usize)> {
    match (self.start_line, self.end_line) {
      (Some(start), Some(end)) => Some((start, end)),
      _ => None,
    }
  }

  /// Index of the first line that may hold a header.
  pub const fn body_start(&self) -> usize {
    if self.has_shebang { 1 } else { 0 }
  }
}

/// Keyword tables driving the span walks. All entries are matched
/// case-insensitively as substrings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeaderKeywords {
  /// Lines above the marker containing one of these belong to the header
  pub header_start: Vec<String>,
  /// Lines below the marker containing one of these belong to the header
  pub header_end: Vec<String>,
  /// Lines after a foreign copyright containing one of these continue it
  pub third_party: Vec<String>,
}

impl Default for HeaderKeywords {
  fn default() -> Self {
    let owned = |words: &[&str]| words.iter().map(|w| (*w).to_string()).collect();
    Self {
      header_start: owned(&["copyright", "licensed under", "developed by", "author"]),
      header_end: owned(&["see license", "see the license", "developed by"]),
      third_party: owned(&[
        "permission",
        "license",
        "rights",
        "distribute",
        "modify",
        "warranty",
        "liability",
        "damages",
      ]),
    }
  }
}

impl HeaderKeywords {
  /// Adds the organization name as a header-end continuation keyword.
  pub fn with_organization(mut self, organization: &str) -> Self {
    let organization = organization.trim();
    if !organization.is_empty() {
      self.header_end.push(organization.to_string());
    }
    self
  }

  /// Lowercases every keyword and drops empty ones.
  pub fn normalized(self) -> Self {
    let normalize = |words: Vec<String>| -> Vec<String> {
      words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
    };
    Self {
      header_start: normalize(self.header_start),
      header_end: normalize(self.header_end),
      third_party: normalize(self.third_party),
    }
  }
}

fn contains_any(lower_line: &str, keywords: &[String]) -> bool {
  keywords.iter().any(|k| lower_line.contains(k.as_str()))
}

/// Trait for header classifiers.
///
/// Implementations decide whether content carries a header and where it sits.
/// The processor only talks to this trait, so the heuristic can be swapped
/// without touching the mutation logic.
pub trait HeaderDetector: Send + Sync {
  /// Classifies `content` without any file-type knowledge.
  fn classify(&self, content: &str) -> HeaderInfo;

  /// Classifies `content` knowing the comment style of the file.
  fn classify_for_style(&self, content: &str, _style: &CommentStyle) -> HeaderInfo {
    self.classify(content)
  }
}

/// Keyword and comment-token driven classifier.
#[derive(Debug, Clone)]
pub struct KeywordHeaderDetector {
  keywords: HeaderKeywords,
  comment_tokens: Vec<String>,
}

impl KeywordHeaderDetector {
  /// Creates a detector from keyword tables and recognized comment tokens.
  pub fn new(keywords: HeaderKeywords, comment_tokens: Vec<String>) -> Self {
    Self {
      keywords: keywords.normalized(),
      comment_tokens,
    }
  }

  /// Whether `line` starts (after indentation) with a comment token.
  ///
  /// With a `style`, only that style's own tokens count, so `#include` in C
  /// or `"use strict";` in JavaScript is code. Without one, every token known
  /// to the registry counts.
  pub fn is_comment_line(&self, line: &str, style: Option<&CommentStyle>) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
      return false;
    }
    match style {
      Some(style) => style_tokens(style).any(|t| starts_with_token(trimmed, t)),
      None => self.comment_tokens.iter().any(|t| starts_with_token(trimmed, t)),
    }
  }

  fn classify_with(&self, content: &str, style: Option<&CommentStyle>) -> HeaderInfo {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut info = HeaderInfo {
      has_shebang: lines.first().is_some_and(|l| l.trim_start().starts_with(SHEBANG)),
      ..HeaderInfo::default()
    };
    let first = info.body_start();

    if let Some(marker) = find_marker(&lines, first) {
      info.has_header = true;
      info.start_line = Some(self.walk_header_start(&lines, first, marker, style));
      info.end_line = Some(self.walk_header_end(&lines, marker, style));
      return info;
    }

    if let Some(notice) = find_copyright(&lines, first) {
      info.has_third_party_copyright = true;
      info.start_line = Some(notice);
      info.end_line = Some(self.walk_third_party_end(&lines, notice, style));
    }

    info
  }

  fn walk_header_start(&self, lines: &[&str], first: usize, marker: usize, style: Option<&CommentStyle>) -> usize {
    let mut start = marker;
    while start > first {
      let line = lines[start - 1];
      let belongs = line.trim().is_empty()
        || self.is_comment_line(line, style)
        || contains_any(&line.to_lowercase(), &self.keywords.header_start);
      if !belongs {
        break;
      }
      start -= 1;
    }
    start
  }

  fn walk_header_end(&self, lines: &[&str], marker: usize, style: Option<&CommentStyle>) -> usize {
    let mut end = marker;
    while let Some(line) = lines.get(end + 1) {
      let belongs =
        self.is_comment_line(line, style) || contains_any(&line.to_lowercase(), &self.keywords.header_end);
      if !belongs {
        break;
      }
      end += 1;
    }
    end
  }

  fn walk_third_party_end(&self, lines: &[&str], notice: usize, style: Option<&CommentStyle>) -> usize {
    let mut end = notice;
    for (idx, line) in lines.iter().enumerate().skip(notice + 1) {
      let continues = line.trim().is_empty()
        || self.is_comment_line(line, style)
        || contains_any(&line.to_lowercase(), &self.keywords.third_party);
      if !continues {
        break;
      }
      end = idx;
    }
    end
  }
}

impl Default for KeywordHeaderDetector {
  fn default() -> Self {
    Self::new(HeaderKeywords::default(), StyleRegistry::builtin().comment_tokens())
  }
}

impl HeaderDetector for KeywordHeaderDetector {
  fn classify(&self, content: &str) -> HeaderInfo {
    self.classify_with(content, None)
  }

  fn classify_for_style(&self, content: &str, style: &CommentStyle) -> HeaderInfo {
    self.classify_with(content, Some(style))
  }
}

/// The line token, the block delimiters and, for styles with a block, the
/// ` *` interior prefix.
fn style_tokens(style: &CommentStyle) -> impl Iterator<Item = &str> {
  let interior = style.block_start.as_ref().map(|_| BLOCK_INTERIOR);
  [
    Some(style.line.as_str()),
    style.block_start.as_deref(),
    style.block_end.as_deref(),
    interior,
  ]
  .into_iter()
  .flatten()
  .map(str::trim)
  .filter(|t| !t.is_empty())
}

/// Prefix match where word-like tokens (`REM`, `C`) must end at a word
/// boundary.
fn starts_with_token(trimmed: &str, token: &str) -> bool {
  let Some(rest) = trimmed.strip_prefix(token) else {
    return false;
  };
  !token.ends_with(char::is_alphanumeric) || !rest.starts_with(char::is_alphanumeric)
}

fn find_marker(lines: &[&str], first: usize) -> Option<usize> {
  (first..lines.len().min(MARKER_WINDOW)).find(|&idx| lines[idx].to_lowercase().contains(LICENSE_MARKER))
}

fn find_copyright(lines: &[&str], first: usize) -> Option<usize> {
  (first..lines.len().min(first + THIRD_PARTY_WINDOW)).find(|&idx| lines[idx].to_lowercase().contains(COPYRIGHT))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detector() -> KeywordHeaderDetector {
    KeywordHeaderDetector::default()
  }

  #[test]
  fn test_no_header() {
    let info = detector().classify("fn main() {}\n");
    assert_eq!(info, HeaderInfo::default());
    assert_eq!(info.span(), None);
  }

  #[test]
  fn test_own_header_span() {
    let content = "// Copyright (c) 2025 A. Researcher\n//\n// SPDX-License-Identifier: MIT\n// See LICENSE file for full license text.\n\nfn main() {}\n";
    let info = detector().classify(content);
    assert!(info.has_header);
    assert!(!info.has_third_party_copyright);
    assert_eq!(info.span(), Some((0, 3)));
  }

  #[test]
  fn test_header_after_shebang() {
    let content = "#!/usr/bin/env python3\n# Copyright (c) 2025 A\n#\n# SPDX-License-Identifier: MIT\n\nprint(1)\n";
    let info = detector().classify(content);
    assert!(info.has_shebang);
    assert!(info.has_header);
    assert_eq!(info.span(), Some((1, 3)));
  }

  #[test]
  fn test_marker_outside_window_is_ignored() {
    let mut content = "x = 1\n".repeat(MARKER_WINDOW);
    content.push_str("# SPDX-License-Identifier: MIT\n");
    let info = detector().classify(&content);
    assert!(!info.has_header);
  }

  #[test]
  fn test_backward_walk_stops_at_code() {
    let content = "package main\n// Copyright 2025 Acme\n// SPDX-License-Identifier: MIT\n\nfunc main() {}\n";
    let info = detector().classify(content);
    assert_eq!(info.span(), Some((1, 2)));
  }

  #[test]
  fn test_third_party_block() {
    let content = "// Copyright 2020 Acme Corp\n// Permission is hereby granted\n\nfn main() {}\n";
    let info = detector().classify(content);
    assert!(!info.has_header);
    assert!(info.has_third_party_copyright);
    assert_eq!(info.span(), Some((0, 2)));
  }

  #[test]
  fn test_third_party_single_line() {
    let content = "int x; // Copyright 2020 Acme Corp\nint y;\n";
    let info = detector().classify(content);
    assert!(info.has_third_party_copyright);
    assert_eq!(info.span(), Some((0, 0)));
  }

  #[test]
  fn test_third_party_outside_window() {
    let content = "a\nb\nc\n// Copyright 2020 Acme Corp\n";
    let info = detector().classify(content);
    assert!(!info.has_third_party_copyright);
  }

  #[test]
  fn test_marker_beats_copyright() {
    let content = "// Copyright 2020 Acme Corp\n// SPDX-License-Identifier: Apache-2.0\n";
    let info = detector().classify(content);
    assert!(info.has_header);
    assert!(!info.has_third_party_copyright);
  }

  #[test]
  fn test_style_tokens_replace_generic_tokens() {
    let content = "REM Copyright 2025 A\nREM SPDX-License-Identifier: MIT\nREM more\n\n@echo off\n";
    let style = CommentStyle::line("REM");
    let with_style = detector().classify_for_style(content, &style);
    assert_eq!(with_style.span(), Some((0, 2)));

    let without_style = detector().classify(content);
    assert_eq!(without_style.span(), Some((0, 1)));
  }

  #[test]
  fn test_word_token_needs_boundary() {
    let content = "REM SPDX-License-Identifier: MIT\nREMOVE_ALL=1\n";
    let style = CommentStyle::line("REM");
    assert_eq!(detector().classify_for_style(content, &style).span(), Some((0, 0)));
  }

  fn slash_style() -> CommentStyle {
    CommentStyle::block("//", "/*", "*/")
  }

  #[test]
  fn test_preprocessor_line_after_header_is_code() {
    let content = "// SPDX-License-Identifier: GPL-2.0\n#include <stdio.h>\nint main(void) { return 0; }\n";
    let info = detector().classify_for_style(content, &slash_style());
    assert!(info.has_header);
    assert_eq!(info.span(), Some((0, 0)));
  }

  #[test]
  fn test_inner_attribute_after_notice_is_code() {
    let content = "// Copyright 2020 Acme Corp\n#![no_std]\npub fn f() {}";
    let info = detector().classify_for_style(content, &slash_style());
    assert!(info.has_third_party_copyright);
    assert_eq!(info.span(), Some((0, 0)));
  }

  #[test]
  fn test_directive_string_after_header_is_code() {
    let content =
      "// Copyright 2020 Acme Corp\n// SPDX-License-Identifier: BSD-3-Clause\n\"use strict\";\nrun();\n";
    let info = detector().classify_for_style(content, &slash_style());
    assert!(info.has_header);
    assert_eq!(info.span(), Some((0, 1)));
  }

  #[test]
  fn test_block_interior_counts_for_block_styles() {
    let content = "/*\n * Copyright (c) 2025 A\n *\n * SPDX-License-Identifier: MIT\n * See LICENSE file.\n */\n\nbody {}\n";
    let style = CommentStyle::block("/*", "/*", "*/");
    assert_eq!(detector().classify_for_style(content, &style).span(), Some((0, 5)));
  }

  #[test]
  fn test_organization_keyword_extends_end() {
    let keywords = HeaderKeywords::default().with_organization("Example University");
    let detector = KeywordHeaderDetector::new(keywords, vec!["//".to_string()]);
    let content = "// SPDX-License-Identifier: MIT\nExample University\n\ncode\n";
    assert_eq!(detector.classify(content).span(), Some((0, 1)));
  }
}
