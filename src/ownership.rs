//! # Ownership Module
//!
//! Removal is only allowed for headers that are provably ours: the detected
//! block must carry the SPDX marker and name either the configured person or
//! the configured organization. Anything else is left alone.

use crate::config::Identity;
use crate::header_detection::{HeaderDetector, HeaderInfo, LICENSE_MARKER};

/// Verdict on whether a detected header belongs to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
  /// No header carrying the SPDX marker was detected
  NoHeader,
  /// The detected block does not contain the SPDX marker
  MissingMarker,
  /// The header names neither the person nor the organization
  Mismatch,
  /// The header is ours and may be removed
  Owned,
}

/// Checks a classified header against `identity`.
///
/// Names are matched as exact, case-sensitive substrings of the header
/// block. Blank names never match.
pub fn check_ownership(content: &str, info: &HeaderInfo, identity: &Identity) -> Ownership {
  if !info.has_header {
    return Ownership::NoHeader;
  }
  let Some((start, end)) = info.span() else {
    return Ownership::NoHeader;
  };

  let lines: Vec<&str> = content.split('\n').collect();
  if start > end || end >= lines.len() {
    return Ownership::NoHeader;
  }
  let header = lines[start..=end].join("\n");

  if !header.to_lowercase().contains(LICENSE_MARKER) {
    return Ownership::MissingMarker;
  }

  let names = |name: &str| {
    let name = name.trim();
    !name.is_empty() && header.contains(name)
  };

  if names(&identity.full_name) || names(&identity.organization) {
    Ownership::Owned
  } else {
    Ownership::Mismatch
  }
}

/// Whether the header in `content` may be removed on behalf of `identity`.
pub fn can_remove(content: &str, identity: &Identity, detector: &dyn HeaderDetector) -> bool {
  let info = detector.classify(content);
  check_ownership(content, &info, identity) == Ownership::Owned
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Role;
  use crate::header_detection::KeywordHeaderDetector;

  fn identity(name: &str, organization: &str) -> Identity {
    Identity {
      full_name: name.to_string(),
      role: Role::Student,
      department: "Lab".to_string(),
      organization: organization.to_string(),
    }
  }

  #[test]
  fn test_owned_by_name() {
    let detector = KeywordHeaderDetector::default();
    let content = "// Copyright (c) 2025 Jane Doe\n//\n// SPDX-License-Identifier: MIT\n\nfn main() {}\n";
    assert!(can_remove(content, &identity("Jane Doe", "Other Org"), &detector));
  }

  #[test]
  fn test_owned_by_organization() {
    let detector = KeywordHeaderDetector::default();
    let content = "# Copyright 2025 Example University\n#\n# SPDX-License-Identifier: Apache-2.0\n\nx = 1\n";
    assert!(can_remove(content, &identity("Someone Else", "Example University"), &detector));
  }

  #[test]
  fn test_mismatch_refused() {
    let detector = KeywordHeaderDetector::default();
    let content = "// Copyright (c) 2025 John Roe\n// SPDX-License-Identifier: MIT\n\nfn main() {}\n";
    let info = detector.classify(content);
    let me = identity("Jane Doe", "Example University");
    assert_eq!(check_ownership(content, &info, &me), Ownership::Mismatch);
    assert!(!can_remove(content, &me, &detector));
  }

  #[test]
  fn test_name_match_is_case_sensitive() {
    let detector = KeywordHeaderDetector::default();
    let content = "// Copyright (c) 2025 jane doe\n// SPDX-License-Identifier: MIT\n";
    assert!(!can_remove(content, &identity("Jane Doe", "Nope"), &detector));
  }

  #[test]
  fn test_third_party_is_not_a_header() {
    let detector = KeywordHeaderDetector::default();
    let content = "// Copyright 2020 Jane Doe\n\nfn main() {}\n";
    let info = detector.classify(content);
    assert_eq!(check_ownership(content, &info, &identity("Jane Doe", "Org")), Ownership::NoHeader);
  }

  #[test]
  fn test_blank_identity_never_matches() {
    let detector = KeywordHeaderDetector::default();
    let content = "// Copyright 2025\n// SPDX-License-Identifier: MIT\n";
    assert!(!can_remove(content, &identity("  ", ""), &detector));
  }

  #[test]
  fn test_marker_outside_span() {
    let content = "// SPDX-License-Identifier: MIT\n// Copyright Jane Doe\n";
    let info = HeaderInfo {
      has_header: true,
      start_line: Some(1),
      end_line: Some(1),
      ..HeaderInfo::default()
    };
    assert_eq!(
      check_ownership(content, &info, &identity("Jane Doe", "Org")),
      Ownership::MissingMarker
    );
  }
}
