//! # Templates Module
//!
//! This module renders the header body written into files: the text between
//! the comment markers, before any comment formatting is applied.
//!
//! The license follows the role ([`License::for_role`]) unless overridden.
//! Built-in bodies exist for both licenses; a custom template may replace
//! them and is rendered with simple `{{placeholder}}` substitution.
//!
//! ## Example
//!
//! ```rust
//! use licer::config::{Identity, Role};
//! use licer::templates::HeaderRenderer;
//!
//! # fn main() -> anyhow::Result<()> {
//! let identity = Identity {
//!   full_name: "A. Researcher".to_string(),
//!   role: Role::Student,
//!   department: "Research Computing".to_string(),
//!   organization: "Example University".to_string(),
//! };
//!
//! let body = HeaderRenderer::new().render(&identity, "2025")?;
//! assert!(body.starts_with("Copyright (c) 2025 A. Researcher"));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use crate::config::{ConfigError, Identity, Role};
use crate::header_detection::{LICENSE_MARKER, MARKER_WINDOW};
use crate::verbose_log;

/// License written into headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
pub enum License {
  #[serde(rename = "MIT", alias = "mit")]
  #[value(name = "mit")]
  Mit,
  #[serde(rename = "Apache-2.0", alias = "apache-2.0", alias = "Apache2")]
  #[value(name = "apache-2.0")]
  Apache2,
}

impl License {
  /// License implied by a role.
  pub const fn for_role(role: Role) -> Self {
    match role {
      Role::Student => Self::Mit,
      Role::Faculty | Role::Staff => Self::Apache2,
    }
  }

  /// SPDX identifier.
  pub const fn spdx_id(self) -> &'static str {
    match self {
      Self::Mit => "MIT",
      Self::Apache2 => "Apache-2.0",
    }
  }
}

impl fmt::Display for License {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.spdx_id())
  }
}

/// Renders header bodies for an identity.
#[derive(Debug, Clone, Default)]
pub struct HeaderRenderer {
  /// Custom template replacing the built-in bodies
  template: Option<String>,
  /// License override; `None` follows the role
  license: Option<License>,
}

impl HeaderRenderer {
  /// Renderer using the built-in bodies and the role's license.
  pub fn new() -> Self {
    Self::default()
  }

  /// Renderer using `template` as the header body.
  pub fn with_template(template: impl Into<String>) -> Self {
    Self {
      template: Some(template.into()),
      license: None,
    }
  }

  /// Overrides the license implied by the role.
  pub const fn with_license(mut self, license: Option<License>) -> Self {
    self.license = license;
    self
  }

  /// Loads a custom header template from a file.
  pub fn load_template(&mut self, path: &Path) -> Result<()> {
    verbose_log!("Loading template from: {}", path.display());

    let template_content =
      fs::read_to_string(path).with_context(|| format!("Failed to read header template file: {}", path.display()))?;

    self.template = Some(template_content);

    Ok(())
  }

  /// The license headers are written under for `identity`.
  pub fn license_for(&self, identity: &Identity) -> License {
    self.license.unwrap_or_else(|| License::for_role(identity.role))
  }

  /// Renders the header body for `identity` and `year`.
  ///
  /// The result must carry the SPDX marker early enough to be found again by
  /// the classifier, otherwise every run would add another header.
  pub fn render(&self, identity: &Identity, year: &str) -> Result<String, ConfigError> {
    let license = self.license_for(identity);
    verbose_log!("Rendering {} header for year {}", license, year);

    let rendered = match &self.template {
      Some(template) => template
        .replace("{{year}}", year)
        .replace("{{name}}", &identity.full_name)
        .replace("{{organization}}", &identity.organization)
        .replace("{{department}}", &identity.department)
        .replace("{{license}}", license.spdx_id()),
      None => builtin_body(license, identity, year),
    };

    let rendered = rendered.trim_end().to_string();
    validate_body(&rendered)?;
    Ok(rendered)
  }
}

fn builtin_body(license: License, identity: &Identity, year: &str) -> String {
  match license {
    License::Mit => format!(
      "Copyright (c) {year} {}\n\nSPDX-License-Identifier: MIT\nSee LICENSE file for full license text.",
      identity.full_name
    ),
    License::Apache2 => format!(
      "Copyright {year} {}\n\nLicensed under the Apache License, Version 2.0.\nSee the LICENSE file for details.\nSPDX-License-Identifier: Apache-2.0\n\nDeveloped by: {}\n              {}",
      identity.organization, identity.full_name, identity.department
    ),
  }
}

/// Lines a header may lose to a shebang and a block opener before its
/// marker falls out of the classifier's window.
const MARKER_SLACK: usize = 2;

fn validate_body(body: &str) -> Result<(), ConfigError> {
  let marker_line = body
    .lines()
    .position(|line| line.to_lowercase().contains(LICENSE_MARKER))
    .ok_or_else(|| ConfigError::InvalidTemplate("template must contain an SPDX-License-Identifier line".to_string()))?;

  if marker_line + MARKER_SLACK >= MARKER_WINDOW {
    return Err(ConfigError::InvalidTemplate(format!(
      "SPDX-License-Identifier must appear within the first {} lines",
      MARKER_WINDOW - MARKER_SLACK
    )));
  }

  Ok(())
}
