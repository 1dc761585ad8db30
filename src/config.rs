//! # Configuration Module
//!
//! This module loads the identity that headers are written for (name, role,
//! department, organization) together with optional tuning: a custom header
//! template, a license override, per-extension comment styles and classifier
//! keywords.
//!
//! Configuration lives in a TOML file, discovered via `--config`, the
//! `LICER_CONFIG` environment variable, or the user's config directory.
//! Identity fields given on the command line are merged over the file.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};

use crate::comment_style::CommentStyle;
use crate::header_detection::HeaderKeywords;
use crate::templates::License;
use crate::verbose_log;

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICER_CONFIG";

/// Directory under the platform config dir holding [`CONFIG_FILENAME`].
pub const CONFIG_DIR_NAME: &str = "licer";

/// The default config file name.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Legacy single-file location under `~/.config`.
pub const LEGACY_CONFIG_FILENAME: &str = "licer.toml";

/// Role of the person the headers are written for.
///
/// The role picks the default license: students publish under MIT, faculty
/// and staff under Apache-2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
  Student,
  Faculty,
  Staff,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Student => write!(f, "Student"),
      Self::Faculty => write!(f, "Faculty"),
      Self::Staff => write!(f, "Staff"),
    }
  }
}

impl FromStr for Role {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "student" => Ok(Self::Student),
      "faculty" => Ok(Self::Faculty),
      "staff" => Ok(Self::Staff),
      _ => Err(ConfigError::InvalidRole(s.to_string())),
    }
  }
}

impl<'de> Deserialize<'de> for Role {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// A complete, validated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub full_name: String,
  pub role: Role,
  pub department: String,
  pub organization: String,
}

/// User-defined comment style for one extension.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CommentStyleConfig {
  /// Token written before every header line (e.g. "//").
  pub line: String,

  /// Opening block token. Set it equal to `line` to wrap headers in a block.
  #[serde(default)]
  pub block_start: Option<String>,

  /// Closing block token.
  #[serde(default)]
  pub block_end: Option<String>,
}

impl From<&CommentStyleConfig> for CommentStyle {
  fn from(config: &CommentStyleConfig) -> Self {
    Self {
      line: config.line.trim().to_string(),
      block_start: config.block_start.clone(),
      block_end: config.block_end.clone(),
    }
  }
}

/// Main configuration struct for licer.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub full_name: Option<String>,

  #[serde(default)]
  pub role: Option<Role>,

  #[serde(default)]
  pub department: Option<String>,

  #[serde(default)]
  pub organization: Option<String>,

  /// Overrides the license implied by the role.
  #[serde(default)]
  pub license: Option<License>,

  /// Custom header body template, relative paths resolve against the
  /// config file's directory.
  #[serde(default)]
  pub template: Option<PathBuf>,

  /// Custom comment styles keyed by extension without the leading dot.
  #[serde(default, rename = "comment-styles")]
  pub comment_styles: HashMap<String, CommentStyleConfig>,

  /// Classifier keyword tables.
  #[serde(default)]
  pub keywords: HeaderKeywords,
}

/// Identity values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
  pub full_name: Option<String>,
  pub role: Option<Role>,
  pub department: Option<String>,
  pub organization: Option<String>,
  pub license: Option<License>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// An identity field is absent or blank.
  #[error("Missing required configuration field '{0}' (set it in the config file or pass it on the command line)")]
  MissingField(&'static str),

  /// The role is not one of Student, Faculty or Staff.
  #[error("Invalid role '{0}': expected Student, Faculty or Staff")]
  InvalidRole(String),

  /// A custom template cannot produce a recognizable header.
  #[error("Invalid header template: {0}")]
  InvalidTemplate(String),

  /// A comment style configuration is invalid.
  #[error("Invalid comment style for '{extension}': {message}")]
  InvalidCommentStyle { extension: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    if let Some(template) = config.template.take() {
      let base = path.parent().unwrap_or_else(|| Path::new("."));
      config.template = Some(if template.is_absolute() { template } else { base.join(template) });
    }

    let config = config.normalize();

    verbose_log!("Loaded {} comment style overrides", config.comment_styles.len());

    Ok(config)
  }

  /// Checks that comment style overrides are usable.
  fn validate(&self) -> Result<(), ConfigError> {
    for (ext, style) in &self.comment_styles {
      if style.line.trim().is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "line field cannot be empty".to_string(),
        });
      }

      if ext.starts_with('.') {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }

      if style.block_start.is_some() != style.block_end.is_some() {
        return Err(ConfigError::InvalidCommentStyle {
          extension: ext.clone(),
          message: "block-start and block-end must be given together".to_string(),
        });
      }
    }

    Ok(())
  }

  /// Normalize extension keys to lowercase for case-insensitive matching.
  fn normalize(self) -> Self {
    let comment_styles = self
      .comment_styles
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();

    Self { comment_styles, ..self }
  }

  /// Applies command-line values over the file's values.
  pub fn merge_cli_overrides(&mut self, overrides: CliOverrides) {
    if let Some(full_name) = overrides.full_name {
      self.full_name = Some(full_name);
    }
    if let Some(role) = overrides.role {
      self.role = Some(role);
    }
    if let Some(department) = overrides.department {
      self.department = Some(department);
    }
    if let Some(organization) = overrides.organization {
      self.organization = Some(organization);
    }
    if let Some(license) = overrides.license {
      self.license = Some(license);
    }
  }

  /// Builds the identity, failing on the first absent or blank field.
  pub fn identity(&self) -> Result<Identity, ConfigError> {
    fn required(value: Option<&String>, field: &'static str) -> Result<String, ConfigError> {
      value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingField(field))
    }

    Ok(Identity {
      full_name: required(self.full_name.as_ref(), "full_name")?,
      role: self.role.ok_or(ConfigError::MissingField("role"))?,
      department: required(self.department.as_ref(), "department")?,
      organization: required(self.organization.as_ref(), "organization")?,
    })
  }

  /// Comment style overrides keyed by extension.
  pub fn style_overrides(&self) -> HashMap<String, CommentStyle> {
    self
      .comment_styles
      .iter()
      .map(|(ext, style)| (ext.clone(), CommentStyle::from(style)))
      .collect()
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICER_CONFIG` environment variable
/// 3. `licer/config.toml` in the platform config directory
/// 4. `~/.config/licer.toml`
///
/// An explicit path is returned even when it does not exist so the caller
/// reports the read failure instead of silently running without identity.
pub fn discover_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR)
    && !env_path.trim().is_empty()
  {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let candidates = [
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME)),
    dirs::home_dir().map(|home| home.join(".config").join(LEGACY_CONFIG_FILENAME)),
  ];

  for candidate in candidates.into_iter().flatten() {
    if candidate.exists() {
      verbose_log!("Using user config: {}", candidate.display());
      return Some(candidate);
    }
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, if any.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Option<Config>> {
  match discover_config_path(explicit_path) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
