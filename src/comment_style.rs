//! # Comment Style Module
//!
//! This module maps file names to the comment syntax used to write a license
//! header into them, and decides whether a file may be touched at all.
//!
//! Decision precedence for [`StyleRegistry::select`]:
//! 1. Extensions in the exclusion table (structured data, documents, archives,
//!    media, compiled artifacts) are always excluded.
//! 2. Extensions in the known table (or in a configured override) get their
//!    comment style.
//! 3. Extensionless files are included with the default `#` line style only
//!    when [`is_text_like`] classifies their leading bytes as text.
//!
//! Any other extension is excluded.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::Read as _;
use std::path::Path;
use std::sync::LazyLock;

/// Number of leading bytes sampled by the binary sniff.
pub const SNIFF_LEN: usize = 512;

/// Share of non-printable, non-whitespace bytes above which a sample is
/// treated as binary. This is a heuristic, not an encoding detector.
pub const NON_PRINTABLE_RATIO: f64 = 0.30;

/// Comment syntax for one file type.
///
/// `line` is the token written before every header line. When `block_start`
/// equals `line` (CSS, HTML and friends), the whole header is wrapped in a
/// single block comment instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
  /// Line comment token, written without a trailing space
  pub line: String,
  /// Opening token of a block comment, if the language has one
  pub block_start: Option<String>,
  /// Closing token of a block comment, if the language has one
  pub block_end: Option<String>,
}

impl CommentStyle {
  /// Create a line-comment style with no block delimiters.
  pub fn line(prefix: &str) -> Self {
    Self {
      line: prefix.to_string(),
      block_start: None,
      block_end: None,
    }
  }

  /// Create a style that has both a line token and block delimiters.
  pub fn block(line: &str, start: &str, end: &str) -> Self {
    Self {
      line: line.to_string(),
      block_start: Some(start.to_string()),
      block_end: Some(end.to_string()),
    }
  }

  /// Whether headers for this style are wrapped in one block comment.
  pub fn wraps_in_block(&self) -> bool {
    self.block_end.is_some() && self.block_start.as_deref() == Some(self.line.as_str())
  }
}

/// Why a file was not selected for processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeReason {
  /// The extension is in the exclusion table
  ExcludedType,
  /// The extension has no known comment style
  UnknownType,
  /// An extensionless file whose content looks binary
  Binary,
}

impl fmt::Display for ExcludeReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ExcludedType => write!(f, "Excluded file type"),
      Self::UnknownType => write!(f, "Unknown file type"),
      Self::Binary => write!(f, "Binary file"),
    }
  }
}

/// Outcome of looking a file up in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  /// The file should be processed with this comment style
  Include(CommentStyle),
  /// The file must not be touched
  Exclude(ExcludeReason),
}

/// Formats whose structure a header would break, plus binary formats.
const EXCLUDED_EXTENSIONS: &[&str] = &[
  ".md", ".txt", ".json", ".xml", ".csv", ".tsv", ".log", ".out", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
  ".pptx", ".zip", ".tar", ".gz", ".bz2", ".xz", ".7z", ".rar", ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff",
  ".svg", ".ico", ".mp3", ".mp4", ".avi", ".mov", ".mkv", ".wav", ".flac", ".exe", ".dll", ".so", ".dylib", ".a",
  ".lib", ".obj", ".o", ".class", ".jar", ".war", ".ear", ".pyc", ".pyo", ".pyd", ".whl", ".egg", ".deb", ".rpm",
  ".msi", ".dmg", ".iso", ".img", ".lock", ".ipynb",
];

/// Known extensions: (extension, line token, block start, block end).
const KNOWN_STYLES: &[(&str, &str, Option<&str>, Option<&str>)] = &[
  (".go", "//", Some("/*"), Some("*/")),
  (".py", "#", None, None),
  (".sh", "#", None, None),
  (".bash", "#", None, None),
  (".zsh", "#", None, None),
  (".rb", "#", None, None),
  (".js", "//", Some("/*"), Some("*/")),
  (".mjs", "//", Some("/*"), Some("*/")),
  (".cjs", "//", Some("/*"), Some("*/")),
  (".ts", "//", Some("/*"), Some("*/")),
  (".tsx", "//", Some("/*"), Some("*/")),
  (".jsx", "//", Some("/*"), Some("*/")),
  (".html", "<!--", Some("<!--"), Some("-->")),
  (".htm", "<!--", Some("<!--"), Some("-->")),
  (".css", "/*", Some("/*"), Some("*/")),
  (".scss", "//", Some("/*"), Some("*/")),
  (".sass", "//", Some("/*"), Some("*/")),
  (".less", "//", Some("/*"), Some("*/")),
  (".java", "//", Some("/*"), Some("*/")),
  (".c", "//", Some("/*"), Some("*/")),
  (".cpp", "//", Some("/*"), Some("*/")),
  (".cc", "//", Some("/*"), Some("*/")),
  (".cxx", "//", Some("/*"), Some("*/")),
  (".h", "//", Some("/*"), Some("*/")),
  (".hpp", "//", Some("/*"), Some("*/")),
  (".rs", "//", Some("/*"), Some("*/")),
  (".swift", "//", Some("/*"), Some("*/")),
  (".kt", "//", Some("/*"), Some("*/")),
  (".scala", "//", Some("/*"), Some("*/")),
  (".cs", "//", Some("/*"), Some("*/")),
  (".yaml", "#", None, None),
  (".yml", "#", None, None),
  (".toml", "#", None, None),
  (".ini", "#", None, None),
  (".cfg", "#", None, None),
  (".conf", "#", None, None),
  (".sql", "--", Some("/*"), Some("*/")),
  (".lua", "--", Some("--[["), Some("--]]")),
  (".r", "#", None, None),
  (".rmd", "<!--", Some("<!--"), Some("-->")),
  (".m", "//", Some("/*"), Some("*/")),
  (".mm", "//", Some("/*"), Some("*/")),
  (".vim", "\"", None, None),
  (".vimrc", "\"", None, None),
  (".el", ";;", None, None),
  (".lisp", ";;", None, None),
  (".lsp", ";;", None, None),
  (".clj", ";;", None, None),
  (".cljs", ";;", None, None),
  (".hs", "--", Some("{-"), Some("-}")),
  (".lhs", "--", Some("{-"), Some("-}")),
  (".ml", "(*", Some("(*"), Some("*)")),
  (".mli", "(*", Some("(*"), Some("*)")),
  (".pas", "//", Some("(*"), Some("*)")),
  (".pl", "#", None, None),
  (".pm", "#", None, None),
  (".php", "//", Some("/*"), Some("*/")),
  (".dart", "//", Some("/*"), Some("*/")),
  (".f", "C", None, None),
  (".f90", "!", None, None),
  (".f95", "!", None, None),
  (".jl", "#", Some("#="), Some("=#")),
  (".zig", "//", None, None),
  (".nim", "#", Some("#["), Some("]#")),
  (".cr", "#", None, None),
  (".d", "//", Some("/*"), Some("*/")),
  (".ex", "#", None, None),
  (".exs", "#", None, None),
  (".erl", "%", None, None),
  (".hrl", "%", None, None),
  (".fs", "//", Some("(*"), Some("*)")),
  (".fsx", "//", Some("(*"), Some("*)")),
  (".fsi", "//", Some("(*"), Some("*)")),
  (".v", "//", Some("/*"), Some("*/")),
  (".vv", "//", Some("/*"), Some("*/")),
  (".bat", "REM", None, None),
  (".cmd", "REM", None, None),
  (".ps1", "#", Some("<#"), Some("#>")),
  (".psm1", "#", Some("<#"), Some("#>")),
];

/// Interior prefix of a block-wrapped header line, trimmed.
pub const BLOCK_INTERIOR: &str = "*";

static BUILTIN_STYLES: LazyLock<HashMap<&'static str, CommentStyle>> = LazyLock::new(|| {
  KNOWN_STYLES
    .iter()
    .map(|&(ext, line, start, end)| {
      let style = CommentStyle {
        line: line.to_string(),
        block_start: start.map(str::to_string),
        block_end: end.map(str::to_string),
      };
      (ext, style)
    })
    .collect()
});

/// Style used for extensionless files that pass the text sniff.
pub fn default_style() -> CommentStyle {
  CommentStyle::line("#")
}

/// Registry of comment styles: the builtin table plus configured overrides.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
  /// Overrides keyed by lowercase extension with leading dot
  overrides: HashMap<String, CommentStyle>,
}

impl StyleRegistry {
  /// Registry backed by the builtin tables only.
  pub fn builtin() -> Self {
    Self::default()
  }

  /// Registry with per-extension overrides in front of the builtin table.
  ///
  /// Keys may be given with or without the leading dot and in any case.
  /// Overrides never re-enable an excluded extension.
  pub fn with_overrides(overrides: HashMap<String, CommentStyle>) -> Self {
    let overrides = overrides
      .into_iter()
      .map(|(ext, style)| {
        let ext = ext.to_lowercase();
        let key = if ext.starts_with('.') { ext } else { format!(".{ext}") };
        (key, style)
      })
      .collect();
    Self { overrides }
  }

  /// Looks up the style for an extension key such as `.rs`.
  pub fn lookup(&self, key: &str) -> Option<CommentStyle> {
    self
      .overrides
      .get(key)
      .or_else(|| BUILTIN_STYLES.get(key))
      .cloned()
  }

  /// Decides whether `path` is processed and with which comment style.
  pub fn select(&self, path: &Path) -> Selection {
    match extension_key(path) {
      Some(key) if is_excluded_extension(&key) => Selection::Exclude(ExcludeReason::ExcludedType),
      Some(key) => match self.lookup(&key) {
        Some(style) => Selection::Include(style),
        None => Selection::Exclude(ExcludeReason::UnknownType),
      },
      None if is_text_like(path) => Selection::Include(default_style()),
      None => Selection::Exclude(ExcludeReason::Binary),
    }
  }

  /// Every comment token known to the registry that can be recognized
  /// without knowing the file type.
  ///
  /// Alphabetic tokens (`REM`, Fortran's `C`) are left out because they would
  /// match ordinary prose; callers that know the file's style add its own
  /// prefix separately.
  pub fn comment_tokens(&self) -> Vec<String> {
    let mut tokens = BTreeSet::new();
    tokens.insert(BLOCK_INTERIOR.to_string());

    for style in BUILTIN_STYLES.values().chain(self.overrides.values()) {
      let candidates = [Some(&style.line), style.block_start.as_ref(), style.block_end.as_ref()];
      for token in candidates.into_iter().flatten() {
        let token = token.trim();
        if token.starts_with(|c: char| c.is_alphanumeric()) || token.is_empty() {
          continue;
        }
        tokens.insert(token.to_string());
      }
    }

    tokens.into_iter().collect()
  }
}

/// Whether `key` (lowercase, with leading dot) is in the exclusion table.
pub fn is_excluded_extension(key: &str) -> bool {
  EXCLUDED_EXTENSIONS.contains(&key)
}

/// Lowercase extension with a leading dot, or `None` for extensionless files.
///
/// Dotfiles without a further dot (`.vimrc`) use their whole name as the key.
pub fn extension_key(path: &Path) -> Option<String> {
  let file_name = path.file_name()?.to_str()?;

  if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
    return Some(format!(".{}", ext.to_lowercase()));
  }

  let dotted = file_name.strip_prefix('.')?;
  if dotted.is_empty() || dotted.contains('.') {
    return None;
  }
  Some(file_name.to_lowercase())
}

/// Reads up to [`SNIFF_LEN`] bytes of `path` and reports whether they look
/// like text. Unreadable and empty files are not text.
pub fn is_text_like(path: &Path) -> bool {
  let Ok(file) = std::fs::File::open(path) else {
    return false;
  };

  let mut sample = Vec::with_capacity(SNIFF_LEN);
  if file.take(SNIFF_LEN as u64).read_to_end(&mut sample).is_err() {
    return false;
  }

  looks_like_text(&sample)
}

/// Binary sniff over a byte sample.
///
/// Any NUL byte, or more than [`NON_PRINTABLE_RATIO`] of bytes that are
/// neither printable nor whitespace, marks the sample as binary. Bytes in the
/// Latin-1 printable range (`0xA0..=0xFF`) count as printable so UTF-8 text
/// with some non-ASCII characters still passes.
pub fn looks_like_text(sample: &[u8]) -> bool {
  if sample.is_empty() || sample.contains(&0) {
    return false;
  }

  let non_printable = sample
    .iter()
    .filter(|&&b| !(b.is_ascii_graphic() || b == b' ' || b.is_ascii_whitespace() || b == 0x0b || b >= 0xa0))
    .count();

  (non_printable as f64) / (sample.len() as f64) <= NON_PRINTABLE_RATIO
}

/// Formats a header body with `style`.
///
/// Block-wrapping styles produce an opening token, ` * `-prefixed interior
/// lines and a closing token. Every other style prefixes each line with the
/// line token and a space; blank lines get the bare token. The result has no
/// trailing newline.
pub fn format_header(body: &str, style: &CommentStyle) -> String {
  let mut lines = Vec::new();

  if style.wraps_in_block() {
    lines.push(style.line.clone());
    for line in body.lines() {
      if line.trim().is_empty() {
        lines.push(format!(" {BLOCK_INTERIOR}"));
      } else {
        lines.push(format!(" {BLOCK_INTERIOR} {line}"));
      }
    }
    if let Some(end) = &style.block_end {
      lines.push(format!(" {end}"));
    }
    return lines.join("\n");
  }

  for line in body.lines() {
    if line.trim().is_empty() {
      lines.push(style.line.clone());
    } else {
      lines.push(format!("{} {}", style.line, line));
    }
  }
  lines.join("\n")
}
