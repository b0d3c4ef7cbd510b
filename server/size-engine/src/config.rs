//! Engine configuration with sane defaults.
//!
//! Built once at process start (usually from the environment) and handed to
//! [`crate::SizeEngine::new`]; nothing inside the engine reads the
//! environment on its own.

use std::collections::BTreeMap;

use crate::bucket::SizeThresholds;
use crate::error::EngineError;

/// Single-line comment markers keyed by file extension.
const DEFAULT_COMMENT_MARKERS: &[(&str, &str)] = &[
  ("bash", "#"),
  ("c", "//"),
  ("cpp", "//"),
  ("cs", "//"),
  ("dart", "//"),
  ("ex", "#"),
  ("exs", "#"),
  ("go", "//"),
  ("h", "//"),
  ("hpp", "//"),
  ("hs", "--"),
  ("java", "//"),
  ("js", "//"),
  ("jsx", "//"),
  ("kt", "//"),
  ("lua", "--"),
  ("php", "//"),
  ("pl", "#"),
  ("py", "#"),
  ("r", "#"),
  ("rb", "#"),
  ("rs", "//"),
  ("scala", "//"),
  ("sh", "#"),
  ("sql", "--"),
  ("swift", "//"),
  ("toml", "#"),
  ("ts", "//"),
  ("tsx", "//"),
  ("yaml", "#"),
  ("yml", "#"),
];

/// Test-file naming conventions keyed by file extension (regex over the path).
const DEFAULT_TEST_PATTERNS: &[(&str, &str)] = &[
  ("cjs", r"\.(test|spec)\.cjs$"),
  ("cs", r"Tests?\.cs$"),
  ("exs", r"_test\.exs$"),
  ("go", r"_test\.go$"),
  ("java", r"Tests?\.java$"),
  ("js", r"\.(test|spec)\.js$"),
  ("jsx", r"\.(test|spec)\.jsx$"),
  ("kt", r"Tests?\.kt$"),
  ("mjs", r"\.(test|spec)\.mjs$"),
  ("py", r"(^|/)test_[^/]*\.py$|_test\.py$"),
  ("rb", r"_(spec|test)\.rb$"),
  ("rs", r"_test\.rs$|(^|/)tests/"),
  ("ts", r"\.(test|spec)\.ts$"),
  ("tsx", r"\.(test|spec)\.tsx$"),
];

/// Tunable knobs for scoring, bucketing and labelling.
#[derive(Debug, Clone)]
pub struct Config {
  /// Newline-delimited ignore rules (`!` negates).
  pub ignored: String,
  /// Size ladder: minimum score → size name.
  pub thresholds: SizeThresholds,
  /// Reserved prefix every size label carries.
  pub label_prefix: String,
  /// Scores at or above this ask the author for a reason.
  pub prompt_threshold: f64,
  /// Skip lines that only add or remove a single-line comment.
  pub comment_aware: bool,
  /// Extension → single-line comment marker. No entry ⇒ baseline rule.
  pub comment_markers: BTreeMap<String, String>,
  /// Extension → test-file path regex. No entry ⇒ never a test file.
  pub test_patterns: BTreeMap<String, String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      ignored: String::new(),
      thresholds: SizeThresholds::default(),
      label_prefix: "size/".to_string(),
      prompt_threshold: 500.0,
      comment_aware: false,
      comment_markers: table(DEFAULT_COMMENT_MARKERS),
      test_patterns: table(DEFAULT_TEST_PATTERNS),
    }
  }
}

impl Config {
  /// Load from process environment variables.
  pub fn from_env() -> Result<Self, EngineError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Load from an arbitrary key lookup; unset keys keep their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();

    if let Some(ignored) = lookup("IGNORED") {
      config.ignored = ignored;
    }

    let defaults = SizeThresholds::default();
    let mut steps = Vec::with_capacity(defaults.steps().len());
    for (min, name) in defaults.steps() {
      let key = format!("SIZE_{name}");
      let min = match lookup(&key) {
        Some(raw) => parse_u32(&key, &raw)?,
        None => *min,
      };
      steps.push((min, name.clone()));
    }
    config.thresholds = SizeThresholds::new(steps)?;

    if let Some(prefix) = lookup("LABEL_PREFIX") {
      let prefix = prefix.trim();
      if prefix.is_empty() {
        return Err(EngineError::validation("LABEL_PREFIX", "must not be empty"));
      }
      config.label_prefix = prefix.to_string();
    }

    if let Some(raw) = lookup("PROMPT_THRESHOLD") {
      config.prompt_threshold = f64::from(parse_u32("PROMPT_THRESHOLD", &raw)?);
    }

    if let Some(raw) = lookup("COMMENT_AWARE") {
      config.comment_aware = parse_bool("COMMENT_AWARE", &raw)?;
    }

    if let Some(raw) = lookup("COMMENT_MARKERS") {
      apply_overrides("COMMENT_MARKERS", &raw, &mut config.comment_markers)?;
    }

    if let Some(raw) = lookup("TEST_PATTERNS") {
      apply_overrides("TEST_PATTERNS", &raw, &mut config.test_patterns)?;
    }

    Ok(config)
  }

  /// Full label name for a size, e.g. `size/M`.
  pub fn label_for(&self, size: &str) -> String {
    format!("{}{}", self.label_prefix, size)
  }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
  entries
    .iter()
    .map(|(ext, value)| (ext.to_string(), value.to_string()))
    .collect()
}

/// Lowercase, without a leading dot.
pub(crate) fn normalize_extension(ext: &str) -> String {
  ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn parse_u32(field: &str, raw: &str) -> Result<u32, EngineError> {
  raw
    .trim()
    .parse()
    .map_err(|_| EngineError::validation(field, &format!("expected a non-negative integer, got {raw:?}")))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, EngineError> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" | "on" => Ok(true),
    "false" | "0" | "no" | "off" | "" => Ok(false),
    _ => Err(EngineError::validation(field, &format!("expected true|false, got {raw:?}"))),
  }
}

/// Split a multi-line setting on `\n`, `\r\n` or a bare `\r`; each break
/// counts as one line.
pub(crate) fn setting_lines(text: &str) -> impl Iterator<Item = &str> {
  text.split('\n').flat_map(|line| {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split('\r')
  })
}

/// Merge `ext=value` lines over a table. An empty value drops the entry.
fn apply_overrides(
  field: &str,
  raw: &str,
  table: &mut BTreeMap<String, String>,
) -> Result<(), EngineError> {
  for line in setting_lines(raw).map(str::trim) {
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    let (ext, value) = line
      .split_once('=')
      .ok_or_else(|| EngineError::validation(field, &format!("expected ext=value, got {line:?}")))?;
    let ext = normalize_extension(ext);
    if ext.is_empty() {
      return Err(EngineError::validation(field, &format!("missing extension in {line:?}")));
    }
    let value = value.trim();
    if value.is_empty() {
      table.remove(&ext);
    } else {
      table.insert(ext, value.to_string());
    }
  }
  Ok(())
}
