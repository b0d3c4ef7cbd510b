//! Per-line significance and weight.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::config::{normalize_extension, Config};
use crate::diff::DiffLine;
use crate::error::EngineError;

/// Weight of every counted line before deductions.
pub const BASE_WEIGHT: f64 = 1.0;
/// Deduction for an edit that touches a single word.
pub const TRIVIAL_EDIT_DEDUCTION: f64 = 0.5;
/// Deduction for every counted line of a test file.
pub const TEST_FILE_DEDUCTION: f64 = 0.5;

/// One word, optionally in one pair of matching quotes, optionally followed
/// by a single non-word character.
const TRIVIAL_EDIT_PATTERN: &str = r#"^\s*(?:\w+|"\w+"|'\w+'|`\w+`)\W?\s*$"#;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
  pub counted: bool,
  pub weight: f64,
}

impl Classification {
  const SKIPPED: Self = Self {
    counted: false,
    weight: 0.0,
  };
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
  comment_aware: bool,
  comment_markers: BTreeMap<String, String>,
  test_patterns: BTreeMap<String, Regex>,
  trivial_edit: Regex,
}

impl LineClassifier {
  pub fn new(config: &Config) -> Result<Self, EngineError> {
    let mut test_patterns = BTreeMap::new();
    for (ext, pattern) in &config.test_patterns {
      let extension = normalize_extension(ext);
      let regex = Regex::new(pattern).map_err(|source| EngineError::InvalidTestPattern {
        extension: extension.clone(),
        source,
      })?;
      test_patterns.insert(extension, regex);
    }
    let comment_markers = config
      .comment_markers
      .iter()
      .map(|(ext, marker)| (normalize_extension(ext), marker.clone()))
      .collect();
    let trivial_edit = Regex::new(TRIVIAL_EDIT_PATTERN)
      .map_err(|e| EngineError::validation("trivial_edit", &e.to_string()))?;
    Ok(Self {
      comment_aware: config.comment_aware,
      comment_markers,
      test_patterns,
      trivial_edit,
    })
  }

  /// Resolve the per-file rules once for every line of that file.
  ///
  /// `file_name` is a diff-side path (`b/src/x.rs`); the side prefix is
  /// ignored for test-file detection.
  pub fn for_file(&self, file_name: Option<&str>) -> FileRules<'_> {
    let path = file_name.map(strip_side_prefix).unwrap_or("");
    let extension = Path::new(path)
      .extension()
      .and_then(|ext| ext.to_str())
      .map(normalize_extension)
      .unwrap_or_default();
    let comment_marker = if self.comment_aware {
      self.comment_markers.get(&extension).map(String::as_str)
    } else {
      None
    };
    let is_test = self
      .test_patterns
      .get(&extension)
      .is_some_and(|re| re.is_match(path));
    FileRules {
      comment_marker,
      is_test,
      trivial_edit: &self.trivial_edit,
    }
  }

  pub fn classify(&self, line: &DiffLine, file_name: Option<&str>) -> Classification {
    self.for_file(file_name).classify(line)
  }
}

/// Line rules bound to one file.
#[derive(Debug, Clone, Copy)]
pub struct FileRules<'a> {
  comment_marker: Option<&'a str>,
  is_test: bool,
  trivial_edit: &'a Regex,
}

impl FileRules<'_> {
  pub fn classify(&self, line: &DiffLine) -> Classification {
    if !line.is_change() {
      return Classification::SKIPPED;
    }
    let content = line.content();
    if content.trim().is_empty() {
      return Classification::SKIPPED;
    }
    if let Some(marker) = self.comment_marker {
      if content.trim_start().starts_with(marker) {
        return Classification::SKIPPED;
      }
    }

    let mut weight = BASE_WEIGHT;
    if self.trivial_edit.is_match(content) {
      weight -= TRIVIAL_EDIT_DEDUCTION;
    }
    if self.is_test {
      weight -= TEST_FILE_DEDUCTION;
    }
    Classification {
      counted: true,
      weight,
    }
  }
}

fn strip_side_prefix(path: &str) -> &str {
  match path.as_bytes() {
    [b'a' | b'b', b'/', ..] => &path[2..],
    _ => path,
  }
}
