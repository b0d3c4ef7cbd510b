//! Structured error types for the size engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("ignore rule on line {line} is not a valid glob: {pattern}")]
  InvalidPattern {
    line: usize,
    pattern: String,
    #[source]
    source: globset::Error,
  },

  #[error("test-file pattern for .{extension} is not a valid regex")]
  InvalidTestPattern {
    extension: String,
    #[source]
    source: regex::Error,
  },

  #[error("thresholds: {0}")]
  Thresholds(String),

  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("diff line {line}: {reason}")]
  Diff { line: usize, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn thresholds(msg: impl Into<String>) -> Self {
    Self::Thresholds(msg.into())
  }

  pub fn diff(line: usize, reason: impl Into<String>) -> Self {
    Self::Diff {
      line,
      reason: reason.into(),
    }
  }
}
