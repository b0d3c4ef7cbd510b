//! Input/output types for the size engine (JSON contract with callers).

use serde::{Deserialize, Serialize};

use crate::reconcile::LabelChanges;
use crate::score::FileScore;

/// A label already attached to the pull request. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl Label {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      color: None,
      description: None,
    }
  }
}

/// Input: one JSON object on stdin.
#[derive(Debug, Deserialize)]
pub struct Input {
  /// Unified diff text as served by the platform.
  pub diff: String,
  #[serde(default)]
  pub labels: Vec<Label>,
}

/// Output: the outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
  pub score: f64,
  pub size: String,
  pub label: String,
  pub color: String,
  pub changes: LabelChanges,
  pub prompt_for_reason: bool,
  pub files: Vec<FileScore>,
}
