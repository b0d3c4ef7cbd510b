//! Core engine: validated configuration plus compiled rules, one pipeline.

use tracing::info;

use crate::bucket::label_color;
use crate::classify::LineClassifier;
use crate::config::Config;
use crate::diff::{self, ParsedDiff};
use crate::error::EngineError;
use crate::matcher::PathMatcher;
use crate::reconcile::reconcile;
use crate::score::score_changes;
use crate::types::Assessment;

/// Compiled once per process; every `assess` call is pure.
#[derive(Debug, Clone)]
pub struct SizeEngine {
  config: Config,
  matcher: PathMatcher,
  classifier: LineClassifier,
}

impl SizeEngine {
  /// Compile ignore rules and test-file patterns. Thresholds were already
  /// validated when `config.thresholds` was built.
  pub fn new(config: Config) -> Result<Self, EngineError> {
    let matcher = PathMatcher::compile(&config.ignored)?;
    let classifier = LineClassifier::new(&config)?;
    Ok(Self {
      config,
      matcher,
      classifier,
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Parse the diff text, then assess it. Unparsable diffs are fatal.
  pub fn assess<'a, I>(&self, diff_text: &str, current_labels: I) -> Result<Assessment, EngineError>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let parsed = diff::parse(diff_text)?;
    Ok(self.assess_parsed(&parsed, current_labels))
  }

  pub fn assess_parsed<'a, I>(&self, diff: &ParsedDiff, current_labels: I) -> Assessment
  where
    I: IntoIterator<Item = &'a str>,
  {
    let report = score_changes(&self.matcher, &self.classifier, diff);
    let size = self.config.thresholds.bucket(report.total).to_string();
    let label = self.config.label_for(&size);
    let changes = reconcile(&label, &self.config.label_prefix, current_labels);
    let prompt_for_reason = self.should_prompt(report.total);

    info!(
      score = report.total,
      files = report.files.len(),
      label = %label,
      add = ?changes.add,
      remove = ?changes.remove,
      prompt_for_reason,
      "assessed change size"
    );

    Assessment {
      score: report.total,
      color: label_color(&size).to_string(),
      size,
      label,
      changes,
      prompt_for_reason,
      files: report.files,
    }
  }

  /// Large enough to ask the author why.
  pub fn should_prompt(&self, score: f64) -> bool {
    score >= self.config.prompt_threshold
  }
}
