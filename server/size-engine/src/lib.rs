//! PR Size Engine: scores a unified diff and picks a size label.
//!
//! Ignore rules drop whole files, every remaining added/removed line is
//! weighted, the total lands on the size ladder, and the target label is
//! reconciled against the labels already attached. Pure computation: no
//! network, no environment lookups outside [`Config::from_env`].

pub mod bucket;
pub mod classify;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod reconcile;
pub mod score;
pub mod types;

pub use bucket::{label_color, SizeThresholds};
pub use classify::{Classification, LineClassifier};
pub use config::Config;
pub use diff::{DiffLine, FileDiff, Hunk, LineKind, ParsedDiff};
pub use engine::SizeEngine;
pub use error::EngineError;
pub use matcher::PathMatcher;
pub use reconcile::{reconcile, LabelChanges};
pub use score::{score_changes, IgnoreFilter, ScoreReport};
pub use types::{Assessment, Input, Label};

/// Run the engine on parsed input with the given configuration (no I/O).
pub fn run(input: &Input, config: Config) -> Result<Assessment, EngineError> {
  let engine = SizeEngine::new(config)?;
  engine.assess(&input.diff, input.labels.iter().map(|l| l.name.as_str()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ignored_lockfile_is_listed_but_not_scored() {
    let input = Input {
      diff: "\
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1 @@
-Old title
+New title
diff --git a/package-lock.json b/package-lock.json
--- a/package-lock.json
+++ b/package-lock.json
@@ -1 +1 @@
-  \"version\": \"1.0.0\",
+  \"version\": \"1.0.1\",
"
      .to_string(),
      labels: vec![Label::named("size/L"), Label::named("docs")],
    };
    let config = Config {
      ignored: "package-lock.json".into(),
      ..Config::default()
    };
    let out = run(&input, config).unwrap();
    assert_eq!(out.score, 2.0);
    assert_eq!(out.label, "size/XS");
    assert_eq!(out.changes.add, vec!["size/XS"]);
    assert_eq!(out.changes.remove, vec!["size/L"]);
    assert_eq!(out.files.len(), 2);
    assert!(out.files[1].ignored);
  }
}
