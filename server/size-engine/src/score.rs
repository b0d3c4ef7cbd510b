//! Change score: weighted significant-line count over non-ignored files.

use serde::Serialize;
use tracing::debug;

use crate::classify::LineClassifier;
use crate::diff::{FileDiff, ParsedDiff};
use crate::matcher::PathMatcher;

/// Decides whether one side of a file is ignored.
pub trait IgnoreFilter {
  fn is_ignored(&self, path: Option<&str>) -> bool;

  /// A file is skipped only when both of its sides are ignored.
  fn is_file_ignored(&self, file: &FileDiff) -> bool {
    self.is_ignored(file.old_path.as_deref()) && self.is_ignored(file.new_path.as_deref())
  }
}

impl IgnoreFilter for PathMatcher {
  fn is_ignored(&self, path: Option<&str>) -> bool {
    PathMatcher::is_ignored(self, path)
  }
}

impl<F> IgnoreFilter for F
where
  F: Fn(Option<&str>) -> bool,
{
  fn is_ignored(&self, path: Option<&str>) -> bool {
    self(path)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileScore {
  pub path: String,
  pub ignored: bool,
  pub counted_lines: usize,
  pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreReport {
  pub total: f64,
  pub files: Vec<FileScore>,
}

/// Sum line weights across every file not ignored on both sides.
pub fn score_changes<I>(filter: &I, classifier: &LineClassifier, diff: &ParsedDiff) -> ScoreReport
where
  I: IgnoreFilter + ?Sized,
{
  let mut report = ScoreReport::default();
  for file in &diff.files {
    let entry = score_file(filter, classifier, file);
    debug!(
      path = %entry.path,
      ignored = entry.ignored,
      counted_lines = entry.counted_lines,
      score = entry.score,
      "scored file"
    );
    report.total += entry.score;
    report.files.push(entry);
  }
  report
}

fn score_file<I>(filter: &I, classifier: &LineClassifier, file: &FileDiff) -> FileScore
where
  I: IgnoreFilter + ?Sized,
{
  let path = file.path().unwrap_or_default().to_string();
  let ignored = filter.is_file_ignored(file);
  if ignored {
    return FileScore {
      path,
      ignored,
      counted_lines: 0,
      score: 0.0,
    };
  }

  let rules = classifier.for_file(file.path());
  let mut counted_lines = 0;
  let mut score = 0.0;
  for line in file.hunks.iter().flat_map(|hunk| &hunk.lines) {
    let result = rules.classify(line);
    if result.counted {
      counted_lines += 1;
      score += result.weight;
    }
  }
  FileScore {
    path,
    ignored,
    counted_lines,
    score,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::diff::{DiffLine, Hunk};

  fn file(old: Option<&str>, new: Option<&str>, lines: Vec<DiffLine>) -> FileDiff {
    FileDiff {
      old_path: old.map(str::to_string),
      new_path: new.map(str::to_string),
      hunks: vec![Hunk {
        old_start: 1,
        old_lines: 0,
        new_start: 1,
        new_lines: 0,
        lines,
      }],
    }
  }

  fn classifier() -> LineClassifier {
    LineClassifier::new(&Config::default()).unwrap()
  }

  #[test]
  fn twelve_added_lines_score_twelve() {
    let lines = (0..12)
      .map(|i| DiffLine::added(&format!("let v{i} = compute({i});")))
      .collect();
    let diff = ParsedDiff {
      files: vec![file(None, Some("b/src/a.rs"), lines)],
    };
    let report = score_changes(&PathMatcher::default(), &classifier(), &diff);
    assert_eq!(report.total, 12.0);
    assert_eq!(report.files[0].counted_lines, 12);
  }

  #[test]
  fn whitespace_only_diff_scores_zero() {
    let blank = vec![
      DiffLine::context("foo()"),
      DiffLine::added("    "),
      DiffLine::removed("\t"),
      DiffLine::added(""),
    ];
    let diff = ParsedDiff {
      files: vec![file(Some("a/x.rs"), Some("b/x.rs"), blank)],
    };
    let report = score_changes(&PathMatcher::default(), &classifier(), &diff);
    assert_eq!(report.total, 0.0);
    assert_eq!(report.files[0].counted_lines, 0);
  }

  #[test]
  fn ignored_files_contribute_nothing() {
    let matcher = PathMatcher::compile("*.lock").unwrap();
    let diff = ParsedDiff {
      files: vec![
        file(
          Some("a/Cargo.lock"),
          Some("b/Cargo.lock"),
          vec![DiffLine::added("version = \"1.2.3\"")],
        ),
        file(
          Some("a/src/a.rs"),
          Some("b/src/a.rs"),
          vec![DiffLine::added("call(a, b);")],
        ),
      ],
    };
    let report = score_changes(&matcher, &classifier(), &diff);
    assert_eq!(report.total, 1.0);
    assert!(report.files[0].ignored);
    assert!(!report.files[1].ignored);
  }

  #[test]
  fn rename_out_of_ignored_area_still_counts() {
    let matcher = PathMatcher::compile("vendor/**").unwrap();
    let diff = ParsedDiff {
      files: vec![file(
        Some("a/vendor/x.c"),
        Some("b/src/x.c"),
        vec![DiffLine::added("int x = y + 1;")],
      )],
    };
    assert_eq!(score_changes(&matcher, &classifier(), &diff).total, 1.0);
  }

  #[test]
  fn file_ignored_only_when_both_sides_match() {
    let vendored = |path: Option<&str>| match path {
      Some(p) => p[2..].starts_with("vendor/"),
      None => true,
    };
    let moved_out = file(Some("a/vendor/x.c"), Some("b/src/x.c"), vec![]);
    let moved_in = file(Some("a/vendor/x.c"), Some("b/vendor/y.c"), vec![]);
    let created = file(None, Some("b/vendor/new.c"), vec![]);
    let deleted = file(Some("a/src/gone.c"), None, vec![]);
    assert!(!vendored.is_file_ignored(&moved_out));
    assert!(vendored.is_file_ignored(&moved_in));
    assert!(vendored.is_file_ignored(&created));
    assert!(!vendored.is_file_ignored(&deleted));
  }

  #[test]
  fn closures_work_as_filters() {
    let diff = ParsedDiff {
      files: vec![file(Some("a/a.rs"), Some("b/a.rs"), vec![DiffLine::added("x(y);")])],
    };
    let everything = |_: Option<&str>| true;
    let nothing = |_: Option<&str>| false;
    assert_eq!(score_changes(&everything, &classifier(), &diff).total, 0.0);
    assert_eq!(score_changes(&nothing, &classifier(), &diff).total, 1.0);
  }

  #[test]
  fn files_without_hunks_score_zero() {
    let diff = ParsedDiff {
      files: vec![FileDiff {
        old_path: Some("a/old.rs".into()),
        new_path: Some("b/new.rs".into()),
        hunks: Vec::new(),
      }],
    };
    let report = score_changes(&PathMatcher::default(), &classifier(), &diff);
    assert_eq!(report.total, 0.0);
    assert_eq!(report.files[0].path, "b/new.rs");
  }

  #[test]
  fn deleted_file_is_classified_by_its_old_path() {
    let diff = ParsedDiff {
      files: vec![file(
        Some("a/pkg/x_test.go"),
        None,
        vec![DiffLine::removed("assert.Equal(t, 1, x)")],
      )],
    };
    assert_eq!(score_changes(&PathMatcher::default(), &classifier(), &diff).total, 0.5);
  }
}
