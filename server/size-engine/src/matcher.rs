//! Ignore rules: ordered globs with `!` negation, compiled once per run.

use globset::{GlobBuilder, GlobMatcher};

use crate::config::setting_lines;
use crate::error::EngineError;

/// Path the diff uses for the missing side of an addition or deletion.
pub const NO_FILE: &str = "/dev/null";

#[derive(Debug, Clone)]
enum Rule {
  /// Matching paths are ignored unless a negation also matches.
  Ignore(GlobMatcher),
  /// Matching paths are never ignored.
  Keep(GlobMatcher),
}

/// Compiled ignore rules.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
  rules: Vec<Rule>,
}

impl PathMatcher {
  /// Compile line-delimited rules (`\n`, `\r\n` or `\r`). Blank lines and
  /// `#` comments are skipped.
  pub fn compile(text: &str) -> Result<Self, EngineError> {
    let mut rules = Vec::new();
    for (idx, raw) in setting_lines(text).enumerate() {
      let line = raw.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let rule = match line.strip_prefix('!') {
        Some(rest) if !rest.is_empty() => Rule::Keep(compile_glob(idx + 1, rest)?),
        _ => Rule::Ignore(compile_glob(idx + 1, line)?),
      };
      rules.push(rule);
    }
    Ok(Self { rules })
  }

  /// Whether a diff-side path (`a/...`, `b/...`) is ignored.
  ///
  /// The missing side of an addition/deletion is always ignored.
  pub fn is_ignored(&self, path: Option<&str>) -> bool {
    let path = match path {
      None | Some(NO_FILE) => return true,
      Some(p) => strip_side_prefix(p),
    };
    let mut ignored = false;
    for rule in &self.rules {
      match rule {
        Rule::Keep(glob) => {
          if glob.is_match(path) {
            return false;
          }
        }
        Rule::Ignore(glob) => {
          if !ignored && glob.is_match(path) {
            ignored = true;
          }
        }
      }
    }
    ignored
  }
}

/// Drop the two-character `a/` / `b/` side prefix.
fn strip_side_prefix(path: &str) -> &str {
  path.char_indices().nth(2).map_or("", |(i, _)| &path[i..])
}

/// `*` stays inside one segment. Patterns without a `/` match the file name
/// at any depth; a leading `/` anchors the pattern at the repository root.
fn compile_glob(line: usize, pattern: &str) -> Result<GlobMatcher, EngineError> {
  let effective = if let Some(anchored) = pattern.strip_prefix('/') {
    anchored.to_string()
  } else if pattern.contains('/') {
    pattern.to_string()
  } else {
    format!("**/{pattern}")
  };
  GlobBuilder::new(&effective)
    .literal_separator(true)
    .build()
    .map(|glob| glob.compile_matcher())
    .map_err(|source| EngineError::InvalidPattern {
      line,
      pattern: pattern.to_string(),
      source,
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::diff::FileDiff;
  use crate::score::IgnoreFilter;

  fn file(old: Option<&str>, new: Option<&str>) -> FileDiff {
    FileDiff {
      old_path: old.map(str::to_string),
      new_path: new.map(str::to_string),
      hunks: Vec::new(),
    }
  }

  #[test]
  fn negation_overrides_earlier_positive_match() {
    let m = PathMatcher::compile("*.md\n!README.md").unwrap();
    assert!(!m.is_ignored(Some("a/README.md")));
    assert!(!m.is_ignored(Some("b/README.md")));
    assert!(m.is_ignored(Some("a/docs/x.md")));
    assert!(m.is_ignored(Some("b/docs/x.md")));
    assert!(!m.is_ignored(Some("b/src/main.rs")));
  }

  #[test]
  fn negation_wins_regardless_of_order() {
    let m = PathMatcher::compile("!keep/**\nkeep/**").unwrap();
    assert!(!m.is_ignored(Some("b/keep/a/b.txt")));
    let m = PathMatcher::compile("dist/**\n!dist/keep.js\ndist/*.js").unwrap();
    assert!(!m.is_ignored(Some("b/dist/keep.js")));
    assert!(m.is_ignored(Some("b/dist/other.js")));
  }

  #[test]
  fn missing_side_is_always_ignored() {
    let m = PathMatcher::default();
    assert!(m.is_ignored(None));
    assert!(m.is_ignored(Some(NO_FILE)));
    assert!(!m.is_ignored(Some("a/src/lib.rs")));
  }

  #[test]
  fn comments_and_blank_lines_are_skipped() {
    let m = PathMatcher::compile("\r\n# generated\n   \n  package-lock.json  \r\n").unwrap();
    assert!(m.is_ignored(Some("b/package-lock.json")));
    assert!(m.is_ignored(Some("b/web/package-lock.json")));
    assert!(!m.is_ignored(Some("b/# generated")));
  }

  #[test]
  fn star_stays_in_segment_but_globstar_crosses() {
    let m = PathMatcher::compile("src/*.rs").unwrap();
    assert!(m.is_ignored(Some("b/src/lib.rs")));
    assert!(!m.is_ignored(Some("b/src/deep/lib.rs")));
    let m = PathMatcher::compile("src/**/*.rs").unwrap();
    assert!(m.is_ignored(Some("b/src/lib.rs")));
    assert!(m.is_ignored(Some("b/src/deep/lib.rs")));
  }

  #[test]
  fn leading_slash_anchors_at_root() {
    let m = PathMatcher::compile("/Cargo.lock").unwrap();
    assert!(m.is_ignored(Some("b/Cargo.lock")));
    assert!(!m.is_ignored(Some("b/vendor/Cargo.lock")));
  }

  #[test]
  fn extended_syntax_is_supported() {
    let m = PathMatcher::compile("*.{png,svg}\nfixtures/[ab]/**").unwrap();
    assert!(m.is_ignored(Some("b/img/logo.svg")));
    assert!(m.is_ignored(Some("b/fixtures/a/x.json")));
    assert!(!m.is_ignored(Some("b/fixtures/c/x.json")));
  }

  #[test]
  fn bare_bang_is_a_positive_pattern() {
    let m = PathMatcher::compile("!").unwrap();
    assert!(m.is_ignored(Some("b/!")));
  }

  #[test]
  fn invalid_pattern_reports_its_line() {
    let err = PathMatcher::compile("*.md\n\nsrc/[oops").unwrap_err();
    match err {
      EngineError::InvalidPattern { line, pattern, .. } => {
        assert_eq!(line, 3);
        assert_eq!(pattern, "src/[oops");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn carriage_return_separated_rules() {
    let m = PathMatcher::compile("*.md\r!README.md\rdocs/**").unwrap();
    assert!(m.is_ignored(Some("b/docs/x.txt")));
    assert!(m.is_ignored(Some("a/notes.md")));
    assert!(!m.is_ignored(Some("b/README.md")));
    assert!(!m.is_ignored(Some("b/src/lib.rs")));

    let crlf = PathMatcher::compile("*.md\r\n!README.md\r\ndocs/**").unwrap();
    assert!(crlf.is_ignored(Some("b/docs/x.txt")));
    assert!(!crlf.is_ignored(Some("b/README.md")));
  }

  #[test]
  fn invalid_pattern_line_counts_bare_carriage_returns() {
    let err = PathMatcher::compile("*.md\r\r\nsrc/[oops").unwrap_err();
    assert!(matches!(err, EngineError::InvalidPattern { line: 3, .. }));
  }

  #[test]
  fn file_skipped_only_when_both_sides_ignored() {
    let m = PathMatcher::compile("vendor/**").unwrap();
    assert!(m.is_file_ignored(&file(Some("a/vendor/x.c"), Some("b/vendor/x.c"))));
    assert!(!m.is_file_ignored(&file(Some("a/vendor/x.c"), Some("b/src/x.c"))));
    assert!(m.is_file_ignored(&file(None, Some("b/vendor/new.c"))));
    assert!(!m.is_file_ignored(&file(Some("a/src/gone.c"), None)));
  }
}
