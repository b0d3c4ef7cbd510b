//! Unified diff model and a reader for the platform's diff media type.
//!
//! Only what scoring needs: files, hunks and tagged lines. Hunk bodies are
//! consumed by the counts in their `@@` header, so a removed line such as
//! `--- a comment` is never confused with a file header.

use serde::Serialize;

use crate::error::EngineError;
use crate::matcher::NO_FILE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
  Added,
  Removed,
  Context,
}

/// One hunk line. `text` keeps its leading `+`/`-`/` ` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
  pub kind: LineKind,
  pub text: String,
}

impl DiffLine {
  pub fn added(content: &str) -> Self {
    Self {
      kind: LineKind::Added,
      text: format!("+{content}"),
    }
  }

  pub fn removed(content: &str) -> Self {
    Self {
      kind: LineKind::Removed,
      text: format!("-{content}"),
    }
  }

  pub fn context(content: &str) -> Self {
    Self {
      kind: LineKind::Context,
      text: format!(" {content}"),
    }
  }

  /// Text after the marker.
  pub fn content(&self) -> &str {
    self.text.get(1..).unwrap_or("")
  }

  pub fn is_change(&self) -> bool {
    matches!(self.kind, LineKind::Added | LineKind::Removed)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
  pub old_start: u32,
  pub old_lines: u32,
  pub new_start: u32,
  pub new_lines: u32,
  pub lines: Vec<DiffLine>,
}

/// One file section. A `None` path is the missing side of an add/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
  pub old_path: Option<String>,
  pub new_path: Option<String>,
  pub hunks: Vec<Hunk>,
}

impl FileDiff {
  /// The path a reader would name this file by (new side first).
  pub fn path(&self) -> Option<&str> {
    self.new_path.as_deref().or(self.old_path.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDiff {
  pub files: Vec<FileDiff>,
}

/// Hunk being filled, with the lines its header still promises.
struct OpenHunk {
  hunk: Hunk,
  old_left: u32,
  new_left: u32,
  header_line: usize,
}

/// Header bookkeeping for the file currently being read.
#[derive(Default)]
struct FileHeaders {
  old_seen: bool,
  new_seen: bool,
}

/// Parse unified diff text (as served for `application/vnd.github.v3.diff`).
pub fn parse(text: &str) -> Result<ParsedDiff, EngineError> {
  let mut files: Vec<FileDiff> = Vec::new();
  let mut headers = FileHeaders::default();
  let mut open: Option<OpenHunk> = None;

  for (idx, line) in text.lines().enumerate() {
    let lineno = idx + 1;

    if let Some(state) = open.as_mut() {
      push_hunk_line(state, line, lineno)?;
      if state.old_left == 0 && state.new_left == 0 {
        close_hunk(&mut files, open.take());
      }
      continue;
    }

    if let Some(rest) = line.strip_prefix("diff --git ") {
      let (old_path, new_path) = split_git_header(rest);
      files.push(FileDiff {
        old_path,
        new_path,
        hunks: Vec::new(),
      });
      headers = FileHeaders::default();
    } else if let Some(rest) = line.strip_prefix("--- ") {
      let reuse = !headers.old_seen && files.last().is_some_and(|f| f.hunks.is_empty());
      if !reuse {
        files.push(FileDiff {
          old_path: None,
          new_path: None,
          hunks: Vec::new(),
        });
        headers = FileHeaders::default();
      }
      if let Some(file) = files.last_mut() {
        file.old_path = header_path(rest);
      }
      headers.old_seen = true;
    } else if let Some(rest) = line.strip_prefix("+++ ") {
      let file = match files.last_mut() {
        Some(file) if !headers.new_seen && file.hunks.is_empty() => file,
        _ => return Err(EngineError::diff(lineno, "unexpected +++ header")),
      };
      file.new_path = header_path(rest);
      headers.new_seen = true;
    } else if line.starts_with("@@") {
      if files.is_empty() {
        return Err(EngineError::diff(lineno, "hunk before any file header"));
      }
      let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(line)
        .ok_or_else(|| EngineError::diff(lineno, format!("malformed hunk header {line:?}")))?;
      let state = OpenHunk {
        hunk: Hunk {
          old_start,
          old_lines,
          new_start,
          new_lines,
          lines: Vec::new(),
        },
        old_left: old_lines,
        new_left: new_lines,
        header_line: lineno,
      };
      if old_lines == 0 && new_lines == 0 {
        close_hunk(&mut files, Some(state));
      } else {
        open = Some(state);
      }
    }
    // Anything else is an extended header (index, mode, rename, binary) or
    // preamble and carries nothing to score.
  }

  if let Some(state) = open {
    return Err(EngineError::diff(
      state.header_line,
      format!(
        "hunk is truncated: {} old and {} new lines missing",
        state.old_left, state.new_left
      ),
    ));
  }

  Ok(ParsedDiff { files })
}

fn push_hunk_line(state: &mut OpenHunk, line: &str, lineno: usize) -> Result<(), EngineError> {
  let kind = match line.as_bytes().first() {
    Some(b'\\') => return Ok(()),
    Some(b'+') => LineKind::Added,
    Some(b'-') => LineKind::Removed,
    Some(b' ') | None => LineKind::Context,
    Some(_) => return Err(EngineError::diff(lineno, format!("unexpected line in hunk {line:?}"))),
  };
  let (old, new) = match kind {
    LineKind::Added => (0, 1),
    LineKind::Removed => (1, 0),
    LineKind::Context => (1, 1),
  };
  if old > state.old_left || new > state.new_left {
    return Err(EngineError::diff(
      lineno,
      "hunk has more lines than its header declares",
    ));
  }
  state.old_left -= old;
  state.new_left -= new;
  let text = if line.is_empty() { " ".to_string() } else { line.to_string() };
  state.hunk.lines.push(DiffLine { kind, text });
  Ok(())
}

fn close_hunk(files: &mut [FileDiff], state: Option<OpenHunk>) {
  if let (Some(file), Some(state)) = (files.last_mut(), state) {
    file.hunks.push(state.hunk);
  }
}

/// `a/x b/y` → (`a/x`, `b/y`). Falls back to no paths when ambiguous.
fn split_git_header(rest: &str) -> (Option<String>, Option<String>) {
  let rest = rest.trim();
  match rest.find(" b/") {
    Some(pos) => (
      Some(unquote(&rest[..pos]).to_string()),
      Some(unquote(&rest[pos + 1..]).to_string()),
    ),
    None => (None, None),
  }
}

/// Path from a `---` / `+++` header, without any tab-separated timestamp.
fn header_path(rest: &str) -> Option<String> {
  let path = unquote(rest.split('\t').next().unwrap_or("").trim());
  if path.is_empty() || path == NO_FILE {
    None
  } else {
    Some(path.to_string())
  }
}

fn unquote(s: &str) -> &str {
  s.strip_prefix('"')
    .and_then(|s| s.strip_suffix('"'))
    .unwrap_or(s)
}

/// `@@ -1,5 +1,7 @@ optional context`
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
  let mut parts = line.strip_prefix("@@ ")?.split_whitespace();
  let old = parts.next()?.strip_prefix('-')?;
  let new = parts.next()?.strip_prefix('+')?;
  if parts.next()? != "@@" {
    return None;
  }
  let (old_start, old_lines) = parse_range(old)?;
  let (new_start, new_lines) = parse_range(new)?;
  Some((old_start, old_lines, new_start, new_lines))
}

/// `5,3` → (5, 3); a bare `5` means one line.
fn parse_range(range: &str) -> Option<(u32, u32)> {
  match range.split_once(',') {
    Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
    None => Some((range.parse().ok()?, 1)),
  }
}
