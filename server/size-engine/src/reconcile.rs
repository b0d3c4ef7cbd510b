//! Minimal label add/remove set against the labels already attached.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelChanges {
  pub add: Vec<String>,
  pub remove: Vec<String>,
}

impl LabelChanges {
  /// Nothing to do: callers skip every mutation, comments included.
  pub fn is_noop(&self) -> bool {
    self.add.is_empty() && self.remove.is_empty()
  }
}

/// Every prefixed label other than `target` goes; `target` is added unless
/// already present.
pub fn reconcile<'a, I>(target: &str, prefix: &str, current: I) -> LabelChanges
where
  I: IntoIterator<Item = &'a str>,
{
  let mut present = false;
  let mut remove: Vec<String> = Vec::new();
  for name in current {
    if name == target {
      present = true;
    } else if name.starts_with(prefix) && !remove.iter().any(|r| r == name) {
      remove.push(name.to_string());
    }
  }
  LabelChanges {
    add: if present { Vec::new() } else { vec![target.to_string()] },
    remove,
  }
}
