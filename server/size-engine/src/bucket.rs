//! Size ladder: score → size name, plus the label color table.

use crate::error::EngineError;

/// Color used for a size with no entry in the table.
pub const FALLBACK_COLOR: &str = "EDEDED";

/// Ordered `(minimum score, size name)` steps.
///
/// Always starts at 0 and strictly increases, so every non-negative score
/// lands on exactly one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeThresholds {
  steps: Vec<(u32, String)>,
}

impl Default for SizeThresholds {
  fn default() -> Self {
    Self {
      steps: [(0, "XS"), (10, "S"), (30, "M"), (100, "L"), (500, "XL"), (1000, "XXL")]
        .into_iter()
        .map(|(min, name)| (min, name.to_string()))
        .collect(),
    }
  }
}

impl SizeThresholds {
  pub fn new(steps: Vec<(u32, String)>) -> Result<Self, EngineError> {
    match steps.first() {
      None => return Err(EngineError::thresholds("at least one size is required")),
      Some((min, name)) if *min != 0 => {
        return Err(EngineError::thresholds(format!(
          "smallest size {name} must start at 0, not {min}"
        )));
      }
      Some(_) => {}
    }
    for pair in steps.windows(2) {
      let ((lo, lo_name), (hi, hi_name)) = (&pair[0], &pair[1]);
      if hi <= lo {
        return Err(EngineError::thresholds(format!(
          "{hi_name} ({hi}) must be greater than {lo_name} ({lo})"
        )));
      }
    }
    if let Some((_, name)) = steps.iter().find(|(_, name)| name.trim().is_empty()) {
      return Err(EngineError::thresholds(format!("size name {name:?} is empty")));
    }
    Ok(Self { steps })
  }

  pub fn steps(&self) -> &[(u32, String)] {
    &self.steps
  }

  /// Index of the greatest step whose minimum is ≤ score.
  pub fn ordinal(&self, score: f64) -> usize {
    self
      .steps
      .iter()
      .rposition(|(min, _)| score >= f64::from(*min))
      .unwrap_or(0)
  }

  /// Size name for a score, e.g. `"M"`.
  pub fn bucket(&self, score: f64) -> &str {
    &self.steps[self.ordinal(score)].1
  }
}

/// Label color (hex, no `#`) for a size name.
pub fn label_color(size: &str) -> &'static str {
  match size {
    "XS" => "3CBF00",
    "S" => "5D9801",
    "M" => "7F7203",
    "L" => "A14C05",
    "XL" => "C32607",
    "XXL" => "E50009",
    _ => FALLBACK_COLOR,
  }
}
