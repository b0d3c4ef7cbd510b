use std::path::PathBuf;

use size_engine::EngineError;
use thiserror::Error;

use crate::platform::PlatformError;

#[derive(Debug, Error)]
pub enum ActionError {
  #[error("environment variable {0} is not set")]
  MissingEnv(&'static str),

  #[error("failed to read event payload {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed event: {0}")]
  Event(String),

  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error("invalid event JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl ActionError {
  pub fn event(reason: impl Into<String>) -> Self {
    Self::Event(reason.into())
  }
}
