//! PR Size Action: applies size-engine results to a hosting platform.
//!
//! One event per process. Pull request events are scored and relabelled;
//! `!reason` comments are collected into a digest issue.

pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod handler;
pub mod platform;

pub use config::ActionConfig;
pub use error::ActionError;
pub use event::{dispatch, Dispatch, EventPayload};
pub use github::GitHubClient;
pub use handler::{handle_pull_request, handle_reason_comment, process_event, Outcome, DIGEST_TITLE};
pub use platform::{Comment, Issue, LabelPlatform, PlatformError, RepoRef};

use std::fs;

use size_engine::SizeEngine;

/// Load the event named by the config and handle it against GitHub.
pub fn run(config: &ActionConfig) -> Result<Outcome, ActionError> {
  let engine = SizeEngine::new(config.engine.clone())?;
  let raw = fs::read_to_string(&config.event_path).map_err(|source| ActionError::Io {
    path: config.event_path.clone(),
    source,
  })?;
  let payload: EventPayload = serde_json::from_str(&raw)?;
  let client = GitHubClient::new(&config.api_url, &config.token)?;
  process_event(&client, &engine, &payload)
}
