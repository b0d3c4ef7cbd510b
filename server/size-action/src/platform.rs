//! Hosting-platform seam: the label, comment and issue calls the action makes.

use std::fmt;

use serde::Deserialize;
use size_engine::Label;
use thiserror::Error;

/// Owner/name pair addressing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
  pub owner: String,
  pub name: String,
}

impl RepoRef {
  pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      owner: owner.into(),
      name: name.into(),
    }
  }
}

impl fmt::Display for RepoRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.owner, self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
  pub number: u64,
  pub title: String,
  #[serde(default)]
  pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
  #[serde(default)]
  pub id: u64,
  pub html_url: String,
}

/// "Not found" is kept apart so callers never mistake an auth or network
/// failure for a missing resource.
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("not found: {resource}")]
  NotFound { resource: String },

  #[error("{url} returned HTTP {status}: {body}")]
  Status { url: String, status: u16, body: String },

  #[error("request to {url} failed")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("could not decode response from {url}")]
  Decode {
    url: String,
    #[source]
    source: reqwest::Error,
  },
}

impl PlatformError {
  pub fn not_found(resource: impl Into<String>) -> Self {
    Self::NotFound {
      resource: resource.into(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}

/// Calls against the hosting platform. Implemented over HTTP by
/// [`crate::github::GitHubClient`] and by in-memory fakes in tests.
pub trait LabelPlatform {
  /// Unified diff of a pull request.
  fn pull_request_diff(&self, repo: &RepoRef, number: u64) -> Result<String, PlatformError>;

  fn get_label(&self, repo: &RepoRef, name: &str) -> Result<Label, PlatformError>;

  fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<Label, PlatformError>;

  fn add_labels(&self, repo: &RepoRef, number: u64, labels: &[String]) -> Result<(), PlatformError>;

  fn remove_label(&self, repo: &RepoRef, number: u64, name: &str) -> Result<(), PlatformError>;

  fn create_comment(&self, repo: &RepoRef, number: u64, body: &str)
    -> Result<Comment, PlatformError>;

  /// Open issue whose title is exactly `title`, if any.
  fn find_open_issue(&self, repo: &RepoRef, title: &str) -> Result<Option<Issue>, PlatformError>;

  fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue, PlatformError>;
}

/// Fetch the label, creating it only when the platform says it is missing.
pub fn ensure_label<P>(
  platform: &P,
  repo: &RepoRef,
  name: &str,
  color: &str,
) -> Result<Label, PlatformError>
where
  P: LabelPlatform + ?Sized,
{
  match platform.get_label(repo, name) {
    Err(err) if err.is_not_found() => platform.create_label(repo, name, color),
    other => other,
  }
}
