//! Webhook payload shapes and the decision of what to do with one event.

use serde::Deserialize;
use size_engine::Label;

use crate::error::ActionError;
use crate::platform::RepoRef;

pub const HANDLED_ACTIONS: &[&str] = &["opened", "synchronize", "reopened", "created"];

/// Comments containing this marker carry a reason for a large change.
pub const REASON_MARKER: &str = "!reason";

/// The subset of the event payload the action reads.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
  #[serde(default)]
  pub action: String,
  #[serde(default)]
  pub pull_request: Option<PullRequest>,
  #[serde(default)]
  pub comment: Option<IssueComment>,
  #[serde(default)]
  pub issue: Option<IssueInfo>,
  #[serde(default)]
  pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
  pub name: String,
  pub owner: User,
}

impl Repository {
  pub fn to_ref(&self) -> RepoRef {
    RepoRef::new(&self.owner.login, &self.name)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseRef {
  pub repo: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  #[serde(default)]
  pub labels: Vec<Label>,
  pub user: User,
  pub base: BaseRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
  #[serde(default)]
  pub body: String,
  pub html_url: String,
}

/// The pull request a comment was left on, as seen through the issues API.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueInfo {
  pub number: u64,
  pub html_url: String,
  #[serde(default)]
  pub labels: Vec<Label>,
  pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestJob {
  pub repo: RepoRef,
  pub number: u64,
  pub author: String,
  pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonJob {
  pub repo: RepoRef,
  pub number: u64,
  pub pr_url: String,
  pub pr_author: String,
  pub pr_labels: Vec<String>,
  pub comment_url: String,
  pub comment_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
  Ignore(String),
  PullRequest(PullRequestJob),
  ReasonComment(ReasonJob),
}

fn label_names(labels: &[Label]) -> Vec<String> {
  labels.iter().map(|l| l.name.clone()).collect()
}

/// Decide how to handle an event. Unhandled actions and comments without
/// the reason marker are ignored; a reason comment missing the fields it
/// needs is an error.
pub fn dispatch(payload: &EventPayload) -> Result<Dispatch, ActionError> {
  if !HANDLED_ACTIONS.contains(&payload.action.as_str()) {
    return Ok(Dispatch::Ignore(format!("unhandled action {:?}", payload.action)));
  }

  if let Some(pr) = &payload.pull_request {
    return Ok(Dispatch::PullRequest(PullRequestJob {
      repo: pr.base.repo.to_ref(),
      number: pr.number,
      author: pr.user.login.clone(),
      labels: label_names(&pr.labels),
    }));
  }

  let Some(comment) = &payload.comment else {
    return Ok(Dispatch::Ignore("event has no pull request or comment".into()));
  };
  if payload.action != "created" || !comment.body.contains(REASON_MARKER) {
    return Ok(Dispatch::Ignore("comment carries no reason".into()));
  }

  let issue = payload
    .issue
    .as_ref()
    .ok_or_else(|| ActionError::event("reason comment without issue"))?;
  let repository = payload
    .repository
    .as_ref()
    .ok_or_else(|| ActionError::event("reason comment without repository"))?;

  Ok(Dispatch::ReasonComment(ReasonJob {
    repo: repository.to_ref(),
    number: issue.number,
    pr_url: issue.html_url.clone(),
    pr_author: issue.user.login.clone(),
    pr_labels: label_names(&issue.labels),
    comment_url: comment.html_url.clone(),
    comment_body: comment.body.clone(),
  }))
}
