//! Event handlers: label a pull request, or file a reason in the digest.

use size_engine::{Assessment, Config, SizeEngine};
use tracing::{info, warn};

use crate::error::ActionError;
use crate::event::{dispatch, Dispatch, EventPayload, PullRequestJob, ReasonJob, REASON_MARKER};
use crate::platform::{ensure_label, LabelPlatform, RepoRef};

pub const DIGEST_TITLE: &str = "[ PR Size Helper ]: Digest";
const DEFAULT_WEB_URL: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Ignored(String),
  Labelled(Assessment),
  ReasonRecorded { digest_issue: u64, comment_url: String },
}

/// Dispatch one event payload to its handler.
pub fn process_event<P>(
  platform: &P,
  engine: &SizeEngine,
  payload: &EventPayload,
) -> Result<Outcome, ActionError>
where
  P: LabelPlatform + ?Sized,
{
  match dispatch(payload)? {
    Dispatch::Ignore(reason) => {
      info!(action = %payload.action, %reason, "nothing to do");
      Ok(Outcome::Ignored(reason))
    }
    Dispatch::PullRequest(job) => handle_pull_request(platform, engine, &job).map(Outcome::Labelled),
    Dispatch::ReasonComment(job) => handle_reason_comment(platform, engine.config(), &job),
  }
}

/// Assess the pull request and bring its size label in line.
///
/// Nothing is written when the right label is already the only size label.
/// Stale labels are removed after the new one is added; one that vanished in
/// the meantime is only warned about.
pub fn handle_pull_request<P>(
  platform: &P,
  engine: &SizeEngine,
  job: &PullRequestJob,
) -> Result<Assessment, ActionError>
where
  P: LabelPlatform + ?Sized,
{
  let diff = platform.pull_request_diff(&job.repo, job.number)?;
  let assessment = engine.assess(&diff, job.labels.iter().map(String::as_str))?;

  if assessment.changes.is_noop() {
    info!(label = %assessment.label, number = job.number, "correct label already assigned");
    return Ok(assessment);
  }

  if !assessment.changes.add.is_empty() {
    ensure_label(platform, &job.repo, &assessment.label, &assessment.color)?;
    platform.add_labels(&job.repo, job.number, &assessment.changes.add)?;
    info!(label = %assessment.label, number = job.number, "added label");

    if assessment.prompt_for_reason {
      platform.create_comment(&job.repo, job.number, &large_change_comment(&job.author))?;
      info!(number = job.number, score = assessment.score, "asked for a reason");
    }
  }

  for stale in &assessment.changes.remove {
    match platform.remove_label(&job.repo, job.number, stale) {
      Ok(()) => info!(label = %stale, number = job.number, "removed label"),
      Err(err) if err.is_not_found() => {
        warn!(label = %stale, number = job.number, error = %err, "label already gone")
      }
      Err(err) => return Err(err.into()),
    }
  }

  Ok(assessment)
}

/// Append the reason to the digest issue (opening it on first use) and
/// point the author at the entry.
pub fn handle_reason_comment<P>(
  platform: &P,
  config: &Config,
  job: &ReasonJob,
) -> Result<Outcome, ActionError>
where
  P: LabelPlatform + ?Sized,
{
  let digest = match platform.find_open_issue(&job.repo, DIGEST_TITLE)? {
    Some(issue) => issue,
    None => {
      let web_url = web_url_for(&job.repo, &job.pr_url);
      let body = digest_welcome_body(config, &job.repo, &web_url);
      let issue = platform.create_issue(&job.repo, DIGEST_TITLE, &body)?;
      info!(number = issue.number, "opened digest issue");
      issue
    }
  };

  let entry = platform.create_comment(&job.repo, digest.number, &reason_entry(config, job))?;
  platform.create_comment(
    &job.repo,
    job.number,
    &format!("Thanks! I've added that reason here: {} 📝", entry.html_url),
  )?;
  info!(digest = digest.number, number = job.number, "recorded reason");

  Ok(Outcome::ReasonRecorded {
    digest_issue: digest.number,
    comment_url: entry.html_url,
  })
}

pub fn large_change_comment(author: &str) -> String {
  format!(
    "👋 @{author} this pull request is a bit large 😮\n\n\
     If you have time, please leave a comment prefixed with `{REASON_MARKER}` explaining why, thanks!"
  )
}

/// One digest entry: the pull request, its size label, and the reason text.
pub fn reason_entry(config: &Config, job: &ReasonJob) -> String {
  let size_label = job
    .pr_labels
    .iter()
    .find(|name| name.starts_with(&config.label_prefix))
    .map(String::as_str)
    .unwrap_or("unlabelled");
  let reason = job.comment_body.replacen(REASON_MARKER, "", 1);
  format!(
    "## {}\n\n`{}` created by @{}\n\n## [Reason]({})\n>  {}",
    job.pr_url,
    size_label,
    job.pr_author,
    job.comment_url,
    reason.trim()
  )
}

/// Body of a freshly opened digest issue, with open/closed search links per
/// size label, largest first.
pub fn digest_welcome_body(config: &Config, repo: &RepoRef, web_url: &str) -> String {
  let links = |state: &str| {
    config
      .thresholds
      .steps()
      .iter()
      .rev()
      .map(|(_, size)| {
        let label = config.label_for(size);
        let query = format!("is:pr is:{state} label:{label}");
        format!(
          "[`{label}`]({web_url}/{repo}/pulls?q={})",
          urlencoding::encode(&query)
        )
      })
      .collect::<Vec<_>>()
      .join(" ")
  };

  format!(
    "Welcome to your PR Size Helper Digest!\n\n\
     This issue collects and indexes all of the `{REASON_MARKER}` prefixed comments left in pull requests.\n\n\
     Here are some helpful links:\n\n\
     All **open** PRs labelled {}\n\
     All **closed** PRs labelled {}\n\n\
     _Note: The title of this issue is important. If you decide to change it, the PR Size Helper \
     action will create a new \"{DIGEST_TITLE}\" issue the next time someone creates a \
     `{REASON_MARKER}` prefixed PR comment._",
    links("open"),
    links("closed"),
  )
}

/// Web root the pull request lives under, so enterprise hosts link correctly.
fn web_url_for(repo: &RepoRef, pr_url: &str) -> String {
  let needle = format!("/{repo}/");
  match pr_url.find(&needle) {
    Some(idx) if idx > 0 => pr_url[..idx].to_string(),
    _ => DEFAULT_WEB_URL.to_string(),
  }
}
