//! GitHub REST implementation of [`LabelPlatform`] using blocking reqwest.
//!
//! Needs a live API to exercise, so it is only covered through the trait in
//! tests.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use size_engine::Label;
use tracing::debug;

use crate::platform::{Comment, Issue, LabelPlatform, PlatformError, RepoRef};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_VALUE: &str = "pr-size-helper-action";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

pub struct GitHubClient {
  http: Client,
  api_url: String,
}

#[derive(Deserialize)]
struct SearchResults {
  #[serde(default)]
  items: Vec<Issue>,
}

impl GitHubClient {
  pub fn new(api_url: &str, token: &str) -> Result<Self, PlatformError> {
    let api_url = api_url.trim_end_matches('/').to_string();
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    if let Ok(mut auth) = HeaderValue::from_str(&format!("Bearer {token}")) {
      auth.set_sensitive(true);
      headers.insert(AUTHORIZATION, auth);
    }
    let http = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()
      .map_err(|source| PlatformError::Transport {
        url: api_url.clone(),
        source,
      })?;
    Ok(Self { http, api_url })
  }

  fn repo_url(&self, repo: &RepoRef, tail: &str) -> String {
    format!(
      "{}/repos/{}/{}/{}",
      self.api_url,
      urlencoding::encode(&repo.owner),
      urlencoding::encode(&repo.name),
      tail
    )
  }

  /// Send and map 404 to `NotFound`, any other non-2xx to `Status`.
  fn send(&self, request: RequestBuilder, url: &str, resource: &str) -> Result<Response, PlatformError> {
    debug!(url, "github request");
    let response = request.send().map_err(|source| PlatformError::Transport {
      url: url.to_string(),
      source,
    })?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(PlatformError::not_found(resource));
    }
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(PlatformError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
      });
    }
    Ok(response)
  }

  fn json<T: DeserializeOwned>(&self, response: Response, url: &str) -> Result<T, PlatformError> {
    response.json().map_err(|source| PlatformError::Decode {
      url: url.to_string(),
      source,
    })
  }
}

impl LabelPlatform for GitHubClient {
  fn pull_request_diff(&self, repo: &RepoRef, number: u64) -> Result<String, PlatformError> {
    let url = self.repo_url(repo, &format!("pulls/{number}"));
    let request = self.http.get(&url).header(ACCEPT, DIFF_MEDIA_TYPE);
    let response = self.send(request, &url, &format!("pull request {repo}#{number}"))?;
    response.text().map_err(|source| PlatformError::Decode { url, source })
  }

  fn get_label(&self, repo: &RepoRef, name: &str) -> Result<Label, PlatformError> {
    let url = self.repo_url(repo, &format!("labels/{}", urlencoding::encode(name)));
    let response = self.send(self.http.get(&url), &url, &format!("label {name}"))?;
    self.json(response, &url)
  }

  fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<Label, PlatformError> {
    let url = self.repo_url(repo, "labels");
    let request = self.http.post(&url).json(&json!({ "name": name, "color": color }));
    let response = self.send(request, &url, &format!("repository {repo}"))?;
    self.json(response, &url)
  }

  fn add_labels(&self, repo: &RepoRef, number: u64, labels: &[String]) -> Result<(), PlatformError> {
    let url = self.repo_url(repo, &format!("issues/{number}/labels"));
    let request = self.http.post(&url).json(&json!({ "labels": labels }));
    self.send(request, &url, &format!("issue {repo}#{number}"))?;
    Ok(())
  }

  fn remove_label(&self, repo: &RepoRef, number: u64, name: &str) -> Result<(), PlatformError> {
    let url = self.repo_url(
      repo,
      &format!("issues/{number}/labels/{}", urlencoding::encode(name)),
    );
    self.send(self.http.delete(&url), &url, &format!("label {name} on #{number}"))?;
    Ok(())
  }

  fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<Comment, PlatformError> {
    let url = self.repo_url(repo, &format!("issues/{number}/comments"));
    let request = self.http.post(&url).json(&json!({ "body": body }));
    let response = self.send(request, &url, &format!("issue {repo}#{number}"))?;
    self.json(response, &url)
  }

  fn find_open_issue(&self, repo: &RepoRef, title: &str) -> Result<Option<Issue>, PlatformError> {
    let query = format!("is:open is:issue repo:{repo} in:title \"{title}\"");
    let url = format!("{}/search/issues?q={}", self.api_url, urlencoding::encode(&query));
    let response = self.send(self.http.get(&url), &url, "issue search")?;
    let results: SearchResults = self.json(response, &url)?;
    Ok(results.items.into_iter().find(|issue| issue.title == title))
  }

  fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue, PlatformError> {
    let url = self.repo_url(repo, "issues");
    let request = self.http.post(&url).json(&json!({ "title": title, "body": body }));
    let response = self.send(request, &url, &format!("repository {repo}"))?;
    self.json(response, &url)
  }
}
