//! Action configuration: platform credentials plus the engine settings.

use std::path::PathBuf;

use size_engine::Config;

use crate::error::ActionError;
use crate::github::DEFAULT_API_URL;

#[derive(Debug, Clone)]
pub struct ActionConfig {
  pub token: String,
  pub event_path: PathBuf,
  pub api_url: String,
  pub engine: Config,
}

impl ActionConfig {
  pub fn from_env() -> Result<Self, ActionError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ActionError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let token = required(&lookup, "GITHUB_TOKEN")?;
    let event_path = PathBuf::from(required(&lookup, "GITHUB_EVENT_PATH")?);
    let api_url = lookup("GITHUB_API_URL")
      .map(|url| url.trim().to_string())
      .filter(|url| !url.is_empty())
      .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let engine = Config::from_lookup(&lookup)?;
    Ok(Self {
      token,
      event_path,
      api_url,
      engine,
    })
  }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ActionError>
where
  F: Fn(&str) -> Option<String>,
{
  lookup(key)
    .filter(|value| !value.trim().is_empty())
    .ok_or(ActionError::MissingEnv(key))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key| map.get(key).cloned()
  }

  #[test]
  fn loads_required_and_defaults() {
    let config = ActionConfig::from_lookup(lookup(&[
      ("GITHUB_TOKEN", "t0ken"),
      ("GITHUB_EVENT_PATH", "/tmp/event.json"),
    ]))
    .unwrap();
    assert_eq!(config.token, "t0ken");
    assert_eq!(config.event_path, PathBuf::from("/tmp/event.json"));
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.engine.label_prefix, "size/");
  }

  #[test]
  fn missing_token_is_reported_by_name() {
    let err = ActionConfig::from_lookup(lookup(&[("GITHUB_EVENT_PATH", "/tmp/e.json")])).unwrap_err();
    assert!(matches!(err, ActionError::MissingEnv("GITHUB_TOKEN")));
  }

  #[test]
  fn engine_settings_pass_through() {
    let config = ActionConfig::from_lookup(lookup(&[
      ("GITHUB_TOKEN", "t"),
      ("GITHUB_EVENT_PATH", "/e.json"),
      ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
      ("LABEL_PREFIX", "pr-size:"),
      ("SIZE_M", "40"),
    ]))
    .unwrap();
    assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.engine.label_prefix, "pr-size:");
    assert_eq!(config.engine.thresholds.bucket(45.0), "M");
  }

  #[test]
  fn bad_engine_setting_fails() {
    let err = ActionConfig::from_lookup(lookup(&[
      ("GITHUB_TOKEN", "t"),
      ("GITHUB_EVENT_PATH", "/e.json"),
      ("SIZE_L", "ten"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ActionError::Engine(_)));
  }
}
