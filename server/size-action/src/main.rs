//! Action entrypoint. Settings come from the environment; logs go to stderr.

use std::io;

use size_action::{run, ActionConfig, Outcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let outcome = ActionConfig::from_env().and_then(|config| run(&config));
  match outcome {
    Ok(Outcome::Labelled(assessment)) => {
      info!(label = %assessment.label, score = assessment.score, "success")
    }
    Ok(Outcome::ReasonRecorded { comment_url, .. }) => info!(%comment_url, "success"),
    Ok(Outcome::Ignored(_)) => {}
    Err(e) => {
      error!(error = %e, "size-action failed");
      std::process::exit(1);
    }
  }
}
