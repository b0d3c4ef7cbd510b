//! Assess one diff: `Input` JSON on stdin, `Assessment` JSON on stdout.
//!
//! Configuration comes from the environment (IGNORED, SIZE_*, ...); logs go
//! to stderr so stdout stays machine readable.

use std::io::{self, Write};

use size_engine::{run, Assessment, Config, Input};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  if let Err(e) = assess_stdin() {
    error!(error = %e, "size-engine failed");
    std::process::exit(1);
  }
}

fn assess_stdin() -> Result<Assessment, Box<dyn std::error::Error>> {
  let config = Config::from_env()?;
  let input: Input = serde_json::from_reader(io::stdin().lock())?;
  let assessment = run(&input, config)?;

  let mut stdout = io::stdout().lock();
  serde_json::to_writer(&mut stdout, &assessment)?;
  stdout.flush()?;
  Ok(assessment)
}
