//! Binary entrypoint: read one JSON request from stdin, write one JSON object to stdout.
//!
//! Logs go to stderr (`RUST_LOG=impact_engine=debug` for sub-score traces) so
//! stdout stays parseable. On failure stdout carries an ErrorOutput and the
//! process exits with status 1.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use impact_engine::{
  analyze_with, classify_file, detect_patterns, score_impact_with, AnalysisReport, AnalysisRequest,
  ClassifiedFile, EngineError, ErrorOutput, ScoringConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
  /// Impact, patterns, file categories and checklist.
  Analyze,
  /// Impact assessment only.
  Score,
  /// Detected patterns only.
  Patterns,
  /// Category of each file.
  Classify,
}

#[derive(Debug, Parser)]
#[command(name = "impact-engine", version, about = "Score the impact of a pull request (stdin JSON → stdout JSON)")]
struct Cli {
  #[arg(long, value_enum, default_value_t = Mode::Analyze)]
  mode: Mode,

  /// TOML file overriding scoring weights and thresholds.
  #[arg(long, env = "IMPACT_ENGINE_CONFIG")]
  config: Option<PathBuf>,

  /// Pretty-print the JSON output.
  #[arg(long)]
  pretty: bool,
}

/// `--mode analyze` output: the report plus when and how much was analyzed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput {
  analyzed_at: String,
  files_analyzed: usize,
  #[serde(flatten)]
  report: AnalysisReport,
}

fn main() {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env())
    .init();

  let cli = Cli::parse();
  if let Err(e) = run_binary(&cli) {
    tracing::error!("impact-engine error: {:#}", e);
    let mut err = ErrorOutput::new(format!("{:#}", e));
    if let Some(field) = e.downcast_ref::<EngineError>().and_then(|ee| ee.field()) {
      err = err.with_field(field);
    }
    let mut out = io::stdout().lock();
    let _ = serde_json::to_writer(&mut out, &err);
    let _ = writeln!(out);
    std::process::exit(1);
  }
}

fn run_binary(cli: &Cli) -> Result<()> {
  let config = match &cli.config {
    Some(path) => ScoringConfig::load(path)?,
    None => ScoringConfig::default(),
  };

  let mut raw = String::new();
  io::stdin()
    .lock()
    .read_to_string(&mut raw)
    .map_err(EngineError::from)
    .context("reading stdin")?;
  let request: AnalysisRequest = serde_json::from_str(&raw)
    .map_err(EngineError::from)
    .context("parsing request")?;
  tracing::debug!(files = request.files.len(), mode = ?cli.mode, "request parsed");

  let value = match cli.mode {
    Mode::Analyze => serde_json::to_value(AnalyzeOutput {
      analyzed_at: Utc::now().to_rfc3339(),
      files_analyzed: request.files.len(),
      report: analyze_with(&config, &request),
    })?,
    Mode::Score => serde_json::to_value(score_impact_with(
      &config,
      &request.pr,
      &request.files,
      &request.metadata(),
    ))?,
    Mode::Patterns => serde_json::to_value(detect_patterns(&request.files))?,
    Mode::Classify => {
      let rows: Vec<ClassifiedFile> = request
        .files
        .iter()
        .map(|f| ClassifiedFile {
          filename: f.filename.clone(),
          category: classify_file(&f.filename),
        })
        .collect();
      serde_json::to_value(rows)?
    }
  };

  let mut out = io::stdout().lock();
  if cli.pretty {
    serde_json::to_writer_pretty(&mut out, &value)?;
  } else {
    serde_json::to_writer(&mut out, &value)?;
  }
  writeln!(out)?;
  out.flush()?;
  Ok(())
}
