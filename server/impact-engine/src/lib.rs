//! PR Impact Engine — rule-based scoring and pattern detection; no AI, no DB, no network.
//! Used by the binary for stdin/stdout; can also be called as a library.
//!
//! Three pure entry points: [`classify_file`], [`score_impact`] and
//! [`detect_patterns`]. [`analyze`] combines them into one report.

pub mod change_type;
pub mod classify;
pub mod config;
pub mod error;
pub mod patterns;
pub mod report;
pub mod score;
pub mod types;

pub use classify::classify_file;
pub use config::ScoringConfig;
pub use error::EngineError;
pub use patterns::detect_patterns;
pub use score::{score_impact, score_impact_with};
pub use types::*;

/// Run the engine on parsed input with the default configuration (no I/O).
pub fn analyze(request: &AnalysisRequest) -> AnalysisReport {
  analyze_with(&ScoringConfig::default(), request)
}

/// Run the engine on parsed input (no I/O).
pub fn analyze_with(config: &ScoringConfig, request: &AnalysisRequest) -> AnalysisReport {
  let metadata = request.metadata();
  let files = &request.files;

  let impact = score_impact_with(config, &request.pr, files, &metadata);
  let patterns = detect_patterns(files);
  let file_categories = report::file_categories(files);
  let checklist = report::checklist(&impact, &patterns, &file_categories, files.len());

  tracing::info!(
    score = impact.score,
    level = impact.level.as_str(),
    patterns = patterns.summary.total,
    "analysis complete"
  );

  AnalysisReport {
    report_id: report::report_id(&request.pr, files),
    summary: report::summary(&request.pr, &metadata),
    impact_description: impact.describe(),
    critical_files: report::critical_files(files),
    key_changes: report::key_changes(files, &metadata),
    security_concerns: report::pattern_lines(&patterns.security),
    quality_patterns: report::pattern_lines(&patterns.quality),
    impact,
    patterns,
    file_categories,
    checklist,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn analyze_returns_valid_output_shape() {
    let request = AnalysisRequest {
      pr: PullRequestInfo::new("feat: add auth", ""),
      files: vec![
        ChangedFile::new("src/auth/jwt.go", 50, 10).with_patch("+token := sign(claims)"),
        ChangedFile::new("package-lock.json", 0, 0),
      ],
      metadata: None,
    };
    let out = analyze(&request);
    assert!(out.report_id.starts_with("pr-"));
    assert_eq!(out.impact.breakdown.change_type, 60);
    assert!(out.impact.confidence >= 0.5 && out.impact.confidence <= 1.0);
    assert!(out.patterns.security.iter().any(|p| p.kind == PatternKind::Credentials));
    assert_eq!(out.critical_files, vec!["src/auth/jwt.go"]);
    assert_eq!(
      out.file_categories[&Category::Dependencies],
      vec!["package-lock.json"]
    );
    assert!(out.impact_description.contains("IMPACT (Score:"));
  }

  #[test]
  fn explicit_metadata_wins_over_derived() {
    let request = AnalysisRequest {
      pr: PullRequestInfo::default(),
      files: vec![ChangedFile::new("app/services/x.js", 1, 0)],
      metadata: Some(ChangeMetadata::new(1500, 0, 1)),
    };
    assert_eq!(analyze(&request).impact.breakdown.volume, 95);
  }
}
