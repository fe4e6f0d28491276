//! Impact score: five sub-scores, weighted sum, level, confidence and explanation.

use tracing::debug;

use crate::change_type;
use crate::classify::classify_file;
use crate::config::ScoringConfig;
use crate::types::*;

/// Score a change set with the default configuration.
pub fn score_impact(
  pr: &PullRequestInfo,
  files: &[ChangedFile],
  metadata: &ChangeMetadata,
) -> ImpactAssessment {
  score_impact_with(&ScoringConfig::default(), pr, files, metadata)
}

/// Score a change set. Total: an empty file list yields degenerate sub-scores.
pub fn score_impact_with(
  config: &ScoringConfig,
  pr: &PullRequestInfo,
  files: &[ChangedFile],
  metadata: &ChangeMetadata,
) -> ImpactAssessment {
  let volume = volume_score(metadata);
  let breakdown = ScoreBreakdown {
    volume,
    criticality: criticality_score(files, config),
    complexity: complexity_score(files, metadata),
    blast_radius: blast_radius_score(files, metadata, config),
    change_type: change_type::synergistic_change_type(pr, files, volume),
  };
  debug!(?breakdown, files = files.len(), "sub-scores computed");

  let w = &config.weights;
  let mut weighted = breakdown.volume as f64 * w.volume
    + breakdown.criticality as f64 * w.criticality
    + breakdown.complexity as f64 * w.complexity
    + breakdown.blast_radius as f64 * w.blast_radius
    + breakdown.change_type as f64 * w.change_type;

  // Small change to a critical file is riskier than its size suggests.
  if breakdown.volume < config.small_volume_below && breakdown.criticality > config.critical_above {
    weighted += config.small_but_dangerous_bonus;
  }

  if change_type::all_test_files(files) && breakdown.change_type == change_type::TESTS_ONLY {
    weighted = weighted.min(config.tests_only_cap);
  }

  let score = weighted.max(0.0).round() as u32;

  ImpactAssessment {
    score,
    level: impact_level(score, config),
    confidence: confidence(&breakdown, config),
    breakdown,
    explanation: explanation(&breakdown),
  }
}

/// Step function of total lines changed.
pub fn volume_score(metadata: &ChangeMetadata) -> u32 {
  match metadata.total_lines() {
    0 => 0,
    1..=19 => 10,
    20..=49 => 25,
    50..=99 => 40,
    100..=199 => 55,
    200..=499 => 70,
    500..=999 => 85,
    _ => 95,
  }
}

/// Line-weighted mean category multiplier, scaled so 2.0 maps to 100.
pub fn criticality_score(files: &[ChangedFile], config: &ScoringConfig) -> u32 {
  if files.is_empty() {
    return 0;
  }

  let mut weighted_sum = 0.0;
  let mut total_lines = 0.0;
  for file in files {
    let lines = file.lines_changed() as f64;
    weighted_sum += lines * classify_file(&file.filename).multiplier;
    total_lines += lines;
  }
  // No lines changed anywhere: treat as a neutral multiplier.
  let mean = if total_lines > 0.0 {
    weighted_sum / total_lines
  } else {
    1.0
  };

  let score = ((mean * 50.0).round() as u32).min(100);
  if all_low_priority(files) {
    score.min(config.low_priority_criticality_cap)
  } else {
    score
  }
}

/// File count, add/delete skew and extension diversity.
pub fn complexity_score(files: &[ChangedFile], metadata: &ChangeMetadata) -> u32 {
  let mut points = 0;

  points += match metadata.changed_files {
    n if n > 10 => 30,
    n if n > 5 => 20,
    n if n > 2 => 10,
    _ => 0,
  };

  let ratio = metadata.additions as f64 / (metadata.deletions as f64 + 1.0);
  if ratio > 3.0 || ratio < 0.33 {
    points += 20;
  }

  let mut extensions: Vec<&str> = files.iter().map(|f| file_extension(&f.filename)).collect();
  extensions.sort_unstable();
  extensions.dedup();
  points += match extensions.len() {
    n if n > 5 => 20,
    n if n > 3 => 10,
    _ => 0,
  };

  points.min(100)
}

/// Step function of file count, halved when every file is low priority.
pub fn blast_radius_score(
  files: &[ChangedFile],
  metadata: &ChangeMetadata,
  config: &ScoringConfig,
) -> u32 {
  let raw = match metadata.changed_files {
    0 => 0,
    1 => 15,
    2..=3 => 30,
    4..=5 => 45,
    6..=10 => 60,
    11..=20 => 75,
    21..=50 => 90,
    _ => 100,
  };

  if all_low_priority(files) {
    (raw as f64 * config.low_priority_blast_damping).round() as u32
  } else {
    raw
  }
}

/// Map a rounded score onto a tier.
pub fn impact_level(score: u32, config: &ScoringConfig) -> ImpactLevel {
  if score >= config.levels.high {
    ImpactLevel::High
  } else if score >= config.levels.medium {
    ImpactLevel::Medium
  } else {
    ImpactLevel::Low
  }
}

/// Base confidence, reduced when the sub-scores disagree strongly.
pub fn confidence(breakdown: &ScoreBreakdown, config: &ScoringConfig) -> f64 {
  let c = &config.confidence;
  let values = breakdown.values();
  let n = values.len() as f64;
  let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
  let variance = values
    .iter()
    .map(|&v| (v as f64 - mean).powi(2))
    .sum::<f64>()
    / n;

  let mut confidence = c.base;
  if variance > c.high_variance {
    confidence -= c.high_variance_penalty;
  } else if variance > c.moderate_variance {
    confidence -= c.moderate_variance_penalty;
  }
  confidence.clamp(0.5, 1.0)
}

pub fn explanation(breakdown: &ScoreBreakdown) -> String {
  let mut parts: Vec<String> = Vec::new();
  if breakdown.volume > 70 {
    parts.push(format!("Large volume of changes ({} points)", breakdown.volume));
  }
  if breakdown.criticality > 60 {
    parts.push("Modifies critical/security-sensitive files".into());
  }
  if breakdown.complexity > 60 {
    parts.push("High complexity or file diversity".into());
  }
  if breakdown.blast_radius > 60 {
    parts.push("Affects multiple parts of codebase".into());
  }
  if breakdown.change_type > 70 {
    parts.push("High-risk change type (refactor/breaking)".into());
  }
  if parts.is_empty() {
    parts.push("Straightforward changes with limited scope".into());
  }
  parts.join(". ")
}

/// Every file is docs/tests/tooling/styling. Vacuously true for no files.
fn all_low_priority(files: &[ChangedFile]) -> bool {
  files
    .iter()
    .all(|f| classify_file(&f.filename).category.is_low_priority())
}

/// Text after the last '.', or "" when there is none.
fn file_extension(filename: &str) -> &str {
  match filename.rsplit_once('.') {
    Some((_, ext)) => ext,
    None => "",
  }
}
