//! Scoring configuration with defaults matching the published scoring model.
//!
//! Passed explicitly into the scorer; nothing reads process-wide state. A TOML
//! file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Factor weights for the final weighted sum. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
  pub volume: f64,
  pub criticality: f64,
  pub complexity: f64,
  pub blast_radius: f64,
  pub change_type: f64,
}

impl Default for Weights {
  fn default() -> Self {
    Self {
      volume: 0.25,
      criticality: 0.30,
      complexity: 0.20,
      blast_radius: 0.10,
      change_type: 0.15,
    }
  }
}

impl Weights {
  fn values(&self) -> [f64; 5] {
    [
      self.volume,
      self.criticality,
      self.complexity,
      self.blast_radius,
      self.change_type,
    ]
  }
}

/// Confidence starts at `base` and drops when the sub-scores disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
  pub base: f64,
  pub high_variance: f64,
  pub high_variance_penalty: f64,
  pub moderate_variance: f64,
  pub moderate_variance_penalty: f64,
}

impl Default for ConfidenceConfig {
  fn default() -> Self {
    Self {
      base: 0.7,
      high_variance: 1000.0,
      high_variance_penalty: 0.2,
      moderate_variance: 500.0,
      moderate_variance_penalty: 0.1,
    }
  }
}

/// Score cut-offs for the risk tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
  pub high: u32,
  pub medium: u32,
}

impl Default for LevelThresholds {
  fn default() -> Self {
    Self { high: 60, medium: 30 }
  }
}

/// Tunable constants for impact scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
  pub weights: Weights,
  /// Added when volume is below `small_volume_below` and criticality above `critical_above`.
  pub small_but_dangerous_bonus: f64,
  pub small_volume_below: u32,
  pub critical_above: u32,
  /// Ceiling for PRs that only touch tests and carry the tests-only change type.
  pub tests_only_cap: f64,
  /// Criticality ceiling when every file is low priority.
  pub low_priority_criticality_cap: u32,
  /// Blast radius factor when every file is low priority.
  pub low_priority_blast_damping: f64,
  pub confidence: ConfidenceConfig,
  pub levels: LevelThresholds,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      weights: Weights::default(),
      small_but_dangerous_bonus: 10.0,
      small_volume_below: 40,
      critical_above: 60,
      tests_only_cap: 25.0,
      low_priority_criticality_cap: 25,
      low_priority_blast_damping: 0.5,
      confidence: ConfidenceConfig::default(),
      levels: LevelThresholds::default(),
    }
  }
}

impl ScoringConfig {
  /// Parse a TOML document; missing fields keep their defaults.
  pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
    let config: Self = toml::from_str(s).map_err(|e| EngineError::config("<inline>", e))?;
    config.validate()?;
    Ok(config)
  }

  /// Load and validate a TOML file.
  pub fn load(path: &Path) -> Result<Self, EngineError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| EngineError::config(&display, e))?;
    let config: Self = toml::from_str(&raw).map_err(|e| EngineError::config(&display, e))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    let weights = self.weights.values();
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
      return Err(EngineError::validation(
        "weights",
        "must be finite and non-negative",
      ));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
      return Err(EngineError::validation(
        "weights",
        &format!("must sum to 1.0 (got {:.3})", sum),
      ));
    }
    if self.levels.medium > self.levels.high {
      return Err(EngineError::validation(
        "levels",
        "medium threshold must not exceed high",
      ));
    }
    if !(0.0..=1.0).contains(&self.low_priority_blast_damping) {
      return Err(EngineError::validation(
        "low_priority_blast_damping",
        "must be within 0..=1",
      ));
    }
    let c = &self.confidence;
    if !(0.0..=1.0).contains(&c.base) {
      return Err(EngineError::validation("confidence.base", "must be within 0..=1"));
    }
    Ok(())
  }
}
