//! Input/output types for the impact engine (JSON contract with the extension and backend).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One file touched by the change set.
///
/// Line counts are coerced leniently: absent, `null`, negative or non-numeric
/// values all become 0 so a sloppy payload still produces an assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
  pub filename: String,
  #[serde(default, deserialize_with = "lenient_count")]
  pub additions: u32,
  #[serde(default, deserialize_with = "lenient_count")]
  pub deletions: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub patch: Option<String>,
}

impl ChangedFile {
  pub fn new(filename: impl Into<String>, additions: u32, deletions: u32) -> Self {
    Self {
      filename: filename.into(),
      additions,
      deletions,
      patch: None,
    }
  }

  pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
    self.patch = Some(patch.into());
    self
  }

  pub fn lines_changed(&self) -> u32 {
    self.additions.saturating_add(self.deletions)
  }
}

/// Aggregate counters for the whole change set.
///
/// `changed_files` is expected to equal the number of files passed alongside,
/// but nothing enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMetadata {
  #[serde(default, deserialize_with = "lenient_count")]
  pub additions: u32,
  #[serde(default, deserialize_with = "lenient_count")]
  pub deletions: u32,
  #[serde(default, alias = "changed_files", deserialize_with = "lenient_count")]
  pub changed_files: u32,
}

impl ChangeMetadata {
  pub fn new(additions: u32, deletions: u32, changed_files: u32) -> Self {
    Self {
      additions,
      deletions,
      changed_files,
    }
  }

  /// Sum line counts and count files.
  pub fn from_files(files: &[ChangedFile]) -> Self {
    Self {
      additions: files.iter().fold(0u32, |acc, f| acc.saturating_add(f.additions)),
      deletions: files.iter().fold(0u32, |acc, f| acc.saturating_add(f.deletions)),
      changed_files: u32::try_from(files.len()).unwrap_or(u32::MAX),
    }
  }

  pub fn total_lines(&self) -> u32 {
    self.additions.saturating_add(self.deletions)
  }
}

/// Descriptive PR text; only used for change-type detection and the report summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestInfo {
  #[serde(default, deserialize_with = "lenient_text")]
  pub title: String,
  #[serde(default, alias = "description", deserialize_with = "lenient_text")]
  pub body: String,
}

impl PullRequestInfo {
  pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      body: body.into(),
    }
  }
}

/// One request read from stdin. `metadata` is derived from `files` when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
  #[serde(default)]
  pub pr: PullRequestInfo,
  #[serde(default)]
  pub files: Vec<ChangedFile>,
  #[serde(default)]
  pub metadata: Option<ChangeMetadata>,
}

impl AnalysisRequest {
  pub fn metadata(&self) -> ChangeMetadata {
    self
      .metadata
      .unwrap_or_else(|| ChangeMetadata::from_files(&self.files))
  }
}

// ---------------------------------------------------------------------------
// File categories
// ---------------------------------------------------------------------------

/// Semantic category of a file path. Declaration order is the classifier's
/// evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
  Security,
  Config,
  Database,
  Core,
  Api,
  Frontend,
  Dependencies,
  Visual,
  DevtoolsCore,
  Devtools,
  Tooling,
  Test,
  Docs,
  Other,
}

impl Category {
  pub fn multiplier(self) -> f64 {
    match self {
      Self::Security => 2.0,
      Self::Config => 1.8,
      Self::Database => 1.6,
      Self::Core => 1.5,
      Self::Api => 1.4,
      Self::Frontend => 1.0,
      Self::Dependencies => 1.7,
      Self::Visual => 0.4,
      Self::DevtoolsCore => 1.5,
      Self::Devtools => 0.7,
      Self::Tooling => 0.6,
      Self::Test => 0.5,
      Self::Docs => 0.3,
      Self::Other => 1.0,
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::Security => "Security-sensitive",
      Self::Config => "Configuration",
      Self::Database => "Database",
      Self::Core => "Core logic",
      Self::Api => "API/Interface",
      Self::Frontend => "Frontend",
      Self::Dependencies => "Dependencies",
      Self::Visual => "Visual/Styling",
      Self::DevtoolsCore => "DevTools Core",
      Self::Devtools => "DevTools UI",
      Self::Tooling => "Build/Tooling",
      Self::Test => "Tests",
      Self::Docs => "Documentation",
      Self::Other => "Other",
    }
  }

  /// Docs, tests, tooling and styling: multiplier at or below 0.6.
  pub fn is_low_priority(self) -> bool {
    self.multiplier() <= 0.6
  }

  /// Files a reviewer should look at first.
  pub fn is_critical(self) -> bool {
    matches!(self, Self::Security | Self::Config)
  }
}

/// Result of classifying one path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileCategory {
  pub category: Category,
  pub multiplier: f64,
  pub description: &'static str,
}

impl From<Category> for FileCategory {
  fn from(category: Category) -> Self {
    Self {
      category,
      multiplier: category.multiplier(),
      description: category.description(),
    }
  }
}

// ---------------------------------------------------------------------------
// Impact assessment (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
  Low,
  Medium,
  High,
}

impl ImpactLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    }
  }
}

/// The five sub-scores, each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
  pub volume: u32,
  pub criticality: u32,
  pub complexity: u32,
  pub blast_radius: u32,
  pub change_type: u32,
}

impl ScoreBreakdown {
  pub fn values(&self) -> [u32; 5] {
    [
      self.volume,
      self.criticality,
      self.complexity,
      self.blast_radius,
      self.change_type,
    ]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactAssessment {
  /// Rounded weighted score. Boosts can push it past 100; it is not clamped.
  pub score: u32,
  pub level: ImpactLevel,
  pub confidence: f64,
  pub breakdown: ScoreBreakdown,
  pub explanation: String,
}

impl ImpactAssessment {
  pub fn confidence_percent(&self) -> u32 {
    (self.confidence * 100.0).round() as u32
  }

  /// One-line summary, e.g. `HIGH IMPACT (Score: 72/100, Confidence: 60%) - ...`.
  pub fn describe(&self) -> String {
    format!(
      "{} IMPACT (Score: {}/100, Confidence: {}%) - {}",
      self.level.as_str().to_uppercase(),
      self.score,
      self.confidence_percent(),
      self.explanation
    )
  }
}

// ---------------------------------------------------------------------------
// Detected patterns (output)
// ---------------------------------------------------------------------------

/// Pattern severity. Declared critical-first so ascending sort puts the most
/// severe patterns on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Critical,
  High,
  Medium,
  Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
  // security
  Auth,
  Credentials,
  Sql,
  Crypto,
  InputValidation,
  SecurityHeaders,
  FileUpload,
  EnvVars,
  // quality
  ErrorHandling,
  NullChecks,
  Testing,
  Documentation,
  Configuration,
  Todos,
  Deprecated,
  // complexity
  DeepNesting,
  LongFunction,
  MultipleLoops,
  ComplexLogic,
}

/// Which detector family produced a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternFamily {
  Security,
  Quality,
  Complexity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedPattern {
  #[serde(rename = "type")]
  pub kind: PatternKind,
  pub file: String,
  pub severity: Severity,
  pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FamilyCounts {
  pub security: usize,
  pub quality: usize,
  pub complexity: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
  pub total: usize,
  pub critical: usize,
  pub high: usize,
  pub medium: usize,
  pub low: usize,
  pub categories: FamilyCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternCollection {
  pub security: Vec<DetectedPattern>,
  pub quality: Vec<DetectedPattern>,
  pub complexity: Vec<DetectedPattern>,
  pub summary: PatternSummary,
}

/// A pattern tagged with its family, as listed in a flat display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPattern {
  #[serde(flatten)]
  pub pattern: DetectedPattern,
  pub category: PatternFamily,
}

// ---------------------------------------------------------------------------
// Full analysis report (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
  pub report_id: String,
  pub summary: String,
  pub impact: ImpactAssessment,
  pub impact_description: String,
  pub patterns: PatternCollection,
  pub security_concerns: Vec<String>,
  pub quality_patterns: Vec<String>,
  pub file_categories: BTreeMap<Category, Vec<String>>,
  pub critical_files: Vec<String>,
  pub key_changes: Vec<String>,
  pub checklist: Vec<String>,
}

/// Per-file classification row emitted by `--mode classify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedFile {
  pub filename: String,
  #[serde(flatten)]
  pub category: FileCategory,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for unreadable input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

// ---------------------------------------------------------------------------
// Lenient field coercion
// ---------------------------------------------------------------------------

fn lenient_count<'de, D>(de: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<Value>::deserialize(de)?;
  Ok(raw.as_ref().map(count_from_value).unwrap_or(0))
}

// Fractions truncate toward zero.
fn count_from_value(v: &Value) -> u32 {
  match v {
    Value::Number(n) => n
      .as_u64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
      .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
      .unwrap_or(0),
    Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
    _ => 0,
  }
}

fn lenient_text<'de, D>(de: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<Value>::deserialize(de)?;
  Ok(match raw {
    Some(Value::String(s)) => s,
    _ => String::new(),
  })
}
