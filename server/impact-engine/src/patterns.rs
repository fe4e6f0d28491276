//! Pattern detection over filenames and diff patches.
//!
//! Three independent families run on every file: security and quality
//! keyword rules over the lower-cased filename/patch, and complexity metrics
//! over the added lines. Nothing suppresses anything else.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::*;

/// A keyword rule: fires when `filename` (if set) or `patch` (if set) matches.
struct Rule {
  kind: PatternKind,
  severity: Severity,
  description: &'static str,
  filename: Option<Regex>,
  patch: Option<Regex>,
}

impl Rule {
  fn new(kind: PatternKind, severity: Severity, description: &'static str) -> Self {
    Self {
      kind,
      severity,
      description,
      filename: None,
      patch: None,
    }
  }

  fn on_filename(mut self, re: &str) -> Self {
    self.filename = Some(Regex::new(re).unwrap());
    self
  }

  fn on_patch(mut self, re: &str) -> Self {
    self.patch = Some(Regex::new(re).unwrap());
    self
  }

  fn matches(&self, filename: &str, patch: &str) -> bool {
    self.filename.as_ref().is_some_and(|re| re.is_match(filename))
      || self.patch.as_ref().is_some_and(|re| re.is_match(patch))
  }
}

static SECURITY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
  use PatternKind::*;
  vec![
    Rule::new(Auth, Severity::High, "Authentication logic modified")
      .on_filename(r"auth|login|session|signin|signout")
      .on_patch(r"authenticate|authorization|auth\(|login\("),
    Rule::new(Credentials, Severity::Critical, "Potential credential or API key reference")
      .on_patch(r"api[_-]?key|secret[_-]?key|password|token|credential"),
    Rule::new(Sql, Severity::High, "SQL query detected - check for injection risks")
      .on_patch(r"select\s+.*from|insert\s+into|update\s+.*set|delete\s+from|exec\(|query\("),
    Rule::new(Crypto, Severity::Medium, "Cryptographic operations modified")
      .on_patch(r"encrypt|decrypt|hash|crypto|cipher|md5|sha[12]|bcrypt"),
    Rule::new(InputValidation, Severity::High, "Input validation or XSS prevention code")
      .on_patch(r"sanitize|validate|escape|xss|htmlspecialchars|dangerouslysetinnerhtml"),
    Rule::new(SecurityHeaders, Severity::Medium, "Security headers or CORS configuration")
      .on_patch(r"cors|access-control|x-frame-options|content-security-policy|x-xss-protection"),
    Rule::new(FileUpload, Severity::Medium, "File upload functionality - validate file types")
      .on_patch(r"upload|multipart|file\.save|fs\.write|createwritestream"),
    Rule::new(EnvVars, Severity::Low, "Environment variable usage")
      .on_patch(r"process\.env|dotenv|env\."),
  ]
});

static QUALITY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
  use PatternKind::*;
  vec![
    Rule::new(ErrorHandling, Severity::Low, "Error handling code present")
      .on_patch(r"try\s*\{|catch\s*\(|\.catch\(|error|exception"),
    Rule::new(NullChecks, Severity::Low, "Null/undefined safety checks").on_patch(
      r"===\s*null|!==\s*null|===\s*undefined|typeof.*undefined|optional chaining|\?\.|nullish",
    ),
    Rule::new(Testing, Severity::Low, "Test coverage added or modified")
      .on_filename(r"test|spec|describe\(|it\(|expect\(|assert")
      .on_patch(r"describe\(|it\(|test\("),
    Rule::new(Documentation, Severity::Low, "Documentation updated")
      .on_filename(r"\.md$")
      .on_patch(r"/\*\*|@param|@returns|@description|readme"),
    Rule::new(Configuration, Severity::Medium, "Configuration file modified")
      .on_filename(r"config|\.env|settings"),
    Rule::new(Todos, Severity::Low, "TODO or FIXME comments added")
      .on_patch(r"//\s*todo|//\s*fixme|/\*\s*todo|/\*\s*fixme"),
    Rule::new(Deprecated, Severity::Medium, "Deprecated API usage or warnings")
      .on_patch(r"deprecated"),
  ]
});

// Word boundaries are ASCII-only: accented letters count as separators.
static LOOP_KEYWORD: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)(?-u:\b)(for|while|foreach|map|filter|reduce)(?-u:\b)").unwrap()
});
static CONDITIONAL: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)(?-u:\b)(if|else|switch|case|\?|&&|\|\|)(?-u:\b)").unwrap()
});

const MAX_NESTING: i64 = 4;
const MAX_ADDED_LINES: usize = 50;
const MAX_LOOPS: usize = 3;
const MAX_CONDITIONALS: usize = 5;

/// Run every detector family over every file, preserving file order.
pub fn detect_patterns(files: &[ChangedFile]) -> PatternCollection {
  let mut out = PatternCollection::default();
  for file in files {
    out.security.extend(security_patterns(file));
    out.quality.extend(quality_patterns(file));
    out.complexity.extend(complexity_patterns(file));
  }
  out.summary = summarize(&out);
  tracing::debug!(
    files = files.len(),
    total = out.summary.total,
    "pattern detection finished"
  );
  out
}

pub fn security_patterns(file: &ChangedFile) -> Vec<DetectedPattern> {
  apply_rules(&SECURITY_RULES, file)
}

pub fn quality_patterns(file: &ChangedFile) -> Vec<DetectedPattern> {
  apply_rules(&QUALITY_RULES, file)
}

/// Structural metrics over the patch's added lines.
pub fn complexity_patterns(file: &ChangedFile) -> Vec<DetectedPattern> {
  let patch = file.patch.as_deref().unwrap_or("");
  let mut found = Vec::new();

  let mut depth: i64 = 0;
  let mut max_depth: i64 = 0;
  for line in patch.split('\n').filter(|l| l.starts_with('+')) {
    depth += line.chars().filter(|c| matches!(c, '{' | '(')).count() as i64;
    max_depth = max_depth.max(depth);
    depth -= line.chars().filter(|c| matches!(c, '}' | ')')).count() as i64;
  }
  if max_depth > MAX_NESTING {
    found.push(pattern(
      file,
      PatternKind::DeepNesting,
      Severity::Medium,
      format!("Deep nesting detected ({} levels)", max_depth),
    ));
  }

  // "+++" headers and bare "+" lines are not counted.
  let added = patch
    .split('\n')
    .filter(|l| {
      let mut chars = l.chars();
      chars.next() == Some('+') && chars.next().is_some_and(|c| c != '+')
    })
    .count();
  if added > MAX_ADDED_LINES {
    found.push(pattern(
      file,
      PatternKind::LongFunction,
      Severity::Low,
      format!("Large code block ({} lines added)", added),
    ));
  }

  let loops = LOOP_KEYWORD.find_iter(patch).count();
  if loops > MAX_LOOPS {
    found.push(pattern(
      file,
      PatternKind::MultipleLoops,
      Severity::Low,
      format!("Multiple iteration patterns ({} detected)", loops),
    ));
  }

  let conditionals = CONDITIONAL.find_iter(patch).count();
  if conditionals > MAX_CONDITIONALS {
    found.push(pattern(
      file,
      PatternKind::ComplexLogic,
      Severity::Low,
      format!("Complex conditional logic ({} branches)", conditionals),
    ));
  }

  found
}

/// Totals by severity and by family.
pub fn summarize(collection: &PatternCollection) -> PatternSummary {
  let mut summary = PatternSummary {
    categories: FamilyCounts {
      security: collection.security.len(),
      quality: collection.quality.len(),
      complexity: collection.complexity.len(),
    },
    ..Default::default()
  };
  for p in collection
    .security
    .iter()
    .chain(&collection.quality)
    .chain(&collection.complexity)
  {
    summary.total += 1;
    match p.severity {
      Severity::Critical => summary.critical += 1,
      Severity::High => summary.high += 1,
      Severity::Medium => summary.medium += 1,
      Severity::Low => summary.low += 1,
    }
  }
  summary
}

impl PatternCollection {
  /// All patterns tagged with their family, most severe first. Stable within a severity.
  pub fn ranked(&self) -> Vec<RankedPattern> {
    let families = [
      (PatternFamily::Security, &self.security),
      (PatternFamily::Quality, &self.quality),
      (PatternFamily::Complexity, &self.complexity),
    ];
    let mut all: Vec<RankedPattern> = families
      .into_iter()
      .flat_map(|(family, patterns)| {
        patterns.iter().map(move |p| RankedPattern {
          pattern: p.clone(),
          category: family,
        })
      })
      .collect();
    all.sort_by_key(|r| r.pattern.severity);
    all
  }

  pub fn is_empty(&self) -> bool {
    self.security.is_empty() && self.quality.is_empty() && self.complexity.is_empty()
  }
}

fn apply_rules(rules: &[Rule], file: &ChangedFile) -> Vec<DetectedPattern> {
  let filename = file.filename.to_lowercase();
  let patch = file.patch.as_deref().unwrap_or("").to_lowercase();
  rules
    .iter()
    .filter(|rule| rule.matches(&filename, &patch))
    .map(|rule| pattern(file, rule.kind, rule.severity, rule.description.to_string()))
    .collect()
}

fn pattern(
  file: &ChangedFile,
  kind: PatternKind,
  severity: Severity,
  description: String,
) -> DetectedPattern {
  DetectedPattern {
    kind,
    file: file.filename.clone(),
    severity,
    description,
  }
}
