//! Full analysis report: impact + patterns + file categories + review checklist.

use std::collections::BTreeMap;

use crate::classify::classify_file;
use crate::types::*;

/// Stable id for a request: same title, body and per-file counts → same id.
pub fn report_id(pr: &PullRequestInfo, files: &[ChangedFile]) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(pr.title.as_bytes());
  hasher.update(b"|");
  hasher.update(pr.body.as_bytes());
  for f in files {
    hasher.update(b"|");
    hasher.update(f.filename.as_bytes());
    hasher.update(b":");
    hasher.update(f.additions.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(f.deletions.to_string().as_bytes());
  }
  let hex = hasher.finalize().to_hex();
  format!("pr-{}", &hex[..16])
}

/// One "<description> (<file>)" line per detected pattern.
pub fn pattern_lines(patterns: &[DetectedPattern]) -> Vec<String> {
  patterns
    .iter()
    .map(|p| format!("{} ({})", p.description, p.file))
    .collect()
}

/// Filenames grouped by category, in input order within each group.
pub fn file_categories(files: &[ChangedFile]) -> BTreeMap<Category, Vec<String>> {
  let mut out: BTreeMap<Category, Vec<String>> = BTreeMap::new();
  for f in files {
    out
      .entry(classify_file(&f.filename).category)
      .or_default()
      .push(f.filename.clone());
  }
  out
}

/// Files classified as security or config.
pub fn critical_files(files: &[ChangedFile]) -> Vec<String> {
  files
    .iter()
    .filter(|f| classify_file(&f.filename).category.is_critical())
    .map(|f| f.filename.clone())
    .collect()
}

fn plural(n: u32, one: &'static str, many: &'static str) -> &'static str {
  if n == 1 {
    one
  } else {
    many
  }
}

pub fn summary(pr: &PullRequestInfo, metadata: &ChangeMetadata) -> String {
  format!(
    "This pull request \"{}\" modifies {} {}. The changes include {} additions and {} deletions across the codebase.",
    pr.title,
    metadata.changed_files,
    plural(metadata.changed_files, "file", "files"),
    metadata.additions,
    metadata.deletions
  )
}

/// Counts, then the first two files with their category.
pub fn key_changes(files: &[ChangedFile], metadata: &ChangeMetadata) -> Vec<String> {
  let mut out = vec![
    format!(
      "Modified {} {}",
      metadata.changed_files,
      plural(metadata.changed_files, "file", "files")
    ),
    format!("Added {} lines of code", metadata.additions),
    format!("Removed {} lines of code", metadata.deletions),
  ];
  for f in files.iter().take(2) {
    out.push(format!(
      "{}: {}",
      classify_file(&f.filename).description,
      f.filename
    ));
  }
  out
}

/// Rule-based review checklist.
pub fn checklist(
  impact: &ImpactAssessment,
  patterns: &PatternCollection,
  categories: &BTreeMap<Category, Vec<String>>,
  file_count: usize,
) -> Vec<String> {
  let mut items = vec!["Review all changed files for logic errors".to_string()];

  if !patterns.security.is_empty() || impact.breakdown.criticality > 60 {
    items.push("Verify security implications and access controls".into());
  }

  let has_tests = categories.contains_key(&Category::Test);
  if has_tests {
    items.push("Review test coverage and assertions".into());
  } else if file_count > 2 {
    items.push("Consider adding test coverage for new code".into());
  }

  if !categories.contains_key(&Category::Docs) && impact.score > 50 {
    items.push("Update documentation for significant changes".into());
  }

  if impact.breakdown.volume > 60 {
    items.push("Validate performance implications".into());
  }

  if categories.contains_key(&Category::Database) {
    items.push("Review database schema and migration safety".into());
  }

  items
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::patterns::detect_patterns;
  use crate::score::score_impact;

  fn files() -> Vec<ChangedFile> {
    vec![
      ChangedFile::new("auth/login.js", 30, 5),
      ChangedFile::new("config/app.yml", 2, 2),
      ChangedFile::new("db/migrations/002_users.sql", 20, 0),
      ChangedFile::new("app/services/users.js", 40, 10),
    ]
  }

  #[test]
  fn pattern_lines_name_the_file() {
    let p = detect_patterns(&[ChangedFile::new("auth/login.js", 1, 0)]);
    assert_eq!(
      pattern_lines(&p.security),
      vec!["Authentication logic modified (auth/login.js)"]
    );
    assert!(pattern_lines(&p.quality).is_empty());
  }

  #[test]
  fn report_id_is_stable_and_input_sensitive() {
    let pr = PullRequestInfo::new("Add users", "");
    let a = report_id(&pr, &files());
    let b = report_id(&pr, &files());
    assert_eq!(a, b);
    assert!(a.starts_with("pr-"));
    assert_eq!(a.len(), 19);

    let mut changed = files();
    changed[0].additions += 1;
    assert_ne!(a, report_id(&pr, &changed));
    assert_ne!(a, report_id(&PullRequestInfo::new("Add users!", ""), &files()));
  }

  #[test]
  fn groups_files_by_category() {
    let cats = file_categories(&files());
    assert_eq!(cats[&Category::Security], vec!["auth/login.js"]);
    assert_eq!(cats[&Category::Config], vec!["config/app.yml"]);
    assert_eq!(cats[&Category::Database], vec!["db/migrations/002_users.sql"]);
    assert_eq!(cats[&Category::Core], vec!["app/services/users.js"]);
    assert_eq!(cats.len(), 4);
  }

  #[test]
  fn critical_files_are_security_and_config() {
    assert_eq!(critical_files(&files()), vec!["auth/login.js", "config/app.yml"]);
  }

  #[test]
  fn key_changes_and_summary() {
    let meta = ChangeMetadata::from_files(&files());
    assert_eq!(
      key_changes(&files(), &meta),
      vec![
        "Modified 4 files",
        "Added 92 lines of code",
        "Removed 17 lines of code",
        "Security-sensitive: auth/login.js",
        "Configuration: config/app.yml",
      ]
    );
    let one = ChangeMetadata::new(3, 0, 1);
    assert_eq!(
      summary(&PullRequestInfo::new("Tweak", ""), &one),
      "This pull request \"Tweak\" modifies 1 file. The changes include 3 additions and 0 deletions across the codebase."
    );
  }

  #[test]
  fn checklist_rules() {
    let files = files();
    let meta = ChangeMetadata::from_files(&files);
    let pr = PullRequestInfo::new("Add users", "");
    let impact = score_impact(&pr, &files, &meta);
    let patterns = detect_patterns(&files);
    let cats = file_categories(&files);
    let items = checklist(&impact, &patterns, &cats, files.len());

    assert_eq!(items[0], "Review all changed files for logic errors");
    assert!(items.contains(&"Verify security implications and access controls".to_string()));
    assert!(items.contains(&"Consider adding test coverage for new code".to_string()));
    assert!(items.contains(&"Review database schema and migration safety".to_string()));
    assert!(!items.contains(&"Validate performance implications".to_string()));
  }

  #[test]
  fn checklist_for_test_only_change() {
    let files = vec![ChangedFile::new("tests/parser_test.go", 5, 0)];
    let meta = ChangeMetadata::from_files(&files);
    let impact = score_impact(&PullRequestInfo::default(), &files, &meta);
    let patterns = detect_patterns(&files);
    let cats = file_categories(&files);
    assert_eq!(
      checklist(&impact, &patterns, &cats, files.len()),
      vec![
        "Review all changed files for logic errors",
        "Review test coverage and assertions",
      ]
    );
  }
}
