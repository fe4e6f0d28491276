//! Change type score derived from PR title/body and file paths.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ChangedFile, PullRequestInfo};

/// Keyword families in priority order; the first one found sets the base score.
/// Boundaries are ASCII word boundaries, so "éfix" still contains "fix".
static KEYWORD_SCORES: Lazy<Vec<(Regex, u32)>> = Lazy::new(|| {
  [
    (r"(?-u:\b)(breaking|major|migration)(?-u:\b)", 95),
    (r"(?-u:\b)(security|vulnerability|cve)(?-u:\b)", 90),
    (r"(?-u:\b)(refactor|restructure|rewrite|cleanup)(?-u:\b)", 70),
    (r"(?-u:\b)(feature|feat|add|new|implement)(?-u:\b)", 60),
    (r"(?-u:\b)(enhance|improve|update|upgrade)(?-u:\b)", 50),
    (r"(?-u:\b)(fix|bug|issue|patch|resolve)(?-u:\b)", 35),
    (r"(?-u:\b)(docs|documentation|readme)(?-u:\b)", 10),
  ]
  .into_iter()
  .map(|(re, score)| (Regex::new(re).unwrap(), score))
  .collect()
});

static TEST_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"test|spec").unwrap());
static TEST_ONLY_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"test|spec|__tests__").unwrap());

pub const TESTS_ONLY: u32 = 20;
pub const DEFAULT: u32 = 40;

/// Base change-type score before synergy boosts.
pub fn detect_change_type(pr: &PullRequestInfo, files: &[ChangedFile]) -> u32 {
  let text = format!("{} {}", pr.title, pr.body).to_lowercase();

  if let Some((_, score)) = KEYWORD_SCORES.iter().find(|(re, _)| re.is_match(&text)) {
    return *score;
  }
  if files.iter().all(|f| TEST_PATH.is_match(&f.filename)) {
    return TESTS_ONLY;
  }
  DEFAULT
}

/// Change-type score with volume synergy: large features, refactors and
/// enhancements are bumped a tier.
pub fn synergistic_change_type(pr: &PullRequestInfo, files: &[ChangedFile], volume: u32) -> u32 {
  let base = detect_change_type(pr, files);
  match base {
    60 if volume > 70 => 80,
    70 if volume > 85 => 80,
    50 if volume > 75 => 60,
    _ => base,
  }
}

/// Every file path looks like a test. Vacuously true for an empty list.
/// Matched against the path as given, not lower-cased.
pub fn all_test_files(files: &[ChangedFile]) -> bool {
  files.iter().all(|f| TEST_ONLY_PATH.is_match(&f.filename))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pr(title: &str) -> PullRequestInfo {
    PullRequestInfo::new(title, "")
  }

  fn src_files() -> Vec<ChangedFile> {
    vec![ChangedFile::new("app/services/export.js", 10, 2)]
  }

  #[test]
  fn keyword_priority() {
    let files = src_files();
    assert_eq!(detect_change_type(&pr("BREAKING: drop v1 api"), &files), 95);
    assert_eq!(detect_change_type(&pr("Fix security vulnerability"), &files), 90);
    assert_eq!(detect_change_type(&pr("Refactor exporter"), &files), 70);
    assert_eq!(detect_change_type(&pr("feat: add csv export"), &files), 60);
    assert_eq!(detect_change_type(&pr("Improve retry timing"), &files), 50);
    assert_eq!(detect_change_type(&pr("Fix login bug"), &files), 35);
    assert_eq!(detect_change_type(&pr("docs: typo"), &files), 10);
  }

  #[test]
  fn body_is_searched_too() {
    let p = PullRequestInfo::new("Exporter tweaks", "This is a breaking change.");
    assert_eq!(detect_change_type(&p, &src_files()), 95);
  }

  #[test]
  fn keywords_need_word_boundaries() {
    // "address" must not count as "add".
    assert_eq!(detect_change_type(&pr("Address review comments"), &src_files()), DEFAULT);
  }

  #[test]
  fn accented_prefix_does_not_hide_keyword() {
    assert_eq!(detect_change_type(&pr("éfix login"), &src_files()), 35);
    assert_eq!(detect_change_type(&pr("Überrefactor"), &src_files()), DEFAULT);
  }

  #[test]
  fn test_only_fallback() {
    let files = vec![
      ChangedFile::new("tests/unit/parser.test.js", 4, 0),
      ChangedFile::new("spec/helpers_spec.rb", 2, 1),
    ];
    assert_eq!(detect_change_type(&pr(""), &files), TESTS_ONLY);
    assert_eq!(detect_change_type(&pr(""), &[]), TESTS_ONLY);
    assert_eq!(detect_change_type(&pr(""), &src_files()), DEFAULT);
  }

  #[test]
  fn synergy_boosts() {
    let files = src_files();
    assert_eq!(synergistic_change_type(&pr("feat: export"), &files, 85), 80);
    assert_eq!(synergistic_change_type(&pr("feat: export"), &files, 70), 60);
    assert_eq!(synergistic_change_type(&pr("Refactor exporter"), &files, 85), 70);
    assert_eq!(synergistic_change_type(&pr("Refactor exporter"), &files, 95), 80);
    assert_eq!(synergistic_change_type(&pr("Upgrade exporter"), &files, 85), 60);
    assert_eq!(synergistic_change_type(&pr("Upgrade exporter"), &files, 70), 50);
    assert_eq!(synergistic_change_type(&pr("Fix exporter"), &files, 95), 35);
  }

  #[test]
  fn all_test_files_is_case_sensitive() {
    assert!(all_test_files(&[ChangedFile::new("src/__tests__/a.js", 1, 0)]));
    assert!(!all_test_files(&[ChangedFile::new("src/TEST/a.js", 1, 0)]));
    assert!(all_test_files(&[]));
  }
}
