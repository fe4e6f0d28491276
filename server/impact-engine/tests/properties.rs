//! Property tests: totality, bounds and determinism of the three entry points.

use impact_engine::{
  classify_file, detect_patterns, score::impact_level, score_impact, Category, ChangeMetadata,
  ChangedFile, PullRequestInfo, ScoringConfig,
};
use proptest::prelude::*;

const MULTIPLIERS: [f64; 10] = [2.0, 1.8, 1.7, 1.6, 1.5, 1.4, 1.0, 0.7, 0.6, 0.5];

fn arb_path() -> impl Strategy<Value = String> {
  let segment = "(src|auth|docs|tests|api|lib|components|migrations|devtools|styles|[a-z_]{1,8})";
  let ext = r"(\.(js|ts|md|css|rs|yml))?";
  (prop::collection::vec(segment, 1..4), "[a-z]{1,8}", ext)
    .prop_map(|(dirs, stem, ext)| format!("{}/{}{}", dirs.join("/"), stem, ext))
}

fn arb_file() -> impl Strategy<Value = ChangedFile> {
  let patch = prop::option::of(
    prop::collection::vec("[+ -][a-z(){}?&|=. ]{0,40}", 0..20).prop_map(|lines| lines.join("\n")),
  );
  (arb_path(), 0u32..2000, 0u32..2000, patch).prop_map(|(name, a, d, patch)| ChangedFile {
    filename: name,
    additions: a,
    deletions: d,
    patch,
  })
}

fn arb_title() -> impl Strategy<Value = String> {
  prop_oneof![
    Just(String::new()),
    Just("feat: add export".to_string()),
    Just("Fix crash".to_string()),
    Just("Refactor storage".to_string()),
    Just("BREAKING: drop v1".to_string()),
    Just("docs: readme".to_string()),
    "[a-zA-Z ]{0,30}",
  ]
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(200))]

  #[test]
  fn classify_is_total_and_deterministic(path in ".{0,60}") {
    let a = classify_file(&path);
    let b = classify_file(&path);
    prop_assert_eq!(&a, &b);
    prop_assert_eq!(a.multiplier, a.category.multiplier());
    prop_assert!(a.multiplier == 0.3 || a.multiplier == 0.4 || MULTIPLIERS.contains(&a.multiplier));
    if a.category == Category::Other {
      prop_assert_eq!(a.multiplier, 1.0);
    }
  }

  #[test]
  fn sub_scores_and_confidence_in_range(
    title in arb_title(),
    files in prop::collection::vec(arb_file(), 0..30),
  ) {
    let meta = ChangeMetadata::from_files(&files);
    let a = score_impact(&PullRequestInfo::new(title, ""), &files, &meta);
    for v in a.breakdown.values() {
      prop_assert!(v <= 100, "sub-score out of range: {:?}", a.breakdown);
    }
    prop_assert!(a.confidence >= 0.5 && a.confidence <= 1.0);
    // Weighted sub-scores top out at 100, the boost adds at most 10.
    prop_assert!(a.score <= 110);
    prop_assert!(!a.explanation.is_empty());
  }

  #[test]
  fn scoring_is_idempotent(
    title in arb_title(),
    files in prop::collection::vec(arb_file(), 0..10),
  ) {
    let pr = PullRequestInfo::new(title, "");
    let meta = ChangeMetadata::from_files(&files);
    let a = serde_json::to_string(&score_impact(&pr, &files, &meta)).unwrap();
    let b = serde_json::to_string(&score_impact(&pr, &files, &meta)).unwrap();
    prop_assert_eq!(a, b);
  }

  #[test]
  fn detection_is_idempotent_and_summarized(files in prop::collection::vec(arb_file(), 0..10)) {
    let a = detect_patterns(&files);
    let b = detect_patterns(&files);
    prop_assert_eq!(&a, &b);
    let s = a.summary;
    prop_assert_eq!(s.total, a.security.len() + a.quality.len() + a.complexity.len());
    prop_assert_eq!(s.total, s.critical + s.high + s.medium + s.low);
    for p in a.security.iter().chain(&a.quality).chain(&a.complexity) {
      prop_assert!(files.iter().any(|f| f.filename == p.file));
    }
  }

  #[test]
  fn higher_score_never_lowers_level(score in 0u32..150, extra in 0u32..150) {
    let config = ScoringConfig::default();
    prop_assert!(impact_level(score + extra, &config) >= impact_level(score, &config));
  }

  #[test]
  fn more_lines_never_lower_volume(a in 0u32..5000, extra in 0u32..5000) {
    let lo = impact_engine::score::volume_score(&ChangeMetadata::new(a, 0, 1));
    let hi = impact_engine::score::volume_score(&ChangeMetadata::new(a + extra, 0, 1));
    prop_assert!(hi >= lo);
  }
}
