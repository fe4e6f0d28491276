//! File classification: path → category + risk multiplier.
//!
//! Rules are evaluated in table order and the first match wins, so a path that
//! looks like both a config file and a dependency manifest is config.

use crate::types::{Category, FileCategory};

/// One classification rule: the category it assigns and its match predicate
/// over the lower-cased path.
pub struct Rule {
  pub category: Category,
  pub matches: fn(&str) -> bool,
}

/// Ordered rule table. The order is load-bearing.
pub static RULES: &[Rule] = &[
  Rule {
    category: Category::Security,
    matches: is_security,
  },
  Rule {
    category: Category::Config,
    matches: is_config,
  },
  Rule {
    category: Category::Database,
    matches: is_database,
  },
  Rule {
    category: Category::Core,
    matches: is_core,
  },
  Rule {
    category: Category::Api,
    matches: is_api,
  },
  Rule {
    category: Category::Frontend,
    matches: is_frontend,
  },
  Rule {
    category: Category::Dependencies,
    matches: is_dependency_manifest,
  },
  Rule {
    category: Category::Visual,
    matches: is_visual,
  },
  Rule {
    category: Category::DevtoolsCore,
    matches: is_devtools_core,
  },
  Rule {
    category: Category::Devtools,
    matches: is_devtools,
  },
  Rule {
    category: Category::Tooling,
    matches: is_tooling,
  },
  Rule {
    category: Category::Test,
    matches: is_test,
  },
  Rule {
    category: Category::Docs,
    matches: is_docs,
  },
];

const DEPENDENCY_MANIFESTS: &[&str] = &[
  "package.json",
  "package-lock.json",
  "yarn.lock",
  "pnpm-lock.yaml",
  "composer.json",
  "requirements.txt",
  "gemfile",
  "cargo.toml",
];

/// Classify a path. Total: anything unmatched is `other`.
pub fn classify_file(filename: &str) -> FileCategory {
  let lower = filename.to_lowercase();
  let category = RULES
    .iter()
    .find(|rule| (rule.matches)(&lower))
    .map(|rule| rule.category)
    .unwrap_or(Category::Other);
  tracing::trace!(filename, ?category, "classified");
  FileCategory::from(category)
}

fn contains_any(p: &str, needles: &[&str]) -> bool {
  needles.iter().any(|n| p.contains(n))
}

fn has_extension(p: &str, exts: &[&str]) -> bool {
  match p.rsplit_once('.') {
    Some((_, ext)) => exts.contains(&ext),
    None => false,
  }
}

fn is_security(p: &str) -> bool {
  contains_any(
    p,
    &[
      "auth",
      "security",
      "permission",
      "login",
      "session",
      "token",
      "password",
      "secret",
      "key",
    ],
  )
}

fn is_config(p: &str) -> bool {
  contains_any(p, &["config", ".env", "settings", "constants"])
    || has_extension(p, &["config", "env", "yaml", "yml", "toml"])
}

fn is_database(p: &str) -> bool {
  contains_any(
    p,
    &["model", "migration", "schema", "database", "repository", "/models/", "/migrations/"],
  )
}

fn is_core(p: &str) -> bool {
  contains_any(p, &["service", "controller", "manager", "handler", "processor"])
    || (p.contains("/src/")
      && !contains_any(p, &["devtools", "test", "spec", "__tests__", "demo", "example"]))
    || contains_any(p, &["/lib/", "/core/"])
}

fn is_api(p: &str) -> bool {
  contains_any(p, &["api", "route", "endpoint", "router", "controller", "/api/", "/routes/"])
}

fn is_frontend(p: &str) -> bool {
  contains_any(p, &["component", "view", "page", "ui"]) || has_extension(p, &["jsx", "tsx", "vue"])
}

fn is_dependency_manifest(p: &str) -> bool {
  let basename = p.rsplit('/').next().unwrap_or(p);
  DEPENDENCY_MANIFESTS.contains(&basename)
}

fn is_visual(p: &str) -> bool {
  has_extension(p, &["css", "scss", "sass", "less"])
    || contains_any(p, &["style", "theme", "icon", "emoji", "visual", "symbol"])
}

fn is_devtools_core(p: &str) -> bool {
  contains_any(p, &["devtools", "dev-tools"])
    && contains_any(p, &["renderer", "store", "backend", "hook", "fiber", "reconcil"])
}

fn is_devtools(p: &str) -> bool {
  contains_any(p, &["devtools", "dev-tools", "debugger", "profiler", "inspector"])
}

fn is_tooling(p: &str) -> bool {
  contains_any(p, &["webpack", "babel", "rollup", "vite", "eslint", "prettier", "tsconfig"])
}

fn is_test(p: &str) -> bool {
  contains_any(p, &["test", "spec", "__tests__", ".test.", ".spec."])
}

fn is_docs(p: &str) -> bool {
  p.ends_with(".md") || contains_any(p, &["/docs/", "readme", "changelog"])
}
