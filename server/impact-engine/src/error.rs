//! Structured error types for the binary surface. Scoring itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("config: {path}: {reason}")]
  Config { path: String, reason: String },

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(path: &str, reason: impl std::fmt::Display) -> Self {
    Self::Config {
      path: path.to_string(),
      reason: reason.to_string(),
    }
  }

  /// Offending field, when the error names one.
  pub fn field(&self) -> Option<&str> {
    match self {
      Self::Validation { field, .. } => Some(field.as_str()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation_message_names_field() {
    let e = EngineError::validation("weights", "must sum to 1.0");
    assert_eq!(e.to_string(), "validation: weights: must sum to 1.0");
    assert_eq!(e.field(), Some("weights"));
  }

  #[test]
  fn json_errors_convert() {
    let err: EngineError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
    assert!(err.to_string().starts_with("json:"));
    assert_eq!(err.field(), None);
  }
}
