use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Outcome record returned by every mutating operation.
///
/// This is what presentation layers render: a success flag, one
/// human-readable message, and zero or more error detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub successful: bool,
    pub message: String,
    pub errors: Vec<String>,
}

impl OperationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            successful: true,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            successful: false,
            message: message.into(),
            errors,
        }
    }

    /// Failure carrying the error's detail lines under `message`.
    pub fn from_error(message: impl Into<String>, err: &CoreError) -> Self {
        Self::failure(message, err.details())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_success_is_a_failure_with_reason() {
        let err = CoreError::PartialSuccess {
            message: "remote ok".into(),
            reason: "access point not found".into(),
        };
        let result = OperationResult::from_error(err.to_string(), &err);

        assert!(!result.successful);
        assert_eq!(result.message, "remote ok");
        assert_eq!(result.errors, vec!["access point not found".to_string()]);
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let json = serde_json::to_value(OperationResult::success("done")).unwrap_or_default();
        assert_eq!(json["successful"], true);
        assert_eq!(json["message"], "done");
        assert!(json["errors"].as_array().is_some_and(Vec::is_empty));
    }
}
