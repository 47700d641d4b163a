use serde_json::Value;
use thiserror::Error;

use auditcord_models::audit_log::AuditLogAction;

#[derive(Debug, Error)]
pub enum AuditLogError {
    #[error("{action} entry is missing option `{key}`")]
    MissingOption {
        action: AuditLogAction,
        key: &'static str,
    },
    #[error("{action} entry has malformed option `{key}`: {value}")]
    InvalidOption {
        action: AuditLogAction,
        key: &'static str,
        value: Value,
    },
    #[error("invalid `{key}` change")]
    InvalidChange {
        key: String,
        #[source]
        source: TransformError,
    },
    #[error("changes carry no `{key}` to build the target from")]
    MissingChange { key: &'static str },
    #[error("malformed audit log payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single field transformer rejected a raw value.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("expected {expected}, got {got}")]
    Unexpected { expected: &'static str, got: Value },
    #[error(transparent)]
    Shape(#[from] serde_json::Error),
}

impl TransformError {
    pub(crate) fn unexpected(expected: &'static str, got: &Value) -> Self {
        Self::Unexpected {
            expected,
            got: got.clone(),
        }
    }
}
