use std::path::PathBuf;

use thiserror::Error;

use crate::model::Collection;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("malformed document: {0}")]
    Schema(String),

    #[error("{collection} record '{id}' is missing required field `{field}`")]
    MissingField {
        collection: Collection,
        id: String,
        field: &'static str,
    },

    #[error(
        "{collection} record '{id}' has order {order}, which comes before the preceding order {previous}"
    )]
    OrderViolation {
        collection: Collection,
        id: String,
        order: i64,
        previous: i64,
    },

    #[error("refusing to overwrite the input document {}", .0.display())]
    SameFile(PathBuf),

    #[error("output {} already exists (use --force to replace it)", .0.display())]
    OutputExists(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinkError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema_error",
            Self::MissingField { .. } => "missing_field",
            Self::OrderViolation { .. } => "order_violation",
            Self::SameFile(_) => "same_file",
            Self::OutputExists(_) => "output_exists",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_record_and_field() {
        let err = LinkError::MissingField {
            collection: Collection::Tasks,
            id: "t7".into(),
            field: "order",
        };
        assert_eq!(err.code(), "missing_field");
        assert_eq!(
            err.to_string(),
            "taskList record 't7' is missing required field `order`"
        );
    }

    #[test]
    fn order_violation_mentions_both_orders() {
        let err = LinkError::OrderViolation {
            collection: Collection::Projects,
            id: "B".into(),
            order: 1,
            previous: 4,
        };
        let message = err.to_string();
        assert!(message.contains("projectList record 'B'"));
        assert!(message.contains("order 1"));
        assert!(message.contains("preceding order 4"));
    }
}
