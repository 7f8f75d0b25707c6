//! Error types for the board service

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tonic::Status;

pub type Result<T> = std::result::Result<T, KanbanError>;

/// Field-scoped validation messages, keyed by field path (`columns.2.name`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turns collected messages into an error, or `Ok` when nothing was collected.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KanbanError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("this action is unauthorized: {action}")]
    AuthorizationDenied { action: String },

    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Business rule violation attached to a single field.
    #[error("{message}")]
    InvalidState { field: String, message: String },

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl KanbanError {
    pub fn denied(action: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            action: action.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_state(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidState {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::ValidationFailed(errors)
    }
}

impl From<KanbanError> for Status {
    fn from(err: KanbanError) -> Self {
        match err {
            KanbanError::AuthorizationDenied { .. } => Status::permission_denied(err.to_string()),
            KanbanError::ValidationFailed(errors) => Status::invalid_argument(errors.to_string()),
            KanbanError::NotFound { .. } => Status::not_found(err.to_string()),
            KanbanError::InvalidState { field, message } => {
                Status::failed_precondition(format!("{}: {}", field, message))
            }
            KanbanError::Database(err) => {
                tracing::error!(error = %err, "database error");
                Status::unavailable("Database is unavailable")
            }
            KanbanError::Pool(err) => {
                tracing::error!(error = %err, "connection pool error");
                Status::unavailable("Database is unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn field_errors_render_every_message() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name is required.");
        errors.add("columns", "A board must have at least one column.");
        errors.add("name", "The name is too long.");

        assert_eq!(
            errors.to_string(),
            "columns: A board must have at least one column.; name: The name is required.; name: The name is too long."
        );
        assert_eq!(errors.get("name").map(|m| m.len()), Some(2));
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn errors_map_to_status_codes() {
        let status: Status = KanbanError::denied("update this board").into();
        assert_eq!(status.code(), Code::PermissionDenied);

        let status: Status = KanbanError::invalid_field("title", "The title is required.").into();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("title: The title is required."));

        let status: Status = KanbanError::not_found("card", "abc").into();
        assert_eq!(status.code(), Code::NotFound);

        let status: Status =
            KanbanError::invalid_state("user_id", "Cannot share board with the owner").into();
        assert_eq!(status.code(), Code::FailedPrecondition);
        assert_eq!(status.message(), "user_id: Cannot share board with the owner");

        let status: Status = KanbanError::Database(diesel::result::Error::NotFound).into();
        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(status.message(), "Database is unavailable");
    }
}
