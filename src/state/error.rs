//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No department matches the requested id
    #[error("Department not found: {id}")]
    DepartmentNotFound { id: i64 },

    /// No person matches the given display name
    #[error("Person not found: {name}")]
    PersonNotFound { name: String },
}
