use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketsError {
    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    #[error("user {user_id} still owns {incidents} incident(s); delete or reassign them first")]
    HasDependents { user_id: i64, incidents: i64 },

    #[error("user does not exist: {0}")]
    UnknownUser(i64),

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("invalid priority '{0}': expected Low, Medium or High")]
    InvalidPriority(String),

    #[error("operation failed: {0}")]
    OperationFailed(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TicketsError>;
