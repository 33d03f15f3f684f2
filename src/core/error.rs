use thiserror::Error;

/// Failures raised by a record store.
///
/// These never reach HTTP clients verbatim; the service reports them as a
/// persistence failure and keeps the detail in the logs.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Record {0} not found")]
    RecordNotFound(i64),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
