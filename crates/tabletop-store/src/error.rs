use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lookup by id found nothing. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input rejected before touching the database.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A patch named an attribute that is not in the catalog.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A patch named a skill that is not in the catalog.
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// UNIQUE / FOREIGN KEY / NOT NULL violation.
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(ref err, ref msg)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            other => StoreError::Sqlite(other),
        }
    }
}

/// Map "no rows" to [`StoreError::NotFound`] for the given entity.
pub(crate) fn not_found(entity: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(entity),
        other => StoreError::from(other),
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
