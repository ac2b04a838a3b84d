//! Database-specific error types and conversions.

use aduan_core::error::AduanError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated on {entity}.{field}")]
    Duplicate { entity: String, field: String },

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Complaint {id} has already moved past the requested status")]
    StaleStatus { id: String },
}

impl DbError {
    /// Classify a failed statement, recognizing unique-index violations on
    /// the indexes listed in `unique` (index name, field name).
    pub(crate) fn from_statement(
        entity: &str,
        unique: &[(&str, &str)],
        err: impl std::fmt::Display,
    ) -> Self {
        let message = err.to_string();
        for (index, field) in unique {
            if message.contains(index) {
                return DbError::Duplicate {
                    entity: entity.into(),
                    field: (*field).into(),
                };
            }
        }
        DbError::Migration(message)
    }
}

impl From<DbError> for AduanError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AduanError::NotFound { entity, id },
            DbError::Duplicate { entity, field } => AduanError::AlreadyExists { entity, field },
            DbError::Hashing(msg) => AduanError::Crypto(msg),
            stale @ DbError::StaleStatus { .. } => AduanError::validation(stale.to_string()),
            other => AduanError::Database(other.to_string()),
        }
    }
}
