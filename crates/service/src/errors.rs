use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The id is unknown, or an update payload names a different id.
    #[error("not found: {0}")]
    NotFound(String),
    /// The requested change would break an invariant of the stored record.
    #[error("validation error: {0}")]
    Validation(String),
    /// Store failure, passed through with the store's own message.
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
