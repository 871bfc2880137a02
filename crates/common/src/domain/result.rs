use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed connection descriptor for org {0}: {1}")]
    MalformedConnection(String, String),

    #[error("CRM query error: {0}")]
    QueryError(String),

    #[error("CRM update error: {0}")]
    UpdateError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] anyhow::Error),
}
