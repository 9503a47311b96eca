use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("record not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound)
    }
}
