pub mod auth;
pub mod customers;
pub mod orders;
pub mod response;

use actix_web::web;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Parses a numeric path segment, answering 400 `Invalid <what>` otherwise.
pub(crate) fn parse_path_id(raw: &str, what: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|e| {
        log::warn!("invalid {what} '{raw}': {e}");
        AppError::BadRequest(format!("Invalid {what}"))
    })
}

/// Runs a repository call on the blocking pool. A failure of the pool itself
/// becomes `DomainError::Internal` and takes the same path as a storage error.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| DomainError::Internal(format!("blocking task failed: {e}")))?
}

/// Collapses any storage failure, not-found included, into a 500 carrying
/// `message`. The underlying error only goes to the log.
pub(crate) fn storage_failure(message: &'static str) -> impl FnOnce(DomainError) -> AppError {
    move |e| {
        log::warn!("{message}: {e}");
        AppError::Internal(message.to_string())
    }
}
