use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::handlers::response::{BaseResponse, Empty};

/// Failures a handler can answer with. Client and storage errors render the
/// JSON envelope; identity-provider errors render their raw message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Provider(String),
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::BadRequest(message) | AppError::Internal(message) => {
                HttpResponse::build(status).json(BaseResponse::<Empty>::message(status, message.clone()))
            }
            AppError::Provider(message) => HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(message.clone()),
        }
    }
}
