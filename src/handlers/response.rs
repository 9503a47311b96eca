use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope wrapped around every API payload. `status_code` always repeats
/// the HTTP status of the response carrying it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BaseResponse<T> {
    pub data: Option<T>,
    pub message: String,
    pub status_code: u16,
}

impl<T> BaseResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            status_code: status.as_u16(),
        }
    }

    /// Envelope with `data: null`.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            status_code: status.as_u16(),
        }
    }
}

impl<T: Serialize> BaseResponse<T> {
    pub fn respond(status: StatusCode, data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(status, data, message))
    }
}

/// Placeholder payload type for envelopes whose `data` is always null.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_all_three_fields() {
        let json = serde_json::to_value(BaseResponse::new(StatusCode::CREATED, 7, "ok")).unwrap();
        assert_eq!(json, serde_json::json!({"data": 7, "message": "ok", "status_code": 201}));
    }

    #[test]
    fn message_only_envelope_has_null_data() {
        let json = serde_json::to_value(BaseResponse::<Empty>::message(StatusCode::NO_CONTENT, "gone")).unwrap();
        assert_eq!(json, serde_json::json!({"data": null, "message": "gone", "status_code": 204}));
    }
}
