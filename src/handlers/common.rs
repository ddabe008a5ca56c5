use crate::{errors::ServiceError, ApiResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T, message: &str) -> Response {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(data).with_message(message)),
    )
        .into_response()
}

/// Unwraps a JSON body, turning a malformed or mistyped payload into
/// `InvalidRequest` so it carries the standard error envelope.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))
}

/// Unwraps a path parameter, reporting an unparsable segment as
/// `InvalidRequest` instead of axum's plain-text rejection.
pub fn path_param<T>(param: Result<Path<T>, PathRejection>) -> Result<T, ServiceError> {
    param
        .map(|Path(value)| value)
        .map_err(|rejection| ServiceError::InvalidRequest(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_response_uses_201() {
        let response = created_response(serde_json::json!({"poNo": 1}), "created");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn success_response_wraps_data() {
        let Json(body) = success_response(5);
        assert!(body.success);
        assert_eq!(body.data, Some(5));
    }
}
