/**
 * Error Conversion
 *
 * Converts `ApiError` into HTTP responses. Error responses are JSON:
 *
 * ```json
 * {
 *   "error": "post not found",
 *   "status": 404
 * }
 * ```
 *
 * Store-level errors are logged here, at the single point where they leave
 * the application, and reach the client as an opaque 500.
 */

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        let body = serde_json::json!({
            "error": self.client_message(),
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("internal server error"))
                    .unwrap()
            })
    }
}
