use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        let code = self.code();
        match self {
            AppError::InvalidClaim(msg) | AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, code, &msg)
            }
            AppError::InvalidToken => {
                error_resp(StatusCode::UNAUTHORIZED, code, "Authentication required")
            }
            AppError::InvalidCredentials => {
                error_resp(StatusCode::UNAUTHORIZED, code, "Invalid credentials")
            }
            AppError::Unauthorized => error_resp(StatusCode::FORBIDDEN, code, "Access denied"),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, code, "Not found"),
            AppError::Conflict(msg) => error_resp(StatusCode::CONFLICT, code, &msg),
            AppError::Database(_) | AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, code, "Internal server error")
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message, "code": code.as_str() });
    (status, Json(body)).into_response()
}
