use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use crate::errors::AppError;

// Converts AppError into the response the browser sees. Storage and template
// details are logged here and never shown to the user.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors send the client back to the login form
            AppError::Auth(msg) => {
                tracing::debug!("Redirecting unauthenticated request: {}", msg);
                Redirect::to("/").into_response()
            }

            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),

            AppError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable, please try again later",
                ).into_response()
            }

            AppError::Session(msg) => {
                tracing::error!("Session failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }

            AppError::Template(e) => {
                tracing::error!("Failed to load template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }

            AppError::Overflow => {
                tracing::error!("Ledger totals exceed the supported range");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ledger totals are too large to display",
                ).into_response()
            }

            AppError::Task(msg) => {
                tracing::error!("Blocking task failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use axum::http::header;

    #[test]
    fn test_storage_error_is_service_unavailable() {
        let err = AppError::from(StoreError::Unavailable("data/entries.csv".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_error_redirects_to_login() {
        let response = AppError::Auth("Not authenticated".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[test]
    fn test_overflow_is_server_error() {
        let response = AppError::Overflow.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let response = AppError::Validation("Amount must be a number".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
