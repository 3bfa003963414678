//! # HTTP error mapping
//!
//! Password mismatches become `401 incorrect password`. Everything else is a
//! `500` carrying only the operation's message; the cause goes to the log.

use ab_core::error::AppError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub const INCORRECT_PASSWORD: &str = "incorrect password";

#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct ApiError {
    context: &'static str,
    source: AppError,
}

impl ApiError {
    /// Builds a `map_err` adapter tagging failures with the operation's message,
    /// e.g. `.map_err(ApiError::context("Error posting thread"))`.
    pub fn context(context: &'static str) -> impl FnOnce(AppError) -> ApiError {
        move |source| ApiError { context, source }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.source {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match &self.source {
            AppError::Unauthorized(_) => HttpResponse::Unauthorized()
                .content_type(ContentType::plaintext())
                .body(INCORRECT_PASSWORD),
            cause => {
                tracing::error!(error = %cause, "{}", self.context);
                HttpResponse::InternalServerError().json(json!({ "error": self.context }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn unauthorized_maps_to_plain_401() {
        let err = ApiError::context("Error deleting thread")(AppError::Unauthorized("incorrect password".into()));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        assert_eq!(body, INCORRECT_PASSWORD);
    }

    #[actix_web::test]
    async fn other_failures_hide_their_cause() {
        let err = ApiError::context("Error fetching replies")(AppError::NotFound("Thread".into(), "x".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Error fetching replies" }));
    }
}
