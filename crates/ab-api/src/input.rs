//! Extractor configuration for the JSON API.
//!
//! A body or query string that fails to extract (no body, wrong content
//! type, wrong field types) is a failed operation like any other: it goes
//! through [`ApiError`] as a 500 carrying the route's message, and the
//! deserializer's own text only reaches the log.

use ab_core::error::AppError;
use actix_web::{web, HttpRequest};

use crate::error::ApiError;
use crate::handlers::operation_failure;

fn rejected(err: impl std::fmt::Display, req: &HttpRequest) -> actix_web::Error {
    ApiError::context(operation_failure(req))(AppError::ValidationError(err.to_string())).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| rejected(err, req))
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, req| rejected(err, req))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| rejected(err, req))
}
