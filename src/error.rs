use crate::models::ErrorResponse;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request payload")]
    InvalidPayload,

    #[error("Domain cannot be empty")]
    EmptyDomain,

    #[error("Method not allowed")]
    MethodNotAllowed { allow: Method },

    #[error("Error encoding response: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload | ApiError::EmptyDomain => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let ApiError::MethodNotAllowed { allow } = self {
            builder.insert_header((header::ALLOW, allow.as_str()));
        }
        builder.json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
