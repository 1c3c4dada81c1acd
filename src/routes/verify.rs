use crate::error::ApiError;
use crate::models::{VerificationRequest, VerificationResult};
use crate::verification::DomainVerifier;
use actix_web::http::Method;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

/// # Domain Verification Endpoint
///
/// Reports whether a domain publishes MX, SPF and DMARC records, together with
/// the raw SPF and DMARC policy text.
///
/// ## Request
/// - Method: POST
/// - Body: JSON object with a `domain` field; surrounding whitespace is trimmed
///
/// ## Responses
/// - **200 OK**: [`VerificationResult`]; DNS failures show up as `false`/empty fields
/// - **400 Bad Request**: malformed JSON or empty domain
/// - **405 Method Not Allowed**: any method other than POST
/// - **500 Internal Server Error**: the result could not be encoded
///
/// ## Example Request
/// ```json
/// { "domain": "example.com" }
/// ```
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification result", body = VerificationResult),
        (status = 400, description = "Malformed payload or empty domain", body = crate::models::ErrorResponse),
        (status = 405, description = "Method not allowed", body = crate::models::ErrorResponse),
        (status = 500, description = "Response encoding failed", body = crate::models::ErrorResponse)
    ),
    tag = "Domain Verification"
)]
pub async fn verify_domain(
    req: web::Json<VerificationRequest>,
    verifier: web::Data<DomainVerifier>,
) -> Result<HttpResponse, ApiError> {
    let domain = req.domain.trim();
    if domain.is_empty() {
        return Err(ApiError::EmptyDomain);
    }

    tracing::info!(domain = %domain, "Verifying domain");
    let result = verifier.verify(domain).await;

    let body = serde_json::to_string(&result).map_err(|e| {
        tracing::error!(domain = %domain, error = %e, "Error encoding verification result");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body))
}

pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed { allow: Method::POST })
}

/// Body extraction rules for `/verify`.
///
/// Any body is parsed as JSON regardless of its `Content-Type`; every
/// extraction failure maps to [`ApiError::InvalidPayload`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected verification payload");
            ApiError::InvalidPayload.into()
        })
}

/// # Route Configuration
///
/// - `POST /verify`: domain verification
/// - any other method on `/verify`: 405 with `Allow: POST`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/verify")
            .app_data(json_config())
            .route(web::post().to(verify_domain))
            .default_service(web::to(method_not_allowed)),
    );
}
