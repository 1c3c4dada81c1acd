use utoipa::OpenApi;

/// OpenAPI Specification Documentation
///
/// Generated at compile time from the `#[utoipa::path]` annotations on the
/// handlers and served under `/api-docs/openapi.json`.
///
/// # Endpoints
/// - Health Check: `GET /health`
/// - Domain Verification: `POST /verify`
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::verify::verify_domain,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::models::verification::VerificationRequest,
            crate::models::verification::VerificationResult,
            crate::models::verification::ErrorResponse
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Domain Verification", description = "MX, SPF and DMARC record checks")
    ),
    info(
        description = "Checks whether a domain publishes MX, SPF and DMARC records",
        title = "Domain Verifier API",
        version = "0.3.0",
    )
)]
pub struct ApiDoc;
