use actix_web::web;

/// # Health Check Endpoint
///
/// Returns the current health status of the service along with a timestamp.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2023-10-05T12:34:56.789Z"
/// }
/// ```
pub mod health;

/// # Domain Verification Endpoint
///
/// Looks up MX records, an SPF policy and a DMARC policy for a domain.
///
/// ## Request
/// - Method: POST
/// - Body: JSON object with `domain` field
///
/// ## Responses
/// - **200 OK**: verification result, even when every lookup failed
/// - **400 Bad Request**: malformed JSON or empty domain
/// - **405 Method Not Allowed**: non-POST request
///
/// ## Example Request
/// ```json
/// { "domain": "example.com" }
/// ```
pub mod verify;

/// Index page and static assets for the browser front-end.
pub mod pages;

/// # Route Configuration
///
/// ```text
/// GET  /               - Verification form
/// GET  /static/{path}  - Front-end assets
/// GET  /health         - Service health status
/// POST /verify         - Domain verification
/// ```
///
/// Expects `web::Data<DomainVerifier>` and `web::Data<SiteAssets>` to be
/// registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(verify::configure_routes)
        .configure(pages::configure_routes);
}
