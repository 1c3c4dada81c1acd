/// # Health Status Response
///
/// Represents the operational status of the service with a timestamp.
/// Used as the response format for health check endpoints.
///
/// ## Example JSON
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2024-03-10T15:30:45.123456789Z"
/// }
/// ```
pub mod health;

/// Request, result and error payloads of the domain verification endpoint.
pub mod verification;

pub use health::HealthResponse;
pub use verification::{ErrorResponse, VerificationRequest, VerificationResult};
