use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Health Status Response
///
/// ## Fields
/// - `status`: String indicating service availability ("UP")
/// - `timestamp`: RFC 3339 timestamp of the check
#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
