use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Body of `POST /verify`.
///
/// Only a JSON object is accepted. The `domain` key matches case-insensitively;
/// a missing or `null` domain decodes to an empty string so the handler can
/// report it as empty rather than malformed.
#[derive(Debug, PartialEq, ToSchema)]
pub struct VerificationRequest {
    pub domain: String,
}

impl TryFrom<Map<String, Value>> for VerificationRequest {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let key = if fields.contains_key("domain") {
            Some("domain".to_string())
        } else {
            fields
                .keys()
                .find(|key| key.eq_ignore_ascii_case("domain"))
                .cloned()
        };

        let domain = match key.and_then(|key| fields.remove(&key)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(domain)) => domain,
            Some(other) => return Err(format!("domain must be a string, got {}", other)),
        };

        Ok(Self { domain })
    }
}

impl<'de> Deserialize<'de> for VerificationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Self::try_from(fields).map_err(serde::de::Error::custom)
    }
}

/// # Domain Verification Result
///
/// Mail-authentication posture of a single domain. Every flag defaults to
/// `false` and every record to an empty string when the corresponding lookup
/// fails or finds no matching record.
///
/// ## Example JSON
/// ```json
/// {
///   "domain": "example.com",
///   "hasMX": true,
///   "hasSPF": true,
///   "hasDMARC": false,
///   "spfRecord": "v=spf1 include:_spf.example.com ~all",
///   "dmarcRecord": ""
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct VerificationResult {
    pub domain: String,
    #[serde(rename = "hasMX")]
    pub has_mx: bool,
    #[serde(rename = "hasSPF")]
    pub has_spf: bool,
    #[serde(rename = "hasDMARC")]
    pub has_dmarc: bool,
    #[serde(rename = "spfRecord")]
    pub spf_record: String,
    #[serde(rename = "dmarcRecord")]
    pub dmarc_record: String,
}

impl VerificationResult {
    /// An all-negative result for `domain`.
    pub fn empty(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Self::default()
        }
    }
}

/// Body of every JSON error response.
#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
