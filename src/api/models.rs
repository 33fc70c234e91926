use serde::{Deserialize, Serialize};

/// Body of the /check request
#[derive(Debug, Clone, Serialize)]
pub struct CheckRequest<'a> {
    pub url: &'a str,
}

/// Response from the /check endpoint
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CheckResponse {
    pub title: String,
    /// Seconds; the server sends `null` when the duration is unknown
    #[serde(default)]
    pub length: Option<u64>,
    pub thumbnail: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(rename = "isShort", default)]
    pub is_short: bool,
}

fn default_available() -> bool {
    true
}

/// Body of the /download request
#[derive(Debug, Clone, Serialize)]
pub struct DownloadBody<'a> {
    pub url: &'a str,
    pub format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<&'a str>,
}

/// Payload sent alongside a non-success status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        let error = self.error.filter(|error| !error.is_empty())?;
        match self.details.filter(|details| !details.is_empty()) {
            Some(details) => Some(format!("{} ({})", error, details)),
            None => Some(error),
        }
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}
