use reqwest::StatusCode;
use thiserror::Error;

/// Status page linked from the outage diagnostic
pub const STATUS_PAGE_URL: &str = "https://status.openai.com/";

/// Classified failure from the remote completion service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("network error or timeout: {0}")]
    NetworkOrTimeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl ServiceError {
    /// Human-readable diagnostic shown to the user for this classification
    pub fn diagnostic(&self) -> String {
        match self {
            ServiceError::ServiceUnavailable(_) => format!(
                "The service is reporting an error. Wait a little and try again.\n\
                 Service status is available at {}",
                STATUS_PAGE_URL
            ),
            ServiceError::NetworkOrTimeout(_) => "There is a network problem. \
                 Check your connection settings or wait a little and try again."
                .to_string(),
            ServiceError::RateLimited(_) => {
                "Too many requests. You have exceeded the request quota; wait before trying again."
                    .to_string()
            }
            ServiceError::Authentication(_) => {
                "The API key or token is invalid or has expired.".to_string()
            }
        }
    }

    /// Later calls in the same run cannot succeed either
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, ServiceError::Authentication(_))
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = match extract_api_message(body) {
            Some(message) => format!("HTTP {}: {}", status, message),
            None => format!("HTTP {}", status),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ServiceError::Authentication(detail)
            }
            StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited(detail),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ServiceError::NetworkOrTimeout(detail)
            }
            _ => ServiceError::ServiceUnavailable(detail),
        }
    }

    /// Classify a transport-level failure
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status, "");
        }
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ServiceError::NetworkOrTimeout(err.to_string())
        } else {
            ServiceError::ServiceUnavailable(err.to_string())
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body
fn extract_api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
