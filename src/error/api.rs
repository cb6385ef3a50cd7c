use crate::constants::API_URL_ENV;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API URL is not configured. Set {} environment variable.", API_URL_ENV)]
    Configuration,
    #[error("API request failed with status {status}: {message}")]
    Http {
        status: u16,
        message: String,
    },
    #[error("Failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error.to_string())
    }
}
