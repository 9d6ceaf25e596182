use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Backend {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Decode { endpoint, .. }
            | ApiError::Backend { endpoint, .. } => endpoint,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
