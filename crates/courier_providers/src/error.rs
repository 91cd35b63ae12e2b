use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Incomplete response")]
    IncompleteResponse,

    #[error("Expected {expected} travel times, got {actual}")]
    MismatchedLength { expected: usize, actual: usize },

    #[error("No route found between the requested points")]
    NoRoute,
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Request(error)
        }
    }
}

/// Reads the body of a response, turning non-success statuses into
/// [`ServiceError::Api`].
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.text().await?)
}
