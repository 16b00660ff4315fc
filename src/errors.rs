use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Config(String),
}

/// Classified failure of a search or detail request.
///
/// The `Display` text is what the input shows to the user, so it stays short
/// and never includes provider error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Error {0}: Failed to fetch address suggestions")]
    Http(u16),
    #[error("Google API error: {0}")]
    Provider(String),
    #[error("Failed to connect to address service")]
    Network(String),
    #[error("Failed to connect to address service")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_hide_internal_reasons() {
        assert_eq!(
            FetchError::Http(502).to_string(),
            "Error 502: Failed to fetch address suggestions"
        );
        assert_eq!(
            FetchError::Provider("REQUEST_DENIED".into()).to_string(),
            "Google API error: REQUEST_DENIED"
        );
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "Failed to connect to address service"
        );
        assert_eq!(
            FetchError::Parse("expected value at line 1".into()).to_string(),
            "Failed to connect to address service"
        );
    }
}
