use thiserror::Error;

/// Failure reading or writing a persisted snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot for key {key:?}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}

/// Failure of a single remote search attempt.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("search request timed out")]
    Timeout,

    #[error(transparent)]
    Transport(reqwest::Error),

    #[error("malformed search response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e)
        }
    }
}
