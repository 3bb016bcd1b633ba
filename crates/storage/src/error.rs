use folio_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl StoreError {
    /// True when the failure is the server refusing the payload rather than
    /// the request not getting through.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { status: 400..=499, .. } | Self::ConstraintViolation(_)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Serialization(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
