use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
