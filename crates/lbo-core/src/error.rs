use thiserror::Error;

#[derive(Debug, Error)]
pub enum LboError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LboError {
    fn from(e: serde_json::Error) -> Self {
        LboError::SerializationError(e.to_string())
    }
}
