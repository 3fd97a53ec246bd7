use thiserror::Error;

#[derive(Debug, Error)]
pub enum Chp2xError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Chp2xError {
    fn from(e: serde_json::Error) -> Self {
        Chp2xError::SerializationError(e.to_string())
    }
}
