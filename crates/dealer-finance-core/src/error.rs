use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealerFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Vehicle not found: {company} / {model} / {variant}")]
    VehicleNotFound {
        company: String,
        model: String,
        variant: String,
    },

    #[error("Invalid loan policy: {0}")]
    InvalidPolicy(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DealerFinanceError {
    fn from(e: serde_json::Error) -> Self {
        DealerFinanceError::SerializationError(e.to_string())
    }
}
