use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quote book
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Payment percentages must add up to 100% (currently {sum}%)")]
    PaymentSplit { sum: f64 },

    #[error("Quantity for '{description}' must be at least 1")]
    InvalidQuantity { description: String },

    #[error("Price for '{description}' cannot be negative")]
    NegativePrice { description: String },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(StoreError::Backend(err))
    }
}
