use thiserror::Error;

/// Coarse failure classification shared by every domain error in the
/// workspace. Policy failures are side-effect free; `Fatal` means the
/// enclosing unit of work must be discarded, never retried in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Conflict,
    InsufficientFunds,
    Blocked,
    Fatal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorClass::Validation => "validation",
            ErrorClass::NotFound => "not_found",
            ErrorClass::Conflict => "conflict",
            ErrorClass::InsufficientFunds => "insufficient_funds",
            ErrorClass::Blocked => "blocked",
            ErrorClass::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("fee must be greater than 0 and less than or equal to the transfer amount")]
    InvalidFee,

    #[error("price must be greater than 0")]
    InvalidPrice,

    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("invalid order id")]
    InvalidOrderId,

    #[error("invalid fulfiller address: {0}")]
    InvalidFulfiller(String),
}

impl ValidationError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}
