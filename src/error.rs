//! Error types for ledger faults
//!
//! Rule violations during validation never surface here; they are
//! reported as `ValidationResult::Invalid` so batch processing can keep
//! going. `LedgerError` is reserved for malformed arguments and broken
//! preconditions, which must fail loudly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output already unspent: {0}")]
    OutputAlreadyUnspent(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
