use thiserror::Error;
use uuid::Uuid;

pub type EngineResult<T> = Result<T, EngineError>;

/// Error type covering every rejection the engine can produce.
///
/// Validation variants are raised before any mutation; an `Err` therefore
/// guarantees the affected entry is untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("amount {amount} exceeds remaining balance {remaining}")]
    AmountExceedsBalance { amount: f64, remaining: f64 },
    #[error("write-off requires a non-empty reason")]
    MissingReason,
    #[error("write-off requires explicit confirmation")]
    MissingConfirmation,
    #[error("endorsed cheque requires a counterparty name")]
    MissingCounterpartyName,
    #[error("endorsement direction does not match the entry's cash flow: {0}")]
    InvalidEndorsement(String),
    #[error("unknown loan category: {0}")]
    UnknownLoanCategory(String),
    #[error("allocation exceeds invoice total of {invoice_amount}")]
    AllocationExceedsInvoice { invoice_amount: f64 },
    #[error("invalid cheque transition: {0}")]
    InvalidChequeTransition(String),
    #[error("invalid party for entry type: {0}")]
    InvalidParty(String),
    #[error("unknown entry: {0}")]
    UnknownEntry(Uuid),
    #[error("unknown cheque: {0}")]
    UnknownCheque(Uuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
