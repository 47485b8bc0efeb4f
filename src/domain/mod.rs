//! Domain models for entries, cheques, payments, and identity.

pub mod cheque;
pub mod entry;
pub mod ids;
pub mod payment;

pub use cheque::{Cheque, ChequeAccounting, ChequeDraft, ChequeStatus, ChequeTransfer, Endorsement};
pub use entry::{
    derive_status, EntryDraft, EntryType, LedgerEntry, Party, PaymentStatus, WriteOffRecord,
    SETTLEMENT_EPSILON,
};
pub use ids::{Clock, FixedClock, SystemClock};
pub use payment::{CashDirection, Payment};
