use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a cheque is accounted for at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChequeAccounting {
    /// Settles the entry immediately, like a cash payment.
    Cashed,
    /// Held until its due date; settles only on confirmed collection.
    Postponed,
    /// Passed through to a third party with no net settlement effect.
    Endorsed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChequeStatus {
    Pending,
    Cashed,
    Rejected,
    Endorsed,
}

/// Counterpart of an endorsement, keyed by cheque direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Endorsement {
    /// Incoming cheque passed onward to the named third party.
    ToThirdParty(String),
    /// Outgoing cheque that re-passes a cheque received from the named holder.
    FromPriorHolder(String),
}

impl Endorsement {
    pub fn counterpart(&self) -> &str {
        match self {
            Endorsement::ToThirdParty(name) | Endorsement::FromPriorHolder(name) => name,
        }
    }
}

/// A negotiable instrument tied to one ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cheque {
    pub id: Uuid,
    pub cheque_number: String,
    pub amount: f64,
    pub bank_name: String,
    pub due_date: NaiveDate,
    pub accounting: ChequeAccounting,
    pub status: ChequeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsement: Option<Endorsement>,
}

/// Caller-supplied fields for a new cheque; identity is generated here.
#[derive(Debug, Clone)]
pub struct ChequeDraft {
    pub cheque_number: String,
    pub amount: f64,
    pub bank_name: String,
    pub due_date: NaiveDate,
    pub accounting: ChequeAccounting,
    pub endorsement: Option<Endorsement>,
}

impl Cheque {
    pub fn from_draft(draft: ChequeDraft, status: ChequeStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            cheque_number: draft.cheque_number,
            amount: draft.amount,
            bank_name: draft.bank_name,
            due_date: draft.due_date,
            accounting: draft.accounting,
            status,
            endorsement: draft.endorsement,
        }
    }
}

/// Pass-through record produced when a cheque is endorsed; carries no
/// settlement effect on the owning entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeTransfer {
    pub id: Uuid,
    pub cheque_id: Uuid,
    pub cheque_number: String,
    pub amount: f64,
    pub counterpart: String,
    pub linked_transaction_id: String,
    pub at: DateTime<Utc>,
}
