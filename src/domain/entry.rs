use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::TransactionClassifier;
use crate::domain::cheque::Cheque;
use crate::domain::ids::{self, Clock};
use crate::errors::{EngineError, EngineResult};

/// Threshold below which a remaining balance counts as settled.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// The kind of financial event a ledger entry represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryType {
    Income,
    Expense,
    Equity,
    LoanGiven,
    LoanReceived,
    Advance,
    FixedAssetPurchase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

/// The party on the other side of an entry. Equity entries name the owner;
/// everything else names a customer or supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Party {
    Counterparty(String),
    Owner(String),
}

impl Party {
    pub fn name(&self) -> &str {
        match self {
            Party::Counterparty(name) | Party::Owner(name) => name,
        }
    }
}

/// Audit fields kept on the entry itself for its latest write-off event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteOffRecord {
    pub reason: String,
    pub by: String,
    pub at: DateTime<Utc>,
}

/// Caller-supplied fields for a new entry. Identity, settlement state, and
/// the entry type are owned by [`LedgerEntry::new`]; the type is derived
/// from the category, never declared.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub category: String,
    pub sub_category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub party: Option<Party>,
    pub is_ar_ap: bool,
}

/// A financial transaction, the aggregate root owning its cheques and the
/// settlement totals that derive its payment status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub transaction_id: String,
    pub category: String,
    pub sub_category: String,
    pub entry_type: EntryType,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
    pub is_ar_ap: bool,
    #[serde(default)]
    pub total_paid: f64,
    #[serde(default)]
    pub total_discount: f64,
    #[serde(default)]
    pub writeoff_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writeoff: Option<WriteOffRecord>,
    #[serde(default)]
    pub cheques: Vec<Cheque>,
    /// Legacy documents persisted an explicit remaining balance on advances.
    /// When present it wins over the derived value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_remaining: Option<f64>,
    /// Legacy advance-consumption counter, superseded by `total_paid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_used_from_advance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a validated entry. The entry type is derived from the
    /// category classification, so settlement and journal selection can
    /// never disagree about a stored entry. Party kind must match the
    /// derived type: equity entries name the owner, advances and loans
    /// require a counterparty, and AR/AP tracking is meaningless without
    /// one.
    pub fn new(
        draft: EntryDraft,
        classifier: &TransactionClassifier<'_>,
        clock: &dyn Clock,
    ) -> EngineResult<Self> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(EngineError::InvalidAmount(draft.amount));
        }
        let entry_type = classifier
            .classify(&draft.category, &draft.sub_category)?
            .entry_type;
        match (&entry_type, &draft.party) {
            (EntryType::Equity, Some(Party::Owner(_))) => {}
            (EntryType::Equity, _) => {
                return Err(EngineError::InvalidParty(
                    "equity entries must name the owner".into(),
                ));
            }
            (_, Some(Party::Owner(_))) => {
                return Err(EngineError::InvalidParty(
                    "only equity entries may name the owner".into(),
                ));
            }
            (
                EntryType::Advance | EntryType::LoanGiven | EntryType::LoanReceived,
                None,
            ) => {
                return Err(EngineError::InvalidParty(
                    "advances and loans require a counterparty".into(),
                ));
            }
            _ => {}
        }
        if draft.is_ar_ap && !matches!(draft.party, Some(Party::Counterparty(_))) {
            return Err(EngineError::InvalidParty(
                "AR/AP entries require a counterparty".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            transaction_id: ids::transaction_id(clock),
            category: draft.category,
            sub_category: draft.sub_category,
            entry_type,
            amount: draft.amount,
            date: draft.date,
            party: draft.party,
            is_ar_ap: draft.is_ar_ap,
            total_paid: 0.0,
            total_discount: 0.0,
            writeoff_amount: 0.0,
            payment_status: PaymentStatus::Unpaid,
            writeoff: None,
            cheques: Vec::new(),
            stored_remaining: None,
            total_used_from_advance: None,
            created_at: clock.now(),
        })
    }

    /// Outstanding balance, clamped at zero.
    pub fn remaining_balance(&self) -> f64 {
        (self.amount - self.total_paid - self.total_discount - self.writeoff_amount).max(0.0)
    }

    /// Sum of everything already settled against the entry.
    pub fn settled_total(&self) -> f64 {
        self.total_paid + self.total_discount + self.writeoff_amount
    }

    /// Recomputes `payment_status` from the four numeric fields.
    pub fn refresh_status(&mut self) {
        self.payment_status =
            derive_status(self.amount, self.total_paid, self.total_discount, self.writeoff_amount);
    }

    /// Total face value of all cheques attached to the entry.
    pub fn cheque_total(&self) -> f64 {
        self.cheques.iter().map(|cheque| cheque.amount).sum()
    }

    pub fn cheque(&self, id: Uuid) -> Option<&Cheque> {
        self.cheques.iter().find(|cheque| cheque.id == id)
    }

    pub fn party_name(&self) -> Option<&str> {
        self.party.as_ref().map(Party::name)
    }

    /// Structural checks applied before the entry is committed to a store.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(EngineError::InvalidAmount(self.amount));
        }
        for value in [self.total_paid, self.total_discount, self.writeoff_amount] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidAmount(value));
            }
        }
        if self.writeoff_amount > 0.0
            && self
                .writeoff
                .as_ref()
                .map_or(true, |record| record.reason.trim().is_empty())
        {
            return Err(EngineError::MissingReason);
        }
        Ok(())
    }
}

/// Pure, total status derivation: exactly one status for any four inputs,
/// never an "overpaid" state.
pub fn derive_status(amount: f64, paid: f64, discount: f64, writeoff: f64) -> PaymentStatus {
    let remaining = (amount - paid - discount - writeoff).max(0.0);
    if remaining <= SETTLEMENT_EPSILON {
        PaymentStatus::Paid
    } else if paid + discount + writeoff > 0.0 {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}
