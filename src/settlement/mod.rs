//! Settlement operations against one ledger entry: payments, discounts,
//! and write-offs, each recomputing the derived payment status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::classify::TransactionClassifier;
use crate::domain::{Clock, LedgerEntry, Payment, SystemClock, WriteOffRecord};
use crate::errors::{EngineError, EngineResult};

/// Persistent audit record for one write-off event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriteOffAudit {
    pub entry_id: Uuid,
    pub amount: f64,
    pub reason: String,
    pub actor: String,
    pub at: DateTime<Utc>,
}

/// Applies settlement events to entries. Operations validate before any
/// mutation and must be committed through the owning store's atomic write.
pub struct SettlementLedger<'t> {
    classifier: TransactionClassifier<'t>,
    clock: Box<dyn Clock>,
}

impl<'t> SettlementLedger<'t> {
    pub fn new(classifier: TransactionClassifier<'t>) -> Self {
        Self {
            classifier,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(classifier: TransactionClassifier<'t>, clock: Box<dyn Clock>) -> Self {
        Self { classifier, clock }
    }

    pub fn classifier(&self) -> &TransactionClassifier<'t> {
        &self.classifier
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Records a payment against the entry and returns the payment record,
    /// with cash direction taken from the entry's classification.
    pub fn apply_payment(&self, entry: &mut LedgerEntry, amount: f64) -> EngineResult<Payment> {
        check_amount(amount, entry)?;
        let classification = self
            .classifier
            .classify(&entry.category, &entry.sub_category)?;

        entry.total_paid += amount;
        entry.refresh_status();
        info!(
            transaction_id = %entry.transaction_id,
            amount,
            remaining = entry.remaining_balance(),
            status = ?entry.payment_status,
            "payment applied"
        );
        Ok(Payment::new(
            amount,
            classification.cash_direction,
            entry.transaction_id.clone(),
            self.clock.now(),
        ))
    }

    /// Records a discount. Discounts reduce recognized net income even
    /// though they are booked against a specific AR entry rather than as a
    /// standalone expense line.
    pub fn apply_discount(&self, entry: &mut LedgerEntry, amount: f64) -> EngineResult<()> {
        check_amount(amount, entry)?;
        entry.total_discount += amount;
        entry.refresh_status();
        info!(
            transaction_id = %entry.transaction_id,
            amount,
            remaining = entry.remaining_balance(),
            "discount applied"
        );
        Ok(())
    }

    /// Records an irreversible write-off. A fully written-off entry reaches
    /// `Paid`, meaning closed rather than collected.
    pub fn apply_write_off(
        &self,
        entry: &mut LedgerEntry,
        amount: f64,
        reason: &str,
        actor: &str,
    ) -> EngineResult<WriteOffAudit> {
        if reason.trim().is_empty() {
            return Err(EngineError::MissingReason);
        }
        check_amount(amount, entry)?;

        let at = self.clock.now();
        entry.writeoff_amount += amount;
        entry.writeoff = Some(WriteOffRecord {
            reason: reason.trim().to_string(),
            by: actor.to_string(),
            at,
        });
        entry.refresh_status();
        info!(
            transaction_id = %entry.transaction_id,
            amount,
            actor,
            remaining = entry.remaining_balance(),
            "write-off applied"
        );
        Ok(WriteOffAudit {
            entry_id: entry.id,
            amount,
            reason: reason.trim().to_string(),
            actor: actor.to_string(),
            at,
        })
    }
}

/// Shared bounds check: positive, finite, and within the remaining balance.
/// Excess amounts are rejected, never clamped into an overpaid state.
fn check_amount(amount: f64, entry: &LedgerEntry) -> EngineResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(amount));
    }
    let remaining = entry.remaining_balance();
    if amount > remaining {
        return Err(EngineError::AmountExceedsBalance { amount, remaining });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CashDirection, EntryDraft, Party, PaymentStatus};
    use crate::taxonomy::{names, CategoryTaxonomy};
    use chrono::NaiveDate;

    fn sale_entry(amount: f64) -> LedgerEntry {
        LedgerEntry::new(
            EntryDraft {
                category: names::SALES.into(),
                sub_category: "مبيعات آجلة".into(),
                amount,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                party: Some(Party::Counterparty("شركة النور".into())),
                is_ar_ap: true,
            },
            &TransactionClassifier::default(),
            &crate::domain::SystemClock,
        )
        .unwrap()
    }

    #[test]
    fn payments_walk_unpaid_partial_paid() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);

        let first = ledger.apply_payment(&mut entry, 500.0).unwrap();
        assert_eq!(first.direction, CashDirection::Receipt);
        assert_eq!(entry.remaining_balance(), 500.0);
        assert_eq!(entry.payment_status, PaymentStatus::Partial);

        ledger.apply_payment(&mut entry, 500.0).unwrap();
        assert_eq!(entry.remaining_balance(), 0.0);
        assert_eq!(entry.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn overpayment_is_rejected_not_clamped() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);
        ledger.apply_payment(&mut entry, 800.0).unwrap();

        let err = ledger.apply_payment(&mut entry, 300.0).unwrap_err();
        assert!(matches!(err, EngineError::AmountExceedsBalance { .. }));
        // Rejection leaves the entry untouched.
        assert_eq!(entry.total_paid, 800.0);
        assert_eq!(entry.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn non_positive_amounts_are_invalid() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);
        assert!(matches!(
            ledger.apply_payment(&mut entry, 0.0),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.apply_discount(&mut entry, -5.0),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn discount_and_payment_combine_into_paid() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);
        ledger.apply_payment(&mut entry, 950.0).unwrap();
        ledger.apply_discount(&mut entry, 50.0).unwrap();
        assert_eq!(entry.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn full_write_off_closes_the_entry() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);

        let audit = ledger
            .apply_write_off(&mut entry, 1000.0, "uncollectible", "actor-a")
            .unwrap();
        assert_eq!(audit.amount, 1000.0);
        assert_eq!(entry.writeoff_amount, 1000.0);
        assert_eq!(entry.remaining_balance(), 0.0);
        assert_eq!(entry.payment_status, PaymentStatus::Paid);

        let err = ledger
            .apply_write_off(&mut entry, 1.0, "again", "actor-a")
            .unwrap_err();
        assert!(matches!(err, EngineError::AmountExceedsBalance { .. }));
    }

    #[test]
    fn write_off_requires_reason() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = sale_entry(1000.0);
        let err = ledger.apply_write_off(&mut entry, 100.0, "  ", "actor").unwrap_err();
        assert!(matches!(err, EngineError::MissingReason));
        assert_eq!(entry.writeoff_amount, 0.0);
    }

    #[test]
    fn equity_disbursement_direction_flows_into_payment() {
        let taxonomy = CategoryTaxonomy::builtin();
        let ledger = SettlementLedger::new(TransactionClassifier::new(&taxonomy));
        let mut entry = LedgerEntry::new(
            EntryDraft {
                category: names::CAPITAL.into(),
                sub_category: names::OWNER_DRAWINGS.into(),
                amount: 400.0,
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                party: Some(Party::Owner("صاحب المحل".into())),
                is_ar_ap: false,
            },
            &TransactionClassifier::default(),
            &crate::domain::SystemClock,
        )
        .unwrap();
        let payment = ledger.apply_payment(&mut entry, 400.0).unwrap();
        assert_eq!(payment.direction, CashDirection::Disbursement);
    }
}
