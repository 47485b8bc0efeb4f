//! Storage-agnostic port for atomic multi-record writes, plus the
//! in-memory reference implementation used by tests and snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::classify::TransactionClassifier;
use crate::domain::{ChequeTransfer, EntryType, LedgerEntry, Payment};
use crate::errors::EngineResult;
use crate::settlement::WriteOffAudit;

/// One staged write inside an atomic batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreOp {
    UpsertEntry(LedgerEntry),
    RecordPayment(Payment),
    RecordAudit(WriteOffAudit),
    RecordTransfer(ChequeTransfer),
}

/// Atomic multi-write capability the engine depends on. If any op in a
/// batch fails, none may be observably applied. The engine never retries;
/// a failed batch surfaces as a terminal error to the caller.
pub trait TransactionalStore {
    fn apply_atomic(&mut self, ops: Vec<StoreOp>) -> EngineResult<()>;
    fn entry(&self, id: Uuid) -> Option<&LedgerEntry>;
}

/// Outstanding balances for one party, split by cash direction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartyBalance {
    pub receivable: f64,
    pub payable: f64,
}

/// In-memory book of entries and their event records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: HashMap<Uuid, LedgerEntry>,
    payments: Vec<Payment>,
    audits: Vec<WriteOffAudit>,
    transfers: Vec<ChequeTransfer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn audits(&self) -> &[WriteOffAudit] {
        &self.audits
    }

    pub fn transfers(&self) -> &[ChequeTransfer] {
        &self.transfers
    }

    /// Net income per the recognition rule: income net of its discounts and
    /// write-offs, minus expenses, over P&L-included entries only.
    pub fn net_income(&self, classifier: &TransactionClassifier<'_>) -> f64 {
        let mut total = 0.0;
        for entry in self.entries.values() {
            let Ok(classification) = classifier.classify(&entry.category, &entry.sub_category)
            else {
                continue;
            };
            if classification.excluded_from_pl {
                continue;
            }
            match classification.entry_type {
                EntryType::Income => {
                    total += entry.amount - entry.total_discount - entry.writeoff_amount;
                }
                EntryType::Expense => total -= entry.amount,
                _ => {}
            }
        }
        total
    }

    /// Outstanding AR/AP for a party over its open credit entries.
    pub fn party_outstanding(
        &self,
        party: &str,
        classifier: &TransactionClassifier<'_>,
    ) -> PartyBalance {
        let mut balance = PartyBalance::default();
        for entry in self.entries.values() {
            if !entry.is_ar_ap || entry.party_name() != Some(party) {
                continue;
            }
            let Ok(classification) = classifier.classify(&entry.category, &entry.sub_category)
            else {
                continue;
            };
            match classification.cash_direction {
                crate::domain::CashDirection::Receipt => {
                    balance.receivable += entry.remaining_balance();
                }
                crate::domain::CashDirection::Disbursement => {
                    balance.payable += entry.remaining_balance();
                }
            }
        }
        balance
    }
}

impl TransactionalStore for MemoryStore {
    fn apply_atomic(&mut self, ops: Vec<StoreOp>) -> EngineResult<()> {
        // Validate the whole batch before touching any state.
        for op in &ops {
            if let StoreOp::UpsertEntry(entry) = op {
                entry.validate()?;
            }
        }
        let count = ops.len();
        for op in ops {
            match op {
                StoreOp::UpsertEntry(entry) => {
                    self.entries.insert(entry.id, entry);
                }
                StoreOp::RecordPayment(payment) => self.payments.push(payment),
                StoreOp::RecordAudit(audit) => self.audits.push(audit),
                StoreOp::RecordTransfer(transfer) => self.transfers.push(transfer),
            }
        }
        info!(ops = count, "atomic batch applied");
        Ok(())
    }

    fn entry(&self, id: Uuid) -> Option<&LedgerEntry> {
        self.entries.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryDraft, Party, SystemClock};
    use crate::errors::EngineError;
    use crate::taxonomy::{names, CategoryTaxonomy};
    use chrono::NaiveDate;

    fn entry(category: &str, sub: &str, amount: f64) -> LedgerEntry {
        let party = if category == names::CAPITAL {
            Some(Party::Owner("مالك".into()))
        } else {
            Some(Party::Counterparty("طرف".into()))
        };
        LedgerEntry::new(
            EntryDraft {
                category: category.into(),
                sub_category: sub.into(),
                amount,
                date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                party,
                is_ar_ap: false,
            },
            &TransactionClassifier::default(),
            &SystemClock,
        )
        .unwrap()
    }

    #[test]
    fn invalid_op_rejects_the_whole_batch() {
        let mut store = MemoryStore::new();
        let good = entry(names::SALES, "", 500.0);
        let mut bad = entry(names::PURCHASES, "", 100.0);
        bad.total_paid = -1.0;

        let err = store
            .apply_atomic(vec![
                StoreOp::UpsertEntry(good.clone()),
                StoreOp::UpsertEntry(bad),
            ])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        assert!(store.entry(good.id).is_none(), "no partial state after failure");
    }

    #[test]
    fn party_outstanding_splits_receivable_and_payable() {
        let taxonomy = CategoryTaxonomy::builtin();
        let classifier = TransactionClassifier::new(&taxonomy);
        let mut store = MemoryStore::new();

        let mut sale = entry(names::SALES, "مبيعات آجلة", 1000.0);
        sale.is_ar_ap = true;
        sale.total_paid = 400.0;
        let mut purchase = entry(names::PURCHASES, "مشتريات آجلة", 250.0);
        purchase.is_ar_ap = true;

        store
            .apply_atomic(vec![
                StoreOp::UpsertEntry(sale),
                StoreOp::UpsertEntry(purchase),
            ])
            .unwrap();

        let balance = store.party_outstanding("طرف", &classifier);
        assert!((balance.receivable - 600.0).abs() < 1e-9);
        assert!((balance.payable - 250.0).abs() < 1e-9);
    }

    #[test]
    fn net_income_excludes_equity_and_capitalized_entries() {
        let taxonomy = CategoryTaxonomy::builtin();
        let classifier = TransactionClassifier::new(&taxonomy);
        let mut store = MemoryStore::new();

        let mut sale = entry(names::SALES, "", 1000.0);
        sale.total_discount = 100.0;
        let expense = entry(names::RENT, "", 300.0);
        let drawing = entry(names::CAPITAL, names::OWNER_DRAWINGS, 400.0);
        let asset = entry(names::FIXED_ASSETS, "شراء أصل", 900.0);

        store
            .apply_atomic(vec![
                StoreOp::UpsertEntry(sale),
                StoreOp::UpsertEntry(expense),
                StoreOp::UpsertEntry(drawing),
                StoreOp::UpsertEntry(asset),
            ])
            .unwrap();

        // 1000 − 100 discount − 300 rent; drawings and the asset stay out.
        assert!((store.net_income(&classifier) - 600.0).abs() < 1e-9);
    }
}
