//! FIFO allocation of prepaid customer/supplier credit against invoices.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::{EntryType, LedgerEntry, Payment, SETTLEMENT_EPSILON};
use crate::errors::{EngineError, EngineResult};
use crate::settlement::SettlementLedger;
use crate::store::{StoreOp, TransactionalStore};
use crate::taxonomy::names;

/// Which side of the business holds the prepaid credit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdvanceDirection {
    FromCustomer,
    ToSupplier,
}

impl AdvanceDirection {
    pub fn category(&self) -> &'static str {
        match self {
            AdvanceDirection::FromCustomer => names::CUSTOMER_ADVANCE,
            AdvanceDirection::ToSupplier => names::SUPPLIER_ADVANCE,
        }
    }
}

/// One advance consumed against an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub advance_id: Uuid,
    pub amount_allocated: f64,
    pub remaining_after_allocation: f64,
}

/// Result of atomically applying a confirmed allocation set.
#[derive(Debug, Clone)]
pub struct AppliedAllocation {
    pub invoice: LedgerEntry,
    pub advances: Vec<LedgerEntry>,
    pub payments: Vec<Payment>,
}

pub struct AdvanceAllocator;

impl AdvanceAllocator {
    /// Open advances for a party, oldest first (FIFO), ties broken by
    /// creation time.
    pub fn list_available<'a>(
        entries: &'a [LedgerEntry],
        party: &str,
        direction: AdvanceDirection,
    ) -> Vec<&'a LedgerEntry> {
        let mut advances: Vec<&LedgerEntry> = entries
            .iter()
            .filter(|entry| {
                entry.entry_type == EntryType::Advance
                    && entry.category == direction.category()
                    && entry.party_name() == Some(party)
                    && Self::remaining(entry) > SETTLEMENT_EPSILON
            })
            .collect();
        advances.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        advances
    }

    /// Unconsumed credit on an advance. An explicitly persisted remaining
    /// balance wins; otherwise fall back to the legacy derivation from
    /// whichever consumption counter the document carries.
    pub fn remaining(advance: &LedgerEntry) -> f64 {
        if let Some(stored) = advance.stored_remaining {
            return stored.max(0.0);
        }
        let consumed = advance
            .total_paid
            .max(advance.total_used_from_advance.unwrap_or(0.0))
            .max(0.0);
        (advance.amount - consumed).max(0.0)
    }

    /// Greedily consumes oldest-first until the invoice is covered or the
    /// advances run out.
    pub fn auto_allocate(invoice_amount: f64, advances: &[&LedgerEntry]) -> Vec<Allocation> {
        let mut allocations = Vec::new();
        let mut outstanding = invoice_amount;
        for advance in advances {
            if outstanding <= SETTLEMENT_EPSILON {
                break;
            }
            let available = Self::remaining(advance);
            if available <= SETTLEMENT_EPSILON {
                continue;
            }
            let amount = available.min(outstanding);
            allocations.push(Allocation {
                advance_id: advance.id,
                amount_allocated: amount,
                remaining_after_allocation: available - amount,
            });
            outstanding -= amount;
        }
        allocations
    }

    /// Applies a confirmed allocation set: each allocation reduces the
    /// advance's remaining credit and the invoice's remaining balance, and
    /// every touched record lands in one atomic batch.
    pub fn apply_allocation(
        store: &mut dyn TransactionalStore,
        settlement: &SettlementLedger<'_>,
        invoice: &LedgerEntry,
        advances: &[LedgerEntry],
        allocations: &[Allocation],
    ) -> EngineResult<AppliedAllocation> {
        let mut invoice = invoice.clone();
        let mut updated_advances = Vec::with_capacity(allocations.len());
        let mut payments = Vec::new();

        for allocation in allocations {
            // A selection clamped down to nothing settles nothing.
            if allocation.amount_allocated <= SETTLEMENT_EPSILON {
                continue;
            }
            let advance = advances
                .iter()
                .find(|candidate| candidate.id == allocation.advance_id)
                .ok_or(EngineError::UnknownEntry(allocation.advance_id))?;
            let available = Self::remaining(advance);
            if allocation.amount_allocated > available + SETTLEMENT_EPSILON {
                return Err(EngineError::AmountExceedsBalance {
                    amount: allocation.amount_allocated,
                    remaining: available,
                });
            }

            let mut advance = advance.clone();
            let consumption = settlement
                .apply_payment(&mut advance, allocation.amount_allocated)?
                .with_notes(format!("advance applied to {}", invoice.transaction_id));
            if advance.stored_remaining.is_some() {
                advance.stored_remaining =
                    Some((available - allocation.amount_allocated).max(0.0));
            }

            let receipt = settlement
                .apply_payment(&mut invoice, allocation.amount_allocated)?
                .with_notes(format!("settled from advance {}", advance.transaction_id));

            payments.push(consumption);
            payments.push(receipt);
            updated_advances.push(advance);
        }

        let mut ops: Vec<StoreOp> = vec![StoreOp::UpsertEntry(invoice.clone())];
        ops.extend(updated_advances.iter().cloned().map(StoreOp::UpsertEntry));
        ops.extend(payments.iter().cloned().map(StoreOp::RecordPayment));
        store.apply_atomic(ops)?;

        info!(
            invoice = %invoice.transaction_id,
            allocations = allocations.len(),
            "advance allocation applied"
        );
        Ok(AppliedAllocation {
            invoice,
            advances: updated_advances,
            payments,
        })
    }
}

/// Incremental manual selection of advance amounts for one invoice.
///
/// Each selected amount is clamped to the advance's remaining credit; a
/// selection that would push the total past the invoice amount is rejected
/// outright, leaving the prior selections intact.
#[derive(Debug, Clone)]
pub struct ManualAllocation {
    invoice_amount: f64,
    selections: Vec<Allocation>,
}

impl ManualAllocation {
    pub fn new(invoice_amount: f64) -> Self {
        Self {
            invoice_amount,
            selections: Vec::new(),
        }
    }

    pub fn total_selected(&self) -> f64 {
        self.selections
            .iter()
            .map(|allocation| allocation.amount_allocated)
            .sum()
    }

    /// Adds one selection. Returns the clamped amount actually selected.
    pub fn select(&mut self, advance: &LedgerEntry, amount: f64) -> EngineResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(EngineError::InvalidAmount(amount));
        }
        let available = AdvanceAllocator::remaining(advance);
        let clamped = amount.min(available).max(0.0);
        if self.total_selected() + clamped > self.invoice_amount + SETTLEMENT_EPSILON {
            return Err(EngineError::AllocationExceedsInvoice {
                invoice_amount: self.invoice_amount,
            });
        }
        // An exhausted advance clamps to nothing; recording it would poison
        // the confirmed set with an unpayable zero amount.
        if clamped <= SETTLEMENT_EPSILON {
            return Ok(0.0);
        }
        self.selections.push(Allocation {
            advance_id: advance.id,
            amount_allocated: clamped,
            remaining_after_allocation: available - clamped,
        });
        Ok(clamped)
    }

    pub fn selections(&self) -> &[Allocation] {
        &self.selections
    }

    pub fn into_allocations(self) -> Vec<Allocation> {
        self.selections
    }
}
