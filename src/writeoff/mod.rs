//! Validated, audited, irreversible bad-debt write-off.

use tracing::info;

use crate::domain::LedgerEntry;
use crate::errors::{EngineError, EngineResult};
use crate::settlement::{SettlementLedger, WriteOffAudit};
use crate::store::{StoreOp, TransactionalStore};

/// Caller intent for one write-off, including the explicit confirmation the
/// UI collects before anything irreversible happens.
#[derive(Debug, Clone)]
pub struct WriteOffRequest {
    pub amount: f64,
    pub reason: String,
    pub actor: String,
    pub confirmed: bool,
}

pub struct WriteOffProcessor<'t, 's> {
    settlement: &'s SettlementLedger<'t>,
}

impl<'t, 's> WriteOffProcessor<'t, 's> {
    pub fn new(settlement: &'s SettlementLedger<'t>) -> Self {
        Self { settlement }
    }

    /// Validates the request, applies the write-off, and commits the
    /// updated entry together with its audit record in one atomic batch.
    /// There is no reversal operation; this is a deliberate limitation.
    pub fn process(
        &self,
        store: &mut dyn TransactionalStore,
        entry: &LedgerEntry,
        request: WriteOffRequest,
    ) -> EngineResult<(LedgerEntry, WriteOffAudit)> {
        if !request.confirmed {
            return Err(EngineError::MissingConfirmation);
        }

        let mut updated = entry.clone();
        let audit = self.settlement.apply_write_off(
            &mut updated,
            request.amount,
            &request.reason,
            &request.actor,
        )?;
        store.apply_atomic(vec![
            StoreOp::UpsertEntry(updated.clone()),
            StoreOp::RecordAudit(audit.clone()),
        ])?;
        info!(
            transaction_id = %updated.transaction_id,
            amount = request.amount,
            actor = %request.actor,
            "write-off committed"
        );
        Ok((updated, audit))
    }
}
