//! Per-cheque state machine feeding the settlement ledger.
//!
//! Cashed cheques settle immediately, postponed cheques settle on confirmed
//! collection, endorsed cheques pass through with no net settlement effect.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    CashDirection, Cheque, ChequeAccounting, ChequeDraft, ChequeStatus, ChequeTransfer,
    Endorsement, LedgerEntry, Payment,
};
use crate::errors::{EngineError, EngineResult};
use crate::settlement::SettlementLedger;

/// What creating a cheque produced besides the cheque itself.
#[derive(Debug, Clone)]
pub struct ChequeOutcome {
    pub cheque_id: Uuid,
    pub payment: Option<Payment>,
    pub transfer: Option<ChequeTransfer>,
}

pub struct ChequeLedger<'t, 's> {
    settlement: &'s SettlementLedger<'t>,
}

impl<'t, 's> ChequeLedger<'t, 's> {
    pub fn new(settlement: &'s SettlementLedger<'t>) -> Self {
        Self { settlement }
    }

    /// Attaches a new cheque to the entry and applies its creation-time
    /// accounting effect.
    pub fn create_cheque(
        &self,
        entry: &mut LedgerEntry,
        draft: ChequeDraft,
    ) -> EngineResult<ChequeOutcome> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(EngineError::InvalidAmount(draft.amount));
        }
        // Cross-cheque total versus the entry amount is a UI-enforced rule;
        // the engine records the overrun but accepts the cheque.
        if entry.cheque_total() + draft.amount > entry.amount {
            warn!(
                transaction_id = %entry.transaction_id,
                cheque_total = entry.cheque_total() + draft.amount,
                entry_amount = entry.amount,
                "cheque total exceeds entry amount"
            );
        }

        let (cheque, payment, transfer) = match draft.accounting {
            ChequeAccounting::Cashed => {
                let payment = self.settlement.apply_payment(entry, draft.amount)?;
                (
                    Cheque::from_draft(draft, ChequeStatus::Cashed),
                    Some(payment),
                    None,
                )
            }
            ChequeAccounting::Postponed => {
                (Cheque::from_draft(draft, ChequeStatus::Pending), None, None)
            }
            ChequeAccounting::Endorsed => {
                let endorsement = draft
                    .endorsement
                    .clone()
                    .ok_or(EngineError::MissingCounterpartyName)?;
                self.check_endorsement_direction(entry, &endorsement)?;
                let cheque = Cheque::from_draft(draft, ChequeStatus::Endorsed);
                let transfer = ChequeTransfer {
                    id: Uuid::new_v4(),
                    cheque_id: cheque.id,
                    cheque_number: cheque.cheque_number.clone(),
                    amount: cheque.amount,
                    counterpart: endorsement.counterpart().to_string(),
                    linked_transaction_id: entry.transaction_id.clone(),
                    at: self.settlement.now(),
                };
                (cheque, None, Some(transfer))
            }
        };

        let cheque_id = cheque.id;
        info!(
            transaction_id = %entry.transaction_id,
            cheque_number = %cheque.cheque_number,
            accounting = ?cheque.accounting,
            "cheque created"
        );
        entry.cheques.push(cheque);
        Ok(ChequeOutcome {
            cheque_id,
            payment,
            transfer,
        })
    }

    /// Confirms collection of a postponed cheque, settling its amount
    /// against the entry. Only pending postponed cheques may transition.
    pub fn confirm_collection(
        &self,
        entry: &mut LedgerEntry,
        cheque_id: Uuid,
    ) -> EngineResult<Payment> {
        let position = entry
            .cheques
            .iter()
            .position(|cheque| cheque.id == cheque_id)
            .ok_or(EngineError::UnknownCheque(cheque_id))?;
        {
            let cheque = &entry.cheques[position];
            if cheque.accounting != ChequeAccounting::Postponed
                || cheque.status != ChequeStatus::Pending
            {
                return Err(EngineError::InvalidChequeTransition(format!(
                    "cheque {} is {:?}/{:?}, expected postponed/pending",
                    cheque.cheque_number, cheque.accounting, cheque.status
                )));
            }
        }
        let amount = entry.cheques[position].amount;
        let payment = self.settlement.apply_payment(entry, amount)?;
        entry.cheques[position].status = ChequeStatus::Cashed;
        info!(
            transaction_id = %entry.transaction_id,
            cheque_number = %entry.cheques[position].cheque_number,
            amount,
            "postponed cheque collected"
        );
        Ok(payment)
    }

    /// Marks a pending postponed cheque as bounced. No settlement effect.
    pub fn mark_rejected(&self, entry: &mut LedgerEntry, cheque_id: Uuid) -> EngineResult<()> {
        let cheque = entry
            .cheques
            .iter_mut()
            .find(|cheque| cheque.id == cheque_id)
            .ok_or(EngineError::UnknownCheque(cheque_id))?;
        if cheque.accounting != ChequeAccounting::Postponed
            || cheque.status != ChequeStatus::Pending
        {
            return Err(EngineError::InvalidChequeTransition(format!(
                "cheque {} is {:?}/{:?}, only pending postponed cheques bounce",
                cheque.cheque_number, cheque.accounting, cheque.status
            )));
        }
        cheque.status = ChequeStatus::Rejected;
        warn!(
            transaction_id = %entry.transaction_id,
            cheque_number = %cheque.cheque_number,
            "cheque rejected"
        );
        Ok(())
    }

    /// Incoming cheques (entry receives cash) endorse onward to a third
    /// party; outgoing cheques re-pass a cheque from a prior holder.
    fn check_endorsement_direction(
        &self,
        entry: &LedgerEntry,
        endorsement: &Endorsement,
    ) -> EngineResult<()> {
        if endorsement.counterpart().trim().is_empty() {
            return Err(EngineError::MissingCounterpartyName);
        }
        let classification = self
            .settlement
            .classifier()
            .classify(&entry.category, &entry.sub_category)?;
        let valid = match classification.cash_direction {
            CashDirection::Receipt => matches!(endorsement, Endorsement::ToThirdParty(_)),
            CashDirection::Disbursement => matches!(endorsement, Endorsement::FromPriorHolder(_)),
        };
        if valid {
            Ok(())
        } else {
            Err(EngineError::InvalidEndorsement(format!(
                "a {:?}-side entry cannot carry {:?}",
                classification.cash_direction, endorsement
            )))
        }
    }
}
