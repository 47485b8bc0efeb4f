//! Maps a classified transaction to the journal template a downstream
//! poster records against. Selection only; no posting happens here.

use serde::{Deserialize, Serialize};

use crate::domain::EntryType;
use crate::errors::{EngineError, EngineResult};
use crate::taxonomy::names;

/// Closed set of journal template ids known to the posting layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JournalTemplate {
    IncomeJournal,
    ExpenseJournal,
    OwnerCapital,
    OwnerDrawings,
    LoanGiven,
    LoanCollection,
    LoanReceived,
    LoanRepayment,
    FixedAssetPurchase,
}

pub struct JournalTemplateSelector;

impl JournalTemplateSelector {
    /// Selects the template for a classified transaction.
    ///
    /// A loan entry whose category matches neither known loan category is a
    /// fatal classification error, never a default template.
    pub fn select(
        entry_type: EntryType,
        category: &str,
        sub_category: &str,
    ) -> EngineResult<JournalTemplate> {
        match entry_type {
            EntryType::Income => Ok(JournalTemplate::IncomeJournal),
            EntryType::Expense => Ok(JournalTemplate::ExpenseJournal),
            EntryType::Equity => {
                if sub_category == names::OWNER_DRAWINGS {
                    Ok(JournalTemplate::OwnerDrawings)
                } else {
                    Ok(JournalTemplate::OwnerCapital)
                }
            }
            EntryType::LoanGiven => {
                if category != names::LOAN_GIVEN {
                    return Err(EngineError::UnknownLoanCategory(category.to_string()));
                }
                if sub_category == names::LOAN_GIVEN_COLLECT {
                    Ok(JournalTemplate::LoanCollection)
                } else {
                    Ok(JournalTemplate::LoanGiven)
                }
            }
            EntryType::LoanReceived => {
                if category != names::LOAN_RECEIVED {
                    return Err(EngineError::UnknownLoanCategory(category.to_string()));
                }
                if sub_category == names::LOAN_RECEIVED_REPAY {
                    Ok(JournalTemplate::LoanRepayment)
                } else {
                    Ok(JournalTemplate::LoanReceived)
                }
            }
            // No dedicated advance template exists; advances post through
            // the journal matching their cash direction.
            EntryType::Advance => {
                if category == names::SUPPLIER_ADVANCE {
                    Ok(JournalTemplate::ExpenseJournal)
                } else {
                    Ok(JournalTemplate::IncomeJournal)
                }
            }
            EntryType::FixedAssetPurchase => Ok(JournalTemplate::FixedAssetPurchase),
        }
    }
}
