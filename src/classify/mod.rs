//! Derives entry type, P&L inclusion, and cash direction from the category
//! taxonomy plus subcategory overrides.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CashDirection, EntryType};
use crate::errors::{EngineError, EngineResult};
use crate::taxonomy::{names, CategoryKind, CategoryTaxonomy};

/// Result of classifying one (category, subcategory) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub entry_type: EntryType,
    pub excluded_from_pl: bool,
    pub cash_direction: CashDirection,
}

/// Classifier over an injected immutable taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct TransactionClassifier<'t> {
    taxonomy: &'t CategoryTaxonomy,
}

impl Default for TransactionClassifier<'static> {
    /// Classifier over the shared built-in registry.
    fn default() -> Self {
        Self::new(&crate::taxonomy::DEFAULT_TAXONOMY)
    }
}

impl<'t> TransactionClassifier<'t> {
    pub fn new(taxonomy: &'t CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &'t CategoryTaxonomy {
        self.taxonomy
    }

    /// Classifies a (category, subcategory) pair.
    ///
    /// The only failure is a loan-family category that matches neither
    /// canonical loan category; mis-tagged loans corrupt the balance sheet
    /// and must never fall through to a silent default.
    pub fn classify(&self, category: &str, sub_category: &str) -> EngineResult<Classification> {
        if self.taxonomy.is_loan_family(category) {
            return classify_loan(category, sub_category);
        }

        if category == names::CUSTOMER_ADVANCE {
            return Ok(Classification {
                entry_type: EntryType::Advance,
                excluded_from_pl: true,
                cash_direction: CashDirection::Receipt,
            });
        }
        if category == names::SUPPLIER_ADVANCE {
            return Ok(Classification {
                entry_type: EntryType::Advance,
                excluded_from_pl: true,
                cash_direction: CashDirection::Disbursement,
            });
        }

        if category == names::FIXED_ASSETS {
            // Periodic depreciation is the one P&L-relevant subcategory under
            // the otherwise capitalized fixed-asset category.
            if sub_category == names::DEPRECIATION {
                return Ok(Classification {
                    entry_type: EntryType::Expense,
                    excluded_from_pl: false,
                    cash_direction: CashDirection::Disbursement,
                });
            }
            return Ok(Classification {
                entry_type: EntryType::FixedAssetPurchase,
                excluded_from_pl: true,
                cash_direction: CashDirection::Disbursement,
            });
        }

        match self.taxonomy.kind(category) {
            CategoryKind::Income => Ok(Classification {
                entry_type: EntryType::Income,
                excluded_from_pl: false,
                cash_direction: CashDirection::Receipt,
            }),
            CategoryKind::Expense => Ok(Classification {
                entry_type: EntryType::Expense,
                excluded_from_pl: false,
                cash_direction: CashDirection::Disbursement,
            }),
            CategoryKind::Equity => Ok(classify_equity(sub_category)),
            CategoryKind::Unknown => {
                debug!(category, "unknown category, classifying as expense");
                Ok(Classification {
                    entry_type: EntryType::Expense,
                    excluded_from_pl: false,
                    cash_direction: CashDirection::Disbursement,
                })
            }
        }
    }
}

/// Equity direction is decided by the subcategory. Drawings disburse cash,
/// contributions receive it; either way the entry changes book value, not
/// profit, so it never participates in P&L.
fn classify_equity(sub_category: &str) -> Classification {
    let cash_direction = if sub_category == names::OWNER_DRAWINGS {
        CashDirection::Disbursement
    } else {
        if sub_category != names::CAPITAL_CONTRIBUTION {
            debug!(sub_category, "unrecognized equity subcategory, treating as contribution");
        }
        CashDirection::Receipt
    };
    Classification {
        entry_type: EntryType::Equity,
        excluded_from_pl: true,
        cash_direction,
    }
}

fn classify_loan(category: &str, sub_category: &str) -> EngineResult<Classification> {
    match category {
        names::LOAN_GIVEN => {
            // Collecting a loan you gave brings cash in; granting it pays out.
            let cash_direction = if sub_category == names::LOAN_GIVEN_COLLECT {
                CashDirection::Receipt
            } else {
                CashDirection::Disbursement
            };
            Ok(Classification {
                entry_type: EntryType::LoanGiven,
                excluded_from_pl: true,
                cash_direction,
            })
        }
        names::LOAN_RECEIVED => {
            let cash_direction = if sub_category == names::LOAN_RECEIVED_REPAY {
                CashDirection::Disbursement
            } else {
                CashDirection::Receipt
            };
            Ok(Classification {
                entry_type: EntryType::LoanReceived,
                excluded_from_pl: true,
                cash_direction,
            })
        }
        other => Err(EngineError::UnknownLoanCategory(other.to_string())),
    }
}
