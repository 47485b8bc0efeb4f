//! Static category registry: category name → base kind + subcategories.
//!
//! Loaded once (built-in default or from config) into an immutable registry
//! that is injected into the classifier and selector, never consulted as
//! live global state.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Canonical category and subcategory names as persisted by the product.
pub mod names {
    pub const CAPITAL: &str = "رأس المال";
    pub const CAPITAL_CONTRIBUTION: &str = "إيداع رأس المال";
    pub const OWNER_DRAWINGS: &str = "سحوبات المالك";

    pub const LOAN_GIVEN: &str = "قروض ممنوحة";
    pub const LOAN_GIVEN_DISBURSE: &str = "منح قرض";
    pub const LOAN_GIVEN_COLLECT: &str = "تحصيل قرض";
    pub const LOAN_RECEIVED: &str = "قروض مستلمة";
    pub const LOAN_RECEIVED_RECEIVE: &str = "استلام قرض";
    pub const LOAN_RECEIVED_REPAY: &str = "سداد قرض";

    pub const CUSTOMER_ADVANCE: &str = "دفعة مقدمة من عميل";
    pub const SUPPLIER_ADVANCE: &str = "دفعة مقدمة لمورد";

    pub const FIXED_ASSETS: &str = "أصول ثابتة";
    pub const DEPRECIATION: &str = "إهلاك أصول";

    pub const SALES: &str = "مبيعات";
    pub const OTHER_INCOME: &str = "إيرادات أخرى";
    pub const PURCHASES: &str = "مشتريات";
    pub const SALARIES: &str = "رواتب وأجور";
    pub const RENT: &str = "إيجارات";
    pub const GENERAL_EXPENSES: &str = "مصاريف عامة";
}

/// Base kind of a category. `Unknown` is the sentinel for user-entered
/// free-text names so the UI layer can degrade gracefully.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
    Equity,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub kind: CategoryKind,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Immutable category registry for the process lifetime.
#[derive(Debug, Clone)]
pub struct CategoryTaxonomy {
    categories: HashMap<String, CategoryDef>,
    loan_categories: HashSet<String>,
}

impl CategoryTaxonomy {
    pub fn new(
        categories: HashMap<String, CategoryDef>,
        loan_categories: HashSet<String>,
    ) -> Self {
        Self {
            categories,
            loan_categories,
        }
    }

    /// Base kind lookup; never fails, unrecognized names yield `Unknown`.
    pub fn kind(&self, category: &str) -> CategoryKind {
        self.categories
            .get(category)
            .map(|def| def.kind)
            .unwrap_or(CategoryKind::Unknown)
    }

    pub fn subcategories(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(|def| def.subcategories.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the category belongs to the loan family. The family may carry
    /// legacy names beyond the two canonical loan categories; those classify
    /// as an explicit error downstream.
    pub fn is_loan_family(&self, category: &str) -> bool {
        self.loan_categories.contains(category)
    }

    /// Extends the loan family with additional (typically legacy) names.
    pub fn with_loan_categories<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.loan_categories.extend(extra);
        self
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Built-in registry matching the product's shipped category list.
    pub fn builtin() -> Self {
        let mut categories = HashMap::new();
        let mut insert = |name: &str, kind: CategoryKind, subs: &[&str]| {
            categories.insert(
                name.to_string(),
                CategoryDef {
                    kind,
                    subcategories: subs.iter().map(|s| s.to_string()).collect(),
                },
            );
        };

        insert(names::SALES, CategoryKind::Income, &["مبيعات نقدية", "مبيعات آجلة"]);
        insert(names::OTHER_INCOME, CategoryKind::Income, &[]);
        insert(names::PURCHASES, CategoryKind::Expense, &["مشتريات نقدية", "مشتريات آجلة"]);
        insert(names::SALARIES, CategoryKind::Expense, &[]);
        insert(names::RENT, CategoryKind::Expense, &[]);
        insert(names::GENERAL_EXPENSES, CategoryKind::Expense, &[]);
        insert(
            names::CAPITAL,
            CategoryKind::Equity,
            &[names::CAPITAL_CONTRIBUTION, names::OWNER_DRAWINGS],
        );
        insert(
            names::LOAN_GIVEN,
            CategoryKind::Expense,
            &[names::LOAN_GIVEN_DISBURSE, names::LOAN_GIVEN_COLLECT],
        );
        insert(
            names::LOAN_RECEIVED,
            CategoryKind::Income,
            &[names::LOAN_RECEIVED_RECEIVE, names::LOAN_RECEIVED_REPAY],
        );
        insert(names::CUSTOMER_ADVANCE, CategoryKind::Income, &[]);
        insert(names::SUPPLIER_ADVANCE, CategoryKind::Expense, &[]);
        insert(
            names::FIXED_ASSETS,
            CategoryKind::Expense,
            &["شراء أصل", names::DEPRECIATION],
        );

        let loan_categories = [names::LOAN_GIVEN, names::LOAN_RECEIVED]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::new(categories, loan_categories)
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Shared immutable default registry.
pub static DEFAULT_TAXONOMY: Lazy<CategoryTaxonomy> = Lazy::new(CategoryTaxonomy::builtin);
