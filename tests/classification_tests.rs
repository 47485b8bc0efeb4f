use chrono::NaiveDate;
use daftar_core::{
    classify::TransactionClassifier,
    domain::{CashDirection, EntryDraft, EntryType, LedgerEntry, Party, SystemClock},
    errors::EngineError,
    journal::{JournalTemplate, JournalTemplateSelector},
    taxonomy::{names, CategoryTaxonomy},
};

#[test]
fn owner_drawings_classify_as_equity_disbursement() {
    let taxonomy = CategoryTaxonomy::builtin();
    let classifier = TransactionClassifier::new(&taxonomy);

    let result = classifier.classify("رأس المال", "سحوبات المالك").unwrap();
    assert_eq!(result.entry_type, EntryType::Equity);
    assert_eq!(result.cash_direction, CashDirection::Disbursement);
    assert!(result.excluded_from_pl);
}

#[test]
fn pl_exclusion_matches_the_entry_type_rule_for_all_pairs() {
    let taxonomy = CategoryTaxonomy::builtin();
    let classifier = TransactionClassifier::new(&taxonomy);

    for category in taxonomy.category_names() {
        let subs = taxonomy.subcategories(category);
        let pairs: Vec<&str> = if subs.is_empty() {
            vec![""]
        } else {
            subs.iter().map(String::as_str).collect()
        };
        for sub in pairs {
            let result = classifier.classify(category, sub).unwrap();
            let excluded_types = matches!(
                result.entry_type,
                EntryType::Equity
                    | EntryType::Advance
                    | EntryType::LoanGiven
                    | EntryType::LoanReceived
                    | EntryType::FixedAssetPurchase
            );
            assert_eq!(
                result.excluded_from_pl, excluded_types,
                "mismatch for {category}/{sub}"
            );
        }
    }
}

#[test]
fn stored_entry_type_always_matches_the_classification() {
    let taxonomy = CategoryTaxonomy::builtin();
    let classifier = TransactionClassifier::new(&taxonomy);
    let clock = SystemClock;

    // The constructor owns the type, so a draft cannot declare one that
    // contradicts its category; the stored type and the classification
    // answer identically for every downstream consumer.
    let cases = [
        (names::SALES, "مبيعات آجلة", EntryType::Income, JournalTemplate::IncomeJournal),
        (
            names::CUSTOMER_ADVANCE,
            "",
            EntryType::Advance,
            JournalTemplate::IncomeJournal,
        ),
        (
            names::PURCHASES,
            "مشتريات نقدية",
            EntryType::Expense,
            JournalTemplate::ExpenseJournal,
        ),
    ];
    for (category, sub, expected_type, expected_template) in cases {
        let entry = LedgerEntry::new(
            EntryDraft {
                category: category.into(),
                sub_category: sub.into(),
                amount: 100.0,
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                party: Some(Party::Counterparty("طرف".into())),
                is_ar_ap: false,
            },
            &classifier,
            &clock,
        )
        .unwrap();
        assert_eq!(entry.entry_type, expected_type);
        let classified = classifier.classify(&entry.category, &entry.sub_category).unwrap();
        assert_eq!(classified.entry_type, entry.entry_type);
        let template =
            JournalTemplateSelector::select(entry.entry_type, &entry.category, &entry.sub_category)
                .unwrap();
        assert_eq!(template, expected_template);
    }
}

#[test]
fn classification_and_template_selection_agree_on_loans() {
    let taxonomy = CategoryTaxonomy::builtin();
    let classifier = TransactionClassifier::new(&taxonomy);

    let collect = classifier
        .classify(names::LOAN_GIVEN, names::LOAN_GIVEN_COLLECT)
        .unwrap();
    assert_eq!(collect.cash_direction, CashDirection::Receipt);
    let template = JournalTemplateSelector::select(
        collect.entry_type,
        names::LOAN_GIVEN,
        names::LOAN_GIVEN_COLLECT,
    )
    .unwrap();
    assert_eq!(template, JournalTemplate::LoanCollection);
}

#[test]
fn mismatched_loan_category_never_gets_a_default_template() {
    let err = JournalTemplateSelector::select(EntryType::LoanReceived, "سلفة غير معروفة", "")
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownLoanCategory(_)));
}

#[test]
fn depreciation_is_the_only_pl_subcategory_under_fixed_assets() {
    let taxonomy = CategoryTaxonomy::builtin();
    let classifier = TransactionClassifier::new(&taxonomy);

    let depreciation = classifier
        .classify(names::FIXED_ASSETS, names::DEPRECIATION)
        .unwrap();
    assert_eq!(depreciation.entry_type, EntryType::Expense);
    assert!(!depreciation.excluded_from_pl);

    for sub in taxonomy.subcategories(names::FIXED_ASSETS) {
        if sub != names::DEPRECIATION {
            let result = classifier.classify(names::FIXED_ASSETS, sub).unwrap();
            assert_eq!(result.entry_type, EntryType::FixedAssetPurchase);
            assert!(result.excluded_from_pl);
        }
    }
}
