use super::common::*;
use crate::workflows::board_package::domain::{FinancialCategory, FinancialEntry};

fn entry(category: FinancialCategory, amount: u64) -> FinancialEntry {
    FinancialEntry {
        category,
        description: "Statement line".to_string(),
        amount,
    }
}

#[test]
fn financial_totals_group_entries_by_category() {
    let mut application = coop_purchase("app-totals");
    application.financial_entries = vec![
        entry(FinancialCategory::Asset, 300_000),
        entry(FinancialCategory::Asset, 50_000),
        entry(FinancialCategory::Liability, 120_000),
        entry(FinancialCategory::MonthlyIncome, 15_000),
        entry(FinancialCategory::MonthlyExpense, 4_200),
    ];

    let totals = application.financial_totals();
    assert_eq!(totals.assets, 350_000);
    assert_eq!(totals.liabilities, 120_000);
    assert_eq!(totals.monthly_income, 15_000);
    assert_eq!(totals.monthly_expenses, 4_200);
    assert_eq!(totals.net_worth(), 230_000);
}

#[test]
fn financial_totals_saturate_on_oversized_statements() {
    let mut application = coop_purchase("app-huge");
    application.financial_entries = vec![
        entry(FinancialCategory::Asset, u64::MAX),
        entry(FinancialCategory::Asset, 1),
        entry(FinancialCategory::Liability, u64::MAX),
        entry(FinancialCategory::Liability, u64::MAX),
    ];

    let totals = application.financial_totals();
    assert_eq!(totals.assets, u64::MAX);
    assert_eq!(totals.liabilities, u64::MAX);
    assert_eq!(totals.net_worth(), 0);
}
