use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::{select, LedgerFilter};
use crate::models::{AccountType, Ledger, LedgerEntry};

pub const DEFAULT_TOP_N: usize = 10;

/// Non-transfer rows passing `filter`.
fn activity<'a>(
    ledger: &'a Ledger,
    filter: Option<&'a LedgerFilter>,
) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
    select(ledger, filter).filter(|e| !e.is_transfer)
}

/// Non-transfer rows with a positive debit.
fn expenses<'a>(
    ledger: &'a Ledger,
    filter: Option<&'a LedgerFilter>,
) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
    activity(ledger, filter).filter(|e| e.is_expense())
}

/// Group `(key, amount)` pairs, keeping keys in ascending order.
fn group_totals<'a>(rows: impl Iterator<Item = (&'a str, f64)>) -> BTreeMap<&'a str, (f64, usize)> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (key, amount) in rows {
        let slot = groups.entry(key).or_default();
        slot.0 += amount;
        slot.1 += 1;
    }
    groups
}

// ---------------------------------------------------------------------------
// Monthly Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: String,
    pub total_expenses: f64,
    pub total_income: f64,
    pub net_cash_flow: f64,
}

/// Per-month totals, oldest first. Months without activity are omitted.
pub fn monthly_summary(ledger: &Ledger, filter: Option<&LedgerFilter>) -> Vec<MonthlyRow> {
    let mut months: BTreeMap<String, MonthlyRow> = BTreeMap::new();
    for e in activity(ledger, filter) {
        let key = e.month();
        let row = months.entry(key.clone()).or_insert_with(|| MonthlyRow {
            month: key,
            total_expenses: 0.0,
            total_income: 0.0,
            net_cash_flow: 0.0,
        });
        row.total_expenses += e.debit_amount;
        row.total_income += e.credit_amount;
        row.net_cash_flow += e.net_amount;
    }
    months.into_values().collect()
}

// ---------------------------------------------------------------------------
// Category Breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub total_spent: f64,
    pub transaction_count: usize,
}

/// Expense totals per category, largest first. `month` ("YYYY-MM") limits
/// the rows to one calendar month.
pub fn category_breakdown(
    ledger: &Ledger,
    filter: Option<&LedgerFilter>,
    month: Option<&str>,
) -> Vec<CategoryRow> {
    let rows = expenses(ledger, filter)
        .filter(|e| month.map_or(true, |m| e.month() == m))
        .map(|e| (e.category.as_str(), e.debit_amount));

    let mut out: Vec<CategoryRow> = group_totals(rows)
        .into_iter()
        .map(|(category, (total_spent, transaction_count))| CategoryRow {
            category: category.to_string(),
            total_spent,
            transaction_count,
        })
        .collect();
    out.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    out
}

// ---------------------------------------------------------------------------
// Account Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountComparison {
    pub debit_spending: f64,
    pub credit_spending: f64,
    pub total_spending: f64,
    pub credit_percentage: f64,
}

pub fn account_comparison(ledger: &Ledger, filter: Option<&LedgerFilter>) -> AccountComparison {
    let mut debit_spending = 0.0;
    let mut credit_spending = 0.0;
    for e in expenses(ledger, filter) {
        match e.account_type {
            AccountType::Debit => debit_spending += e.debit_amount,
            AccountType::Credit => credit_spending += e.debit_amount,
        }
    }
    let total_spending = debit_spending + credit_spending;
    AccountComparison {
        debit_spending,
        credit_spending,
        total_spending,
        credit_percentage: if total_spending > 0.0 {
            credit_spending / total_spending * 100.0
        } else {
            0.0
        },
    }
}

// ---------------------------------------------------------------------------
// Merchant Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantRow {
    pub merchant: String,
    pub total_spent: f64,
    pub visit_count: usize,
    pub avg_transaction: f64,
}

/// The `top_n` descriptions with the most spending.
pub fn merchant_ranking(
    ledger: &Ledger,
    filter: Option<&LedgerFilter>,
    top_n: usize,
) -> Vec<MerchantRow> {
    let rows = expenses(ledger, filter).map(|e| (e.description.as_str(), e.debit_amount));

    let mut out: Vec<MerchantRow> = group_totals(rows)
        .into_iter()
        .map(|(merchant, (total_spent, visit_count))| MerchantRow {
            merchant: merchant.to_string(),
            total_spent,
            visit_count,
            avg_transaction: total_spent / visit_count as f64,
        })
        .collect();
    out.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    out.truncate(top_n);
    out
}

// ---------------------------------------------------------------------------
// Key Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_cash_flow: f64,
    pub savings_rate: f64,
}

pub fn key_metrics(ledger: &Ledger, filter: Option<&LedgerFilter>) -> KeyMetrics {
    let (total_income, total_expenses) = activity(ledger, filter)
        .fold((0.0, 0.0), |(inc, exp), e| (inc + e.credit_amount, exp + e.debit_amount));
    let net_cash_flow = total_income - total_expenses;
    KeyMetrics {
        total_income,
        total_expenses,
        net_cash_flow,
        savings_rate: if total_income > 0.0 {
            net_cash_flow / total_income * 100.0
        } else {
            0.0
        },
    }
}

// ---------------------------------------------------------------------------
// Transaction Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxnKind {
    #[default]
    All,
    Expenses,
    Income,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingOptions {
    pub show_transfers: bool,
    pub kind: TxnKind,
    pub sort: SortOrder,
}

fn listing_amount(e: &LedgerEntry) -> f64 {
    e.debit_amount + e.credit_amount
}

/// Ledger rows for display. Transfers stay hidden unless asked for.
pub fn transactions<'a>(
    ledger: &'a Ledger,
    filter: Option<&LedgerFilter>,
    opts: &ListingOptions,
) -> Vec<&'a LedgerEntry> {
    let mut rows: Vec<&LedgerEntry> = ledger
        .entries
        .iter()
        .filter(|e| filter.map_or(true, |f| f.matches(e)))
        .filter(|e| opts.show_transfers || !e.is_transfer)
        .filter(|e| match opts.kind {
            TxnKind::All => true,
            TxnKind::Expenses => e.is_expense(),
            TxnKind::Income => e.is_income(),
        })
        .collect();

    match opts.sort {
        SortOrder::DateDesc => rows.sort_by(|a, b| b.post_date.cmp(&a.post_date)),
        SortOrder::DateAsc => rows.sort_by(|a, b| a.post_date.cmp(&b.post_date)),
        SortOrder::AmountDesc => rows.sort_by(|a, b| listing_amount(b).total_cmp(&listing_amount(a))),
        SortOrder::AmountAsc => rows.sort_by(|a, b| listing_amount(a).total_cmp(&listing_amount(b))),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::process;
    use crate::models::UNCATEGORIZED;

    const DEBIT_CSV: &str = "\
Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification
S09,1/31/2026,,Trader Joe's,52.66,,Posted,,Groceries
S09,1/28/2026,,CHASE AUTOPAY,25.34,,Posted,,Transfer
S09,1/15/2026,,PAYROLL ACME,,3000.00,Posted,,Income
S09,1/10/2026,,Trader Joe's,47.34,,Posted,,Groceries
S09,2/01/2026,,RENT,30.00,,Posted,,
S09,2/02/2026,,RENT,30.00,,Posted,,
";

    const CREDIT_CSV: &str = "\
Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification
C44,1/29/2026,,PAYMENT THANK YOU,,25.34,Posted,,Payment
C44,1/20/2026,,NETFLIX,15.49,,Posted,,Entertainment
C44,2/02/2026,,PAYMENT THANK YOU,,30.00,Posted,,Payment
C44,2/03/2026,,AMAZON REFUND,,10.00,Posted,,Shopping
";

    fn ledger() -> Ledger {
        process(DEBIT_CSV.as_bytes(), CREDIT_CSV.as_bytes()).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_monthly_summary_excludes_transfers() {
        let months = monthly_summary(&ledger(), None);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2026-01");
        // Jan: 52.66 + 47.34 + 15.49 expenses, 3000 income; the 25.34 pair is excluded
        assert!(close(months[0].total_expenses, 115.49));
        assert!(close(months[0].total_income, 3000.0));
        assert!(close(months[0].net_cash_flow, 3000.0 - 115.49));
        // Feb: first RENT row is the transfer, second stays an expense
        assert_eq!(months[1].month, "2026-02");
        assert!(close(months[1].total_expenses, 30.0));
        assert!(close(months[1].total_income, 10.0));
    }

    #[test]
    fn test_monthly_summary_omits_empty_months() {
        let debit = "\
Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification
S09,1/05/2026,,A,1,,Posted,,
S09,3/05/2026,,B,2,,Posted,,
";
        let header = "Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification\n";
        let ledger = process(debit.as_bytes(), header.as_bytes()).unwrap();
        let months: Vec<String> = monthly_summary(&ledger, None).into_iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["2026-01", "2026-03"]);
    }

    #[test]
    fn test_category_breakdown_sorted_and_expense_only() {
        let cats = category_breakdown(&ledger(), None, None);
        let names: Vec<&str> = cats.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Groceries", UNCATEGORIZED, "Entertainment"]);
        assert!(close(cats[0].total_spent, 100.0));
        assert_eq!(cats[0].transaction_count, 2);
        assert_eq!(cats[1].transaction_count, 1);
        assert!(!names.contains(&"Income"));
        assert!(!names.contains(&"Transfer"));
    }

    #[test]
    fn test_category_breakdown_sums_to_total_expense() {
        let ledger = ledger();
        let from_view: f64 = category_breakdown(&ledger, None, None).iter().map(|c| c.total_spent).sum();
        let direct: f64 = ledger
            .entries
            .iter()
            .filter(|e| !e.is_transfer && e.debit_amount > 0.0)
            .map(|e| e.debit_amount)
            .sum();
        assert!(close(from_view, direct));
    }

    #[test]
    fn test_category_breakdown_month_filter() {
        let cats = category_breakdown(&ledger(), None, Some("2026-02"));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].category, UNCATEGORIZED);
        assert!(category_breakdown(&ledger(), None, Some("2025-12")).is_empty());
    }

    #[test]
    fn test_account_comparison() {
        let cmp = account_comparison(&ledger(), None);
        assert!(close(cmp.debit_spending, 130.0));
        assert!(close(cmp.credit_spending, 15.49));
        assert!(close(cmp.total_spending, 145.49));
        assert!(close(cmp.credit_percentage, 15.49 / 145.49 * 100.0));
    }

    #[test]
    fn test_account_comparison_empty_is_zero() {
        let filter = LedgerFilter {
            categories: vec!["Nothing".to_string()],
            ..Default::default()
        };
        assert_eq!(account_comparison(&ledger(), Some(&filter)), AccountComparison::default());
    }

    #[test]
    fn test_merchant_ranking() {
        let merchants = merchant_ranking(&ledger(), None, DEFAULT_TOP_N);
        assert_eq!(merchants[0].merchant, "Trader Joe's");
        assert!(close(merchants[0].total_spent, 100.0));
        assert_eq!(merchants[0].visit_count, 2);
        assert!(close(merchants[0].avg_transaction, 50.0));
        assert!(merchants.iter().all(|m| m.merchant != "PAYROLL ACME"));

        let top1 = merchant_ranking(&ledger(), None, 1);
        assert_eq!(top1.len(), 1);
    }

    #[test]
    fn test_key_metrics() {
        let m = key_metrics(&ledger(), None);
        assert!(close(m.total_income, 3010.0));
        assert!(close(m.total_expenses, 145.49));
        assert!(close(m.net_cash_flow, 3010.0 - 145.49));
        assert!(close(m.savings_rate, (3010.0 - 145.49) / 3010.0 * 100.0));
    }

    #[test]
    fn test_views_on_filtered_out_ledger_are_empty() {
        let filter = LedgerFilter {
            from: chrono::NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        let ledger = ledger();
        assert!(monthly_summary(&ledger, Some(&filter)).is_empty());
        assert!(category_breakdown(&ledger, Some(&filter), None).is_empty());
        assert!(merchant_ranking(&ledger, Some(&filter), 10).is_empty());
        assert_eq!(key_metrics(&ledger, Some(&filter)), KeyMetrics::default());
    }

    #[test]
    fn test_views_do_not_mutate_ledger() {
        let ledger = ledger();
        let before = ledger.clone();
        monthly_summary(&ledger, None);
        category_breakdown(&ledger, None, None);
        account_comparison(&ledger, None);
        merchant_ranking(&ledger, None, 3);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_transactions_hide_transfers_by_default() {
        let ledger = ledger();
        let rows = transactions(&ledger, None, &ListingOptions::default());
        assert_eq!(rows.len(), ledger.len() - 4);
        let all = transactions(
            &ledger,
            None,
            &ListingOptions {
                show_transfers: true,
                ..Default::default()
            },
        );
        assert_eq!(all.len(), ledger.len());
    }

    #[test]
    fn test_transactions_kind_and_sort() {
        let ledger = ledger();
        let income = transactions(
            &ledger,
            None,
            &ListingOptions {
                kind: TxnKind::Income,
                sort: SortOrder::AmountAsc,
                ..Default::default()
            },
        );
        let descs: Vec<&str> = income.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descs, vec!["AMAZON REFUND", "PAYROLL ACME"]);

        let oldest = transactions(
            &ledger,
            None,
            &ListingOptions {
                kind: TxnKind::Expenses,
                sort: SortOrder::DateAsc,
                ..Default::default()
            },
        );
        assert_eq!(oldest[0].description, "Trader Joe's");
        assert_eq!(oldest[0].month(), "2026-01");
    }

    #[test]
    fn test_views_on_empty_ledger() {
        let ledger = Ledger::default();
        assert!(monthly_summary(&ledger, None).is_empty());
        assert!(category_breakdown(&ledger, None, None).is_empty());
        assert!(merchant_ranking(&ledger, None, DEFAULT_TOP_N).is_empty());
        assert_eq!(account_comparison(&ledger, None), AccountComparison::default());
        assert_eq!(key_metrics(&ledger, None), KeyMetrics::default());
        assert!(transactions(&ledger, None, &ListingOptions::default()).is_empty());
    }
}
