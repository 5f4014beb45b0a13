use colored::Colorize;
use comfy_table::{Cell, Table};

use tally::error::Result;
use tally::fmt::{money, percent};
use tally::models::{Ledger, LedgerEntry, TransferPair};
use tally::reports::{
    self, AccountComparison, CategoryRow, KeyMetrics, MerchantRow, MonthlyRow,
};
use tally::settings::Settings;

use super::{load_filtered, FilterArgs, ListingArgs, SourceArgs};

fn signed_money(val: f64) -> Cell {
    if val >= 0.0 {
        Cell::new(money(val).green())
    } else {
        Cell::new(money(val).red())
    }
}

// ---------------------------------------------------------------------------
// Command handlers (load + print)
// ---------------------------------------------------------------------------

pub fn summary(source: &SourceArgs, filter: &FilterArgs, settings: &Settings) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    let metrics = reports::key_metrics(&ledger, filter.as_ref());
    let accounts = reports::account_comparison(&ledger, filter.as_ref());
    println!("{}", format_header(&ledger));
    println!("{}", format_metrics(&metrics));
    println!("\n{}", format_accounts(&accounts));
    Ok(())
}

pub fn monthly(source: &SourceArgs, filter: &FilterArgs, settings: &Settings) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    println!("{}", format_monthly(&reports::monthly_summary(&ledger, filter.as_ref())));
    Ok(())
}

pub fn categories(
    source: &SourceArgs,
    filter: &FilterArgs,
    month: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    let rows = reports::category_breakdown(&ledger, filter.as_ref(), month);
    println!("{}", format_categories(&rows, month));
    Ok(())
}

pub fn merchants(
    source: &SourceArgs,
    filter: &FilterArgs,
    top_n: usize,
    settings: &Settings,
) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    let rows = reports::merchant_ranking(&ledger, filter.as_ref(), top_n);
    println!("{}", format_merchants(&rows, top_n));
    Ok(())
}

pub fn accounts(source: &SourceArgs, filter: &FilterArgs, settings: &Settings) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    println!("{}", format_accounts(&reports::account_comparison(&ledger, filter.as_ref())));
    Ok(())
}

pub fn transfers(source: &SourceArgs, settings: &Settings) -> Result<()> {
    let ledger = source.load(settings)?;
    println!("{}", format_transfers(&ledger.transfers));
    Ok(())
}

pub fn transactions(
    source: &SourceArgs,
    filter: &FilterArgs,
    listing: &ListingArgs,
    settings: &Settings,
) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    let rows = reports::transactions(&ledger, filter.as_ref(), &listing.to_options());
    println!("{}", format_transactions(&rows));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (report data -> String)
// ---------------------------------------------------------------------------

pub fn format_header(ledger: &Ledger) -> String {
    match ledger.date_bounds() {
        Some((first, last)) => format!(
            "{} transactions, {first} to {last} ({} transfer pairs excluded)",
            ledger.len(),
            ledger.transfers.len()
        ),
        None => "No transactions".to_string(),
    }
}

pub fn format_metrics(m: &KeyMetrics) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total Income"), Cell::new(money(m.total_income))]);
    table.add_row(vec![Cell::new("Total Expenses"), Cell::new(money(m.total_expenses))]);
    table.add_row(vec![Cell::new("Net Cash Flow".bold()), signed_money(m.net_cash_flow)]);
    table.add_row(vec![Cell::new("Savings Rate"), Cell::new(percent(m.savings_rate))]);
    format!("Key Metrics\n{table}")
}

pub fn format_monthly(rows: &[MonthlyRow]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expenses", "Net"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.month),
            Cell::new(money(r.total_income)),
            Cell::new(money(r.total_expenses)),
            signed_money(r.net_cash_flow),
        ]);
    }
    let income: f64 = rows.iter().map(|r| r.total_income).sum();
    let expenses: f64 = rows.iter().map(|r| r.total_expenses).sum();
    let net: f64 = rows.iter().map(|r| r.net_cash_flow).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(income)),
        Cell::new(money(expenses)),
        signed_money(net),
    ]);
    format!("Monthly Cash Flow\n{table}")
}

pub fn format_categories(rows: &[CategoryRow], month: Option<&str>) -> String {
    let total: f64 = rows.iter().map(|r| r.total_spent).sum();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Spent", "%", "Count"]);
    for r in rows {
        let share = if total > 0.0 { r.total_spent / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(&r.category),
            Cell::new(money(r.total_spent)),
            Cell::new(percent(share)),
            Cell::new(r.transaction_count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total)),
        Cell::new(""),
        Cell::new(rows.iter().map(|r| r.transaction_count).sum::<usize>()),
    ]);
    match month {
        Some(m) => format!("Spending by Category ({m})\n{table}"),
        None => format!("Spending by Category\n{table}"),
    }
}

pub fn format_merchants(rows: &[MerchantRow], top_n: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Merchant", "Spent", "Visits", "Average"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.merchant),
            Cell::new(money(r.total_spent)),
            Cell::new(r.visit_count),
            Cell::new(money(r.avg_transaction)),
        ]);
    }
    format!("Top {top_n} Merchants\n{table}")
}

pub fn format_accounts(c: &AccountComparison) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Account", "Spent"]);
    table.add_row(vec![Cell::new("Debit Card"), Cell::new(money(c.debit_spending))]);
    table.add_row(vec![Cell::new("Credit Card"), Cell::new(money(c.credit_spending))]);
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(money(c.total_spending))]);
    format!(
        "Account Spending\n{table}\nCredit Card Usage: {}",
        percent(c.credit_percentage)
    )
}

pub fn format_transfers(pairs: &[TransferPair]) -> String {
    if pairs.is_empty() {
        return "No card payments matched to checking withdrawals.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Amount", "Withdrawn", "Checking Description", "Paid", "Card Description"]);
    for p in pairs {
        table.add_row(vec![
            Cell::new(money(p.amount)),
            Cell::new(p.debit_date),
            Cell::new(&p.debit_description),
            Cell::new(p.credit_date),
            Cell::new(&p.credit_description),
        ]);
    }
    format!("Matched Transfers\n{table}")
}

pub fn format_transactions(rows: &[&LedgerEntry]) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Date", "Description", "Category", "Debit", "Credit", "Balance", "Account",
    ]);
    for e in rows {
        let description = if e.is_transfer {
            format!("{} {}", e.description, "(transfer)".dimmed())
        } else {
            e.description.clone()
        };
        table.add_row(vec![
            Cell::new(e.post_date),
            Cell::new(description),
            Cell::new(&e.category),
            Cell::new(if e.debit_amount > 0.0 { money(e.debit_amount).red().to_string() } else { String::new() }),
            Cell::new(if e.credit_amount > 0.0 { money(e.credit_amount).green().to_string() } else { String::new() }),
            Cell::new(e.balance.map(money).unwrap_or_default()),
            Cell::new(e.account_type),
        ]);
    }
    format!("Showing {} transactions\n{table}", rows.len())
}
