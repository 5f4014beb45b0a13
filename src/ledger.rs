use std::io::Read;
use std::path::Path;

use crate::error::{Result, TallyError};
use crate::importer::{ingest, ingest_file};
use crate::models::{AccountType, Ledger, LedgerEntry, Transaction, TransferPair};
use crate::reconciler::{describe_matches, identify_transfers, TRANSFER_WINDOW_DAYS};

/// Merge two reconciled account collections into one ledger.
///
/// Debit rows precede credit rows before a stable sort by descending post
/// date, so same-day rows keep that order.
pub fn assemble(debit: Vec<Transaction>, credit: Vec<Transaction>, transfers: Vec<TransferPair>) -> Ledger {
    let mut entries: Vec<LedgerEntry> = debit
        .into_iter()
        .chain(credit)
        .map(LedgerEntry::from_transaction)
        .collect();
    entries.sort_by(|a, b| b.post_date.cmp(&a.post_date));
    Ledger { entries, transfers }
}

/// Reconcile and assemble two already-ingested collections.
pub fn build_ledger(
    mut debit: Vec<Transaction>,
    mut credit: Vec<Transaction>,
    window_days: i64,
) -> Result<Ledger> {
    if debit.is_empty() && credit.is_empty() {
        return Err(TallyError::EmptyInput);
    }
    let matches = identify_transfers(&mut debit, &mut credit, window_days);
    let transfers = describe_matches(&debit, &credit, &matches);
    tracing::info!(
        debit_rows = debit.len(),
        credit_rows = credit.len(),
        transfers = transfers.len(),
        "assembled ledger"
    );
    Ok(assemble(debit, credit, transfers))
}

/// Ingest both exports, reconcile transfers, and assemble the ledger.
pub fn process<D: Read, C: Read>(debit_source: D, credit_source: C) -> Result<Ledger> {
    process_with_window(debit_source, credit_source, TRANSFER_WINDOW_DAYS)
}

pub fn process_with_window<D: Read, C: Read>(
    debit_source: D,
    credit_source: C,
    window_days: i64,
) -> Result<Ledger> {
    let debit = ingest(debit_source, AccountType::Debit)?;
    let credit = ingest(credit_source, AccountType::Credit)?;
    build_ledger(debit, credit, window_days)
}

pub fn process_files(debit_path: &Path, credit_path: &Path, window_days: i64) -> Result<Ledger> {
    let debit = ingest_file(debit_path, AccountType::Debit)?;
    let credit = ingest_file(credit_path, AccountType::Credit)?;
    build_ledger(debit, credit, window_days)
}
