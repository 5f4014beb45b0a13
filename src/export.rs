use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::LedgerEntry;

pub const EXPORT_HEADER: &[&str] = &[
    "Post Date",
    "Description",
    "Classification",
    "Debit",
    "Credit",
    "Balance",
    "Account Type",
];

/// Write listing rows as CSV. Money is a plain two-decimal number.
pub fn write_transactions<W: Write>(writer: W, rows: &[&LedgerEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for e in rows {
        wtr.write_record([
            e.post_date.format("%Y-%m-%d").to_string(),
            e.description.clone(),
            e.category.clone(),
            format!("{:.2}", e.debit_amount),
            format!("{:.2}", e.credit_amount),
            e.balance.map(|b| format!("{b:.2}")).unwrap_or_default(),
            e.account_type.key().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn default_file_name() -> String {
    format!("transactions_{}.csv", chrono::Local::now().format("%Y%m%d"))
}

/// Write the export to `path`, creating parent directories as needed.
pub fn export_to_file(path: &Path, rows: &[&LedgerEntry]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_transactions(std::io::BufWriter::new(file), rows)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote transaction export");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::process;
    use crate::reports::{transactions, ListingOptions};

    const DEBIT_CSV: &str = "\
Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification
S09,1/31/2026,,\"Trader Joe's, Inc\",52.66,,Posted,47399.19,Groceries
S09,1/28/2026,,CVS,25.3,,Posted,,
";

    const CREDIT_CSV: &str = "\
Account Number,Post Date,Check,Description,Debit,Credit,Status,Balance,Classification
C44,1/29/2026,,REFUND,,5,Posted,,Shopping
";

    #[test]
    fn test_write_transactions() {
        let ledger = process(DEBIT_CSV.as_bytes(), CREDIT_CSV.as_bytes()).unwrap();
        let rows = transactions(&ledger, None, &ListingOptions::default());
        let mut buf = Vec::new();
        write_transactions(&mut buf, &rows).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Post Date,Description,Classification,Debit,Credit,Balance,Account Type");
        assert_eq!(lines[1], "2026-01-31,\"Trader Joe's, Inc\",Groceries,52.66,0.00,47399.19,debit");
        assert_eq!(lines[2], "2026-01-29,REFUND,Shopping,0.00,5.00,,credit");
        assert_eq!(lines[3], "2026-01-28,CVS,Uncategorized,25.30,0.00,,debit");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_export_to_file_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = process(DEBIT_CSV.as_bytes(), CREDIT_CSV.as_bytes()).unwrap();
        let rows = transactions(&ledger, None, &ListingOptions::default());
        let path = dir.path().join("nested").join("out.csv");
        let written = export_to_file(&path, &rows).unwrap();
        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_default_file_name() {
        let name = default_file_name();
        assert!(name.starts_with("transactions_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "transactions_YYYYMMDD.csv".len());
    }
}
