use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TallyError;

/// Which export a row came from. Assigned at ingestion, never read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Debit,
    Credit,
}

impl AccountType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AccountType {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(TallyError::Other(format!(
                "Unknown account type: {other} (expected debit or credit)"
            ))),
        }
    }
}

/// One normalized row of a single account's export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub account_number: String,
    pub post_date: NaiveDate,
    pub check: Option<String>,
    pub description: String,
    pub debit_amount: f64,
    pub credit_amount: f64,
    pub status: String,
    pub balance: Option<f64>,
    /// Left as found in the file; normalized during ledger assembly.
    pub category: Option<String>,
    pub account_type: AccountType,
    pub is_transfer: bool,
}

pub const UNCATEGORIZED: &str = "Uncategorized";

/// A ledger row: a reconciled transaction plus the fields derived at assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub account_number: String,
    pub post_date: NaiveDate,
    pub check: Option<String>,
    pub description: String,
    pub debit_amount: f64,
    pub credit_amount: f64,
    pub status: String,
    pub balance: Option<f64>,
    pub category: String,
    pub account_type: AccountType,
    pub is_transfer: bool,
    pub net_amount: f64,
}

impl LedgerEntry {
    pub fn from_transaction(txn: Transaction) -> Self {
        let category = match txn.category {
            Some(c) if !c.trim().is_empty() => c,
            _ => UNCATEGORIZED.to_string(),
        };
        Self {
            net_amount: txn.credit_amount - txn.debit_amount,
            account_number: txn.account_number,
            post_date: txn.post_date,
            check: txn.check,
            description: txn.description,
            debit_amount: txn.debit_amount,
            credit_amount: txn.credit_amount,
            status: txn.status,
            balance: txn.balance,
            category,
            account_type: txn.account_type,
            is_transfer: txn.is_transfer,
        }
    }

    /// Calendar month key, e.g. "2026-01".
    pub fn month(&self) -> String {
        self.post_date.format("%Y-%m").to_string()
    }

    pub fn is_expense(&self) -> bool {
        self.debit_amount > 0.0
    }

    pub fn is_income(&self) -> bool {
        self.credit_amount > 0.0
    }
}

/// A credit-card payment matched against the checking withdrawal that funded it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPair {
    pub amount: f64,
    pub debit_date: NaiveDate,
    pub debit_description: String,
    pub credit_date: NaiveDate,
    pub credit_description: String,
}

/// The unified, date-descending transaction set for both accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
    pub transfers: Vec<TransferPair>,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.entries.iter().map(|e| e.post_date).min()?;
        let max = self.entries.iter().map(|e| e.post_date).max()?;
        Some((min, max))
    }

    /// Distinct categories in first-seen ledger order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !seen.iter().any(|c| c == &entry.category) {
                seen.push(entry.category.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(category: Option<&str>, debit: f64, credit: f64) -> Transaction {
        Transaction {
            account_number: "S09".to_string(),
            post_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            check: None,
            description: "Trader Joe's".to_string(),
            debit_amount: debit,
            credit_amount: credit,
            status: "Posted".to_string(),
            balance: Some(47399.19),
            category: category.map(str::to_string),
            account_type: AccountType::Debit,
            is_transfer: false,
        }
    }

    #[test]
    fn test_entry_computes_net_amount() {
        let e = LedgerEntry::from_transaction(txn(Some("Groceries"), 52.66, 0.0));
        assert_eq!(e.net_amount, -52.66);
        let e = LedgerEntry::from_transaction(txn(Some("Income"), 0.0, 100.0));
        assert_eq!(e.net_amount, 100.0);
    }

    #[test]
    fn test_entry_normalizes_blank_category() {
        assert_eq!(LedgerEntry::from_transaction(txn(None, 1.0, 0.0)).category, UNCATEGORIZED);
        assert_eq!(LedgerEntry::from_transaction(txn(Some("  "), 1.0, 0.0)).category, UNCATEGORIZED);
        assert_eq!(LedgerEntry::from_transaction(txn(Some("Pharmacy"), 1.0, 0.0)).category, "Pharmacy");
    }

    #[test]
    fn test_month_key() {
        let e = LedgerEntry::from_transaction(txn(None, 1.0, 0.0));
        assert_eq!(e.month(), "2026-01");
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!("debit".parse::<AccountType>().unwrap(), AccountType::Debit);
        assert_eq!(" Credit ".parse::<AccountType>().unwrap(), AccountType::Credit);
        assert!("savings".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_ledger_categories_first_seen_order() {
        let mut late = txn(Some("Groceries"), 1.0, 0.0);
        late.post_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let ledger = Ledger {
            entries: vec![
                LedgerEntry::from_transaction(txn(Some("Pharmacy"), 1.0, 0.0)),
                LedgerEntry::from_transaction(txn(None, 1.0, 0.0)),
                LedgerEntry::from_transaction(txn(Some("Pharmacy"), 2.0, 0.0)),
                LedgerEntry::from_transaction(late),
            ],
            transfers: Vec::new(),
        };
        assert_eq!(ledger.categories(), vec!["Pharmacy", UNCATEGORIZED, "Groceries"]);
        assert!(Ledger::default().categories().is_empty());
    }
}
