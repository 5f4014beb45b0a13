use chrono::NaiveDate;

use crate::models::{AccountType, Ledger, LedgerEntry};

/// Narrows the ledger before a view runs. Empty sets mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_types: Vec<AccountType>,
    pub categories: Vec<String>,
}

impl LedgerFilter {
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if self.from.is_some_and(|from| entry.post_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| entry.post_date > to) {
            return false;
        }
        if !self.account_types.is_empty() && !self.account_types.contains(&entry.account_type) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.iter().any(|c| c == &entry.category) {
            return false;
        }
        true
    }

    /// Requested categories that no ledger row carries.
    pub fn unknown_categories(&self, ledger: &Ledger) -> Vec<String> {
        let known = ledger.categories();
        self.categories
            .iter()
            .filter(|c| !known.contains(c))
            .cloned()
            .collect()
    }
}

/// Ledger rows passing `filter`, in ledger order.
pub fn select<'a>(
    ledger: &'a Ledger,
    filter: Option<&'a LedgerFilter>,
) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
    ledger
        .entries
        .iter()
        .filter(move |e| filter.map_or(true, |f| f.matches(e)))
}
