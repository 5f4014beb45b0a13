//! Reconcile a checking export and a credit-card export into one ledger and
//! derive spending summaries from it.
//!
//! ```no_run
//! use tally::ledger::process;
//! use tally::reports::{monthly_summary, merchant_ranking, DEFAULT_TOP_N};
//!
//! # fn main() -> tally::error::Result<()> {
//! let debit = std::fs::File::open("debit.csv")?;
//! let credit = std::fs::File::open("credit.csv")?;
//! let ledger = process(debit, credit)?;
//! for month in monthly_summary(&ledger, None) {
//!     println!("{} {:.2}", month.month, month.net_cash_flow);
//! }
//! let top = merchant_ranking(&ledger, None, DEFAULT_TOP_N);
//! # let _ = top;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod export;
pub mod filter;
pub mod fmt;
pub mod importer;
pub mod ledger;
pub mod models;
pub mod reconciler;
pub mod reports;
pub mod settings;
