pub mod demo;
pub mod export;
pub mod init;
pub mod report;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use tally::error::{Result, TallyError};
use tally::filter::LedgerFilter;
use tally::ledger::process_files;
use tally::models::{AccountType, Ledger};
use tally::reports::{ListingOptions, SortOrder, TxnKind};
use tally::settings::Settings;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Reconcile checking and credit-card exports into one ledger and summarize spending."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Checking (debit) account CSV export
    #[arg(long)]
    pub debit: PathBuf,
    /// Credit card account CSV export
    #[arg(long)]
    pub credit: PathBuf,
}

impl SourceArgs {
    pub fn load(&self, settings: &Settings) -> Result<Ledger> {
        process_files(&self.debit, &self.credit, settings.transfer_window_days)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date: YYYY-MM-DD (inclusive)
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD (inclusive)
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Limit to an account type (repeatable)
    #[arg(long = "account", value_parser = ["debit", "credit"])]
    pub accounts: Vec<String>,
    /// Limit to a category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
}

fn parse_iso_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TallyError::Other(format!("{flag} expects YYYY-MM-DD, got {raw:?}")))
}

impl FilterArgs {
    /// None when no filter flag was given.
    pub fn to_filter(&self) -> Result<Option<LedgerFilter>> {
        let filter = LedgerFilter {
            from: self.from_date.as_deref().map(|d| parse_iso_date("--from", d)).transpose()?,
            to: self.to_date.as_deref().map(|d| parse_iso_date("--to", d)).transpose()?,
            account_types: self
                .accounts
                .iter()
                .map(|a| a.parse::<AccountType>())
                .collect::<Result<Vec<_>>>()?,
            categories: self.categories.clone(),
        };
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(TallyError::Other(format!("--from {from} is after --to {to}")));
            }
        }
        if filter == LedgerFilter::default() {
            Ok(None)
        } else {
            Ok(Some(filter))
        }
    }
}

/// Parse the filter flags, then load the ledger.
pub fn load_filtered(
    source: &SourceArgs,
    filter: &FilterArgs,
    settings: &Settings,
) -> Result<(Ledger, Option<LedgerFilter>)> {
    let filter = filter.to_filter()?;
    let ledger = source.load(settings)?;
    if let Some(f) = &filter {
        for category in f.unknown_categories(&ledger) {
            tracing::warn!("no transactions in category {category:?}");
        }
    }
    Ok((ledger, filter))
}

#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// Include matched card payments and their checking withdrawals
    #[arg(long = "show-transfers")]
    pub show_transfers: bool,
    /// Which rows to list
    #[arg(long, default_value = "all", value_parser = ["all", "expenses", "income"])]
    pub kind: String,
    /// Row order
    #[arg(
        long,
        default_value = "date-desc",
        value_parser = ["date-desc", "date-asc", "amount-desc", "amount-asc"]
    )]
    pub sort: String,
}

impl ListingArgs {
    pub fn to_options(&self) -> ListingOptions {
        let kind = match self.kind.as_str() {
            "expenses" => TxnKind::Expenses,
            "income" => TxnKind::Income,
            _ => TxnKind::All,
        };
        let sort = match self.sort.as_str() {
            "date-asc" => SortOrder::DateAsc,
            "amount-desc" => SortOrder::AmountDesc,
            "amount-asc" => SortOrder::AmountAsc,
            _ => SortOrder::DateDesc,
        };
        ListingOptions {
            show_transfers: self.show_transfers,
            kind,
            sort,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income, expenses, savings rate, and debit vs. credit spending.
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Monthly income, expenses, and net cash flow.
    Monthly {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Spending by category.
    Categories {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Only this month: YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    /// Top merchants by spending.
    Merchants {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of merchants to show (default from settings)
        #[arg(long)]
        top: Option<usize>,
    },
    /// Spending on the checking account vs. the credit card.
    Accounts {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Card payments matched to checking withdrawals.
    Transfers {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List transactions.
    Transactions {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Write listed transactions to CSV.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        listing: ListingArgs,
        /// Output path (default: <export_dir>/transactions_YYYYMMDD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Write a sample debit.csv and credit.csv pair to explore tally.
    Demo {
        /// Directory to write into (default: current directory)
        #[arg(long)]
        dir: Option<String>,
    },
    /// Write the settings file.
    Init {
        /// Default directory for CSV exports
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Default number of merchants to rank
        #[arg(long = "top-n")]
        top_n: Option<usize>,
        /// Days a card payment may post before/after its checking withdrawal
        #[arg(long = "transfer-window")]
        transfer_window_days: Option<i64>,
    },
}

pub fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Summary { source, filter } => report::summary(&source, &filter, settings),
        Commands::Monthly { source, filter } => report::monthly(&source, &filter, settings),
        Commands::Categories { source, filter, month } => {
            report::categories(&source, &filter, month.as_deref(), settings)
        }
        Commands::Merchants { source, filter, top } => {
            report::merchants(&source, &filter, top.unwrap_or(settings.top_n), settings)
        }
        Commands::Accounts { source, filter } => report::accounts(&source, &filter, settings),
        Commands::Transfers { source } => report::transfers(&source, settings),
        Commands::Transactions { source, filter, listing } => {
            report::transactions(&source, &filter, &listing, settings)
        }
        Commands::Export { source, filter, listing, output } => {
            export::run(&source, &filter, &listing, output.as_deref(), settings)
        }
        Commands::Demo { dir } => demo::run(dir.as_deref()),
        Commands::Init { export_dir, top_n, transfer_window_days } => {
            init::run(settings, export_dir, top_n, transfer_window_days)
        }
    }
}
