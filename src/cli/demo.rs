use std::path::PathBuf;

use chrono::{Datelike, Local, Months, NaiveDate};

use tally::error::Result;
use tally::importer::REQUIRED_COLUMNS;
use tally::settings::shellexpand_path;

const DEBIT_ACCOUNT: &str = "S09";
const CREDIT_ACCOUNT: &str = "C44";
const MONTHS: u32 = 3;

struct DemoTxn {
    day: u32,
    description: &'static str,
    amount: f64,
    category: &'static str,
}

/// Checking activity repeated every month.
const CHECKING: &[DemoTxn] = &[
    DemoTxn { day: 1, description: "PAYROLL ACME CORP", amount: 3200.00, category: "Income" },
    DemoTxn { day: 3, description: "RENT - PARKSIDE APTS", amount: -1450.00, category: "Rent" },
    DemoTxn { day: 9, description: "Trader Joe's", amount: -52.66, category: "Groceries" },
    DemoTxn { day: 15, description: "PAYROLL ACME CORP", amount: 3200.00, category: "Income" },
    DemoTxn { day: 18, description: "CVS", amount: -25.34, category: "" },
    DemoTxn { day: 22, description: "PG&E UTILITY", amount: -88.10, category: "Utilities" },
];

/// Card charges repeated every month.
const CARD: &[DemoTxn] = &[
    DemoTxn { day: 2, description: "NETFLIX.COM", amount: -15.49, category: "Entertainment" },
    DemoTxn { day: 6, description: "SHELL OIL", amount: -41.20, category: "Gas" },
    DemoTxn { day: 11, description: "Whole Foods", amount: -73.85, category: "Groceries" },
    DemoTxn { day: 14, description: "AMAZON MKTPLACE", amount: -36.99, category: "Shopping" },
    DemoTxn { day: 20, description: "CHIPOTLE", amount: -12.75, category: "Dining" },
];

/// Day the card bill is paid from checking, and how many days later the card posts it.
const PAYMENT_DAY: u32 = 25;
const PAYMENT_POSTS_AFTER: u32 = 2;

fn money_field(amount: f64) -> String {
    format!("{:.2}", amount.abs())
}

fn push_row(
    wtr: &mut csv::Writer<Vec<u8>>,
    account: &str,
    date: NaiveDate,
    description: &str,
    amount: f64,
    category: &str,
    balance: Option<f64>,
) -> Result<()> {
    let (debit, credit) = if amount < 0.0 {
        (money_field(amount), String::new())
    } else {
        (String::new(), money_field(amount))
    };
    wtr.write_record([
        account.to_string(),
        date.format("%-m/%-d/%Y").to_string(),
        String::new(),
        description.to_string(),
        debit,
        credit,
        "Posted".to_string(),
        balance.map(|b| format!("{b:.2}")).unwrap_or_default(),
        category.to_string(),
    ])?;
    Ok(())
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| tally::error::TallyError::Other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| tally::error::TallyError::Other(e.to_string()))
}

/// Build the debit and credit CSV text for the months ending with `today`'s.
pub fn build_demo(today: NaiveDate) -> Result<(String, String)> {
    let mut debit = csv::Writer::from_writer(Vec::new());
    let mut credit = csv::Writer::from_writer(Vec::new());
    debit.write_record(REQUIRED_COLUMNS)?;
    credit.write_record(REQUIRED_COLUMNS)?;

    let this_month = today.with_day(1).unwrap_or(today);
    let mut balance = 5000.0f64;
    for back in (0..MONTHS).rev() {
        let Some(month) = this_month.checked_sub_months(Months::new(back)) else {
            continue;
        };
        let on = |day: u32| month.with_day(day).unwrap_or(month);

        let mut card_total = 0.0f64;
        for t in CARD {
            card_total += t.amount.abs();
            push_row(&mut credit, CREDIT_ACCOUNT, on(t.day), t.description, t.amount, t.category, None)?;
        }
        let card_total = (card_total * 100.0).round() / 100.0;

        for t in CHECKING {
            balance += t.amount;
            push_row(&mut debit, DEBIT_ACCOUNT, on(t.day), t.description, t.amount, t.category, Some(balance))?;
        }

        // The card bill: a checking withdrawal and the matching card credit
        balance -= card_total;
        push_row(
            &mut debit,
            DEBIT_ACCOUNT,
            on(PAYMENT_DAY),
            "CARD SERVICES ONLINE PMT",
            -card_total,
            "Credit Card Payment",
            Some(balance),
        )?;
        push_row(
            &mut credit,
            CREDIT_ACCOUNT,
            on(PAYMENT_DAY + PAYMENT_POSTS_AFTER),
            "PAYMENT THANK YOU",
            card_total,
            "Payment",
            None,
        )?;
    }

    Ok((into_string(debit)?, into_string(credit)?))
}

pub fn run(dir: Option<&str>) -> Result<()> {
    let dir = PathBuf::from(dir.map(shellexpand_path).unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&dir)?;
    let (debit, credit) = build_demo(Local::now().date_naive())?;
    let debit_path = dir.join("debit.csv");
    let credit_path = dir.join("credit.csv");
    std::fs::write(&debit_path, debit)?;
    std::fs::write(&credit_path, credit)?;
    println!("Wrote {} and {}", debit_path.display(), credit_path.display());
    println!(
        "Try: tally summary --debit {} --credit {}",
        debit_path.display(),
        credit_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally::ledger::process;
    use tally::reports::category_breakdown;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_demo_is_reconciled_monthly() {
        let (debit, credit) = build_demo(today()).unwrap();
        let ledger = process(debit.as_bytes(), credit.as_bytes()).unwrap();
        assert_eq!(ledger.transfers.len(), MONTHS as usize);
        assert_eq!(ledger.len(), (CHECKING.len() + CARD.len() + 2) * MONTHS as usize);
        let months: Vec<String> = ledger.transfers.iter().map(|t| t.debit_date.format("%Y-%m").to_string()).collect();
        assert_eq!(months, vec!["2026-01", "2026-02", "2026-03"]);
    }

    #[test]
    fn test_demo_has_uncategorized_rows() {
        let (debit, credit) = build_demo(today()).unwrap();
        let ledger = process(debit.as_bytes(), credit.as_bytes()).unwrap();
        let cats = category_breakdown(&ledger, None, None);
        assert!(cats.iter().any(|c| c.category == "Uncategorized"));
        assert!(cats.iter().all(|c| c.category != "Credit Card Payment"));
    }

    #[test]
    fn test_run_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("demo");
        run(Some(target.to_str().unwrap())).unwrap();
        assert!(target.join("debit.csv").exists());
        assert!(target.join("credit.csv").exists());
    }
}
