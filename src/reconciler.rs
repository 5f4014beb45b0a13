use chrono::{NaiveDate, TimeDelta};

use crate::models::{Transaction, TransferPair};

/// How far apart (inclusive) a card payment and its checking withdrawal may post.
pub const TRANSFER_WINDOW_DAYS: i64 = 3;

/// Largest window accepted from settings or the command line.
pub const MAX_TRANSFER_WINDOW_DAYS: i64 = 365;

/// Indices of one matched pair within the debit and credit collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMatch {
    pub debit_index: usize,
    pub credit_index: usize,
}

/// Mark credit-card payments that were funded from the checking account.
///
/// Payments (credit rows with a positive credit amount) are visited in order.
/// Each takes the first unmarked debit row, in debit order, whose debit amount
/// equals the payment exactly and whose post date lies within `window_days`
/// of the payment date. Matching is greedy: the first candidate wins even when
/// a later one is closer in time. Only `is_transfer` is modified.
pub fn identify_transfers(
    debit: &mut [Transaction],
    credit: &mut [Transaction],
    window_days: i64,
) -> Vec<TransferMatch> {
    let window = TimeDelta::try_days(window_days);
    let mut matches = Vec::new();

    for (ci, payment) in credit.iter_mut().enumerate() {
        if payment.credit_amount <= 0.0 {
            continue;
        }
        let earliest = window
            .and_then(|w| payment.post_date.checked_sub_signed(w))
            .unwrap_or(NaiveDate::MIN);
        let latest = window
            .and_then(|w| payment.post_date.checked_add_signed(w))
            .unwrap_or(NaiveDate::MAX);

        let candidate = debit.iter().position(|d| {
            !d.is_transfer
                && d.debit_amount == payment.credit_amount
                && d.post_date >= earliest
                && d.post_date <= latest
        });

        if let Some(di) = candidate {
            payment.is_transfer = true;
            debit[di].is_transfer = true;
            tracing::debug!(
                amount = payment.credit_amount,
                payment_date = %payment.post_date,
                withdrawal_date = %debit[di].post_date,
                "matched card payment to checking withdrawal"
            );
            matches.push(TransferMatch {
                debit_index: di,
                credit_index: ci,
            });
        }
    }

    matches
}

/// Describe matched pairs for display, in matching order.
pub fn describe_matches(
    debit: &[Transaction],
    credit: &[Transaction],
    matches: &[TransferMatch],
) -> Vec<TransferPair> {
    matches
        .iter()
        .filter_map(|m| {
            let d = debit.get(m.debit_index)?;
            let c = credit.get(m.credit_index)?;
            Some(TransferPair {
                amount: c.credit_amount,
                debit_date: d.post_date,
                debit_description: d.description.clone(),
                credit_date: c.post_date,
                credit_description: c.description.clone(),
            })
        })
        .collect()
}
