use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::filters::FilterSet;
use crate::fmt::describe;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// A budget entry must sit strictly within this many days of the bank date.
    pub window_days: i64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { window_days: 5 }
    }
}

#[derive(Debug)]
pub struct ReconcileResult {
    /// Unmatched bank transactions, in bank order.
    pub missing: Vec<Transaction>,
    pub matched: usize,
    pub filtered: usize,
}

/// Pairs bank transactions with budget transactions and returns the bank
/// transactions left over.
///
/// Greedy and order dependent: bank rows are visited in order and each claims
/// the closest unclaimed budget row with the same amount dated on or before
/// it. An earlier bank row may take a budget row a later one would have
/// matched better. Matches are recorded on both sides via `matching`.
pub fn reconcile(
    bank: &mut [Transaction],
    budget: &mut [Transaction],
    filters: &FilterSet,
    options: &MatchOptions,
) -> ReconcileResult {
    let mut missing = Vec::new();
    let mut matched = 0usize;
    let mut filtered = 0usize;

    for bank_idx in 0..bank.len() {
        let bank_t = &bank[bank_idx];
        if filters.is_filtered(bank_t) {
            filtered += 1;
            continue;
        }

        let candidates: Vec<usize> = budget
            .iter()
            .enumerate()
            .filter(|(_, b)| b.amount == bank_t.amount && b.matching.is_none())
            .map(|(i, _)| i)
            .collect();

        if candidates.len() > 1 {
            let listed: Vec<String> = candidates.iter().map(|&i| describe(&budget[i])).collect();
            debug!(
                "bank item {} has {} potential matches: {}",
                describe(bank_t),
                candidates.len(),
                listed.join(", ")
            );
        }

        let accepted = closest_candidate(bank_t, budget, &candidates)
            .filter(|&i| within_window(bank_t.date, budget[i].date, options.window_days));

        if candidates.len() > 1 {
            debug!(
                "bank item {} matched with {}",
                describe(bank_t),
                accepted.map_or_else(|| "nothing".to_string(), |i| describe(&budget[i]))
            );
        }

        match accepted {
            Some(budget_idx) => {
                bank[bank_idx].matching = Some(budget_idx);
                budget[budget_idx].matching = Some(bank_idx);
                matched += 1;
            }
            None => missing.push(bank[bank_idx].clone()),
        }
    }

    debug!("****************** start bank transactions: ******************");
    for t in bank.iter() {
        let partner = t.matching.map_or_else(|| "<none>".to_string(), |i| describe(&budget[i]));
        debug!("[{} (matching: {partner})]", describe(t));
    }
    debug!("****************** end bank transactions *********************");

    ReconcileResult {
        missing,
        matched,
        filtered,
    }
}

/// Smallest non-negative `bank - candidate` delta; the first candidate wins a tie.
/// Budget entries dated after the bank posting are never picked.
fn closest_candidate(bank_t: &Transaction, budget: &[Transaction], candidates: &[usize]) -> Option<usize> {
    let mut closest: Option<(usize, Duration)> = None;
    for &i in candidates {
        let delta = bank_t.date.signed_duration_since(budget[i].date);
        if delta < Duration::zero() {
            continue;
        }
        if closest.map_or(true, |(_, best)| delta < best) {
            closest = Some((i, delta));
        }
    }
    closest.map(|(i, _)| i)
}

/// `candidate` strictly inside `center ± days`. A bound that falls outside
/// chrono's date range leaves that side open.
pub fn within_window(center: NaiveDate, candidate: NaiveDate, days: i64) -> bool {
    if days <= 0 {
        return false;
    }
    let Some(window) = Duration::try_days(days) else {
        return true;
    };
    let after_lower = center
        .checked_sub_signed(window)
        .map_or(true, |lower| candidate > lower);
    let before_upper = center
        .checked_add_signed(window)
        .map_or(true, |upper| candidate < upper);
    after_lower && before_upper
}
