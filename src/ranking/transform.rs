use crate::models::{COL_BADGES, COL_GAMES, RankedRecord, RawRecord};
use crate::ranking::completion::{parse_count, percentage};
use crate::ranking::{RankingConfig, TrailingRowPolicy};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Turns one CSV snapshot into ranked records.
///
/// `previous` is the snapshot currently on display (empty on first load). It
/// only affects the order of records with equal percentages: two tied
/// participants that were both on the previous board keep their previous
/// relative order, otherwise they are ordered by name, ignoring case.
pub fn transform(
    raw: Vec<RawRecord>,
    previous: &[RankedRecord],
    config: &RankingConfig,
) -> Vec<RankedRecord> {
    let mut raw = raw;
    if config.trailing_row == TrailingRowPolicy::DropNameless
        && raw.last().is_some_and(|last| last.name().is_empty())
    {
        raw.pop();
    }

    let mut ranked: Vec<RankedRecord> = raw
        .into_iter()
        .filter(|record| !(record.name().is_empty() && record.email().is_empty()))
        .map(|record| derive(record, config.total_items))
        .collect();

    // Percentages are finite (total_items > 0), so this order is total.
    ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let previous_positions = previous_positions(previous);
    let mut start = 0;
    while start < ranked.len() {
        let pct = ranked[start].percentage;
        let end = ranked[start..]
            .iter()
            .position(|r| r.percentage != pct)
            .map_or(ranked.len(), |offset| start + offset);
        order_ties(&mut ranked[start..end], &previous_positions);
        start = end;
    }

    for (i, record) in ranked.iter_mut().enumerate() {
        record.rank = i + 1;
    }
    ranked
}

fn derive(raw: RawRecord, total_items: u32) -> RankedRecord {
    let badges_completed = parse_count(raw.get(COL_BADGES));
    let games_completed = parse_count(raw.get(COL_GAMES));
    RankedRecord {
        percentage: percentage(badges_completed, games_completed, total_items),
        raw,
        badges_completed,
        games_completed,
        rank: 0,
    }
}

// First position of each email on the previous board; blank emails are not identities.
fn previous_positions(previous: &[RankedRecord]) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(previous.len());
    for (i, record) in previous.iter().enumerate() {
        if !record.email().is_empty() {
            positions.entry(record.email()).or_insert(i);
        }
    }
    positions
}

fn tie_break(a: &RankedRecord, b: &RankedRecord, previous: &HashMap<&str, usize>) -> Ordering {
    match (previous.get(a.email()), previous.get(b.email())) {
        (Some(pa), Some(pb)) => pa.cmp(pb),
        _ => compare_names(a.name(), b.name()),
    }
}

// Case-insensitive first; the raw comparison only separates names that differ in case.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// The tie-break mixes two orders and is not guaranteed to be transitive, which
// slice::sort_by may reject. A stable insertion sort accepts any comparator.
fn order_ties(group: &mut [RankedRecord], previous: &HashMap<&str, usize>) {
    for i in 1..group.len() {
        let mut j = i;
        while j > 0 && tie_break(&group[j - 1], &group[j], previous) == Ordering::Greater {
            group.swap(j - 1, j);
            j -= 1;
        }
    }
}
