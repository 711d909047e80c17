pub mod completion;
pub mod filter;
pub mod transform;

use crate::models::RankedRecord;

pub use filter::filter_records;
pub use transform::transform;

/// What to do with the final CSV row when its name cell is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingRowPolicy {
    Keep,
    DropNameless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    /// Denominator of the completion percentage. Never zero.
    pub total_items: u32,
    pub trailing_row: TrailingRowPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            total_items: 16,
            trailing_row: TrailingRowPolicy::Keep,
        }
    }
}

// Header figures for a snapshot, always computed over the unfiltered records
#[derive(Debug, Clone)]
pub struct LeaderboardStats<'a> {
    pub registered: usize,
    pub qualified: usize,
    pub podium: &'a [RankedRecord],
}

impl<'a> LeaderboardStats<'a> {
    pub const PODIUM_SIZE: usize = 3;

    pub fn from_records(records: &'a [RankedRecord]) -> Self {
        Self {
            registered: records.len(),
            qualified: records.iter().filter(|r| r.is_completed()).count(),
            podium: &records[..records.len().min(Self::PODIUM_SIZE)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_ALL_COMPLETED, COL_BADGES, COL_EMAIL, COL_NAME, RawRecord};

    fn row(name: &str, badges: &str, done: &str) -> RawRecord {
        [
            (COL_NAME, name.to_string()),
            (COL_EMAIL, format!("{}@x", name.to_lowercase())),
            (COL_BADGES, badges.to_string()),
            (COL_ALL_COMPLETED, done.to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn stats_count_qualified_and_take_podium() {
        let ranked = transform(
            vec![
                row("A", "5", "Yes"),
                row("B", "4", "No"),
                row("C", "3", "Yes"),
                row("D", "2", "No"),
            ],
            &[],
            &RankingConfig::default(),
        );
        let stats = LeaderboardStats::from_records(&ranked);
        assert_eq!(stats.registered, 4);
        assert_eq!(stats.qualified, 2);
        let podium: Vec<&str> = stats.podium.iter().map(|r| r.name()).collect();
        assert_eq!(podium, vec!["A", "B", "C"]);
    }

    #[test]
    fn stats_on_short_board_take_what_exists() {
        let ranked = transform(vec![row("A", "1", "No")], &[], &RankingConfig::default());
        let stats = LeaderboardStats::from_records(&ranked);
        assert_eq!(stats.podium.len(), 1);

        let empty = LeaderboardStats::from_records(&[]);
        assert_eq!(empty.registered, 0);
        assert!(empty.podium.is_empty());
    }
}
