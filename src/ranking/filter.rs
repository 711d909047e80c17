use crate::models::RankedRecord;

/// Subset of `records` matching the completed-only toggle and a search query.
///
/// The query is trimmed and matched case-insensitively as a substring of the
/// name, the email or the decimal rank. Order is preserved.
pub fn filter_records<'a>(
    records: &'a [RankedRecord],
    query: &str,
    completed_only: bool,
) -> Vec<&'a RankedRecord> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| !completed_only || r.is_completed())
        .filter(|r| query.is_empty() || matches_query(r, &query))
        .collect()
}

fn matches_query(record: &RankedRecord, query: &str) -> bool {
    record.name().to_lowercase().contains(query)
        || record.email().to_lowercase().contains(query)
        || record.rank.to_string().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_ALL_COMPLETED, COL_BADGES, COL_EMAIL, COL_NAME, RawRecord};
    use crate::ranking::{RankingConfig, transform};

    fn board() -> Vec<RankedRecord> {
        let rows = [
            ("Ada Lovelace", "ada@calc.org", "9", "Yes"),
            ("Grace Hopper", "grace@navy.mil", "8", "No"),
            ("Alan Turing", "alan@bletchley.uk", "7", "Yes"),
        ]
        .into_iter()
        .map(|(name, email, badges, done)| {
            [
                (COL_NAME, name),
                (COL_EMAIL, email),
                (COL_BADGES, badges),
                (COL_ALL_COMPLETED, done),
            ]
            .into_iter()
            .collect::<RawRecord>()
        })
        .collect();
        transform(rows, &[], &RankingConfig::default())
    }

    fn names<'a>(records: &[&'a RankedRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn completed_only_keeps_yes_rows_in_rank_order() {
        let board = board();
        let filtered = filter_records(&board, "", true);
        assert_eq!(names(&filtered), vec!["Ada Lovelace", "Alan Turing"]);
        assert!(filtered.windows(2).all(|w| w[0].rank < w[1].rank));
    }

    #[test]
    fn empty_query_matches_everything() {
        let board = board();
        assert_eq!(filter_records(&board, "   ", false).len(), 3);
    }

    #[test]
    fn query_matches_name_case_insensitively() {
        let board = board();
        assert_eq!(names(&filter_records(&board, "  HOPPER ", false)), vec!["Grace Hopper"]);
    }

    #[test]
    fn query_matches_email_and_rank() {
        let board = board();
        assert_eq!(names(&filter_records(&board, "bletchley", false)), vec!["Alan Turing"]);
        assert_eq!(names(&filter_records(&board, "2", false)), vec!["Grace Hopper"]);
    }

    #[test]
    fn toggle_and_query_combine() {
        let board = board();
        assert!(filter_records(&board, "grace", true).is_empty());
        assert_eq!(names(&filter_records(&board, "a", true)).len(), 2);
    }

    #[test]
    fn completed_flag_must_be_exactly_yes() {
        let row: RawRecord = [
            (COL_NAME, "Case"),
            (COL_EMAIL, "case@x"),
            (COL_ALL_COMPLETED, "yes"),
        ]
        .into_iter()
        .collect();
        let board = transform(vec![row], &[], &RankingConfig::default());
        assert!(filter_records(&board, "", true).is_empty());
    }
}
