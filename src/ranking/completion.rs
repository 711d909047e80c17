use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_INT: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();
}

// Leading base-10 integer of a count cell: "12abc" is 12, "3.9" is 3, "-3" is -3.
// Cells without leading digits count as 0; out-of-range values saturate.
pub fn parse_count(cell: &str) -> i64 {
    let Some(caps) = LEADING_INT.captures(cell) else {
        return 0;
    };
    let digits = &caps[1];
    digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

// Not clamped: more items than `total_items` gives >100.
pub fn percentage(badges: i64, games: i64, total_items: u32) -> f64 {
    (badges as f64 + games as f64) / f64::from(total_items) * 100.0
}

pub fn display_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}
