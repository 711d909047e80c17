use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fmt;
use std::time::Duration;

pub const COL_NAME: &str = "User Name";
pub const COL_EMAIL: &str = "User Email";
pub const COL_ACCESS_CODE: &str = "Access Code Redemption Status";
pub const COL_ALL_COMPLETED: &str = "All Skill Badges & Games Completed";
pub const COL_BADGES: &str = "# of Skill Badges Completed";
pub const COL_GAMES: &str = "# of Arcade Games Completed";

// Keeps the header order of the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.get(COL_NAME)
    }

    pub fn email(&self) -> &str {
        self.get(COL_EMAIL)
    }

    pub fn access_code_status(&self) -> &str {
        self.get(COL_ACCESS_CODE)
    }

    pub fn all_completed(&self) -> &str {
        self.get(COL_ALL_COMPLETED)
    }

    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    pub badges_completed: i64,
    pub games_completed: i64,
    // unclamped
    pub percentage: f64,
    pub rank: usize,
}

impl RankedRecord {
    pub fn name(&self) -> &str {
        self.raw.name()
    }

    pub fn email(&self) -> &str {
        self.raw.email()
    }

    pub fn is_completed(&self) -> bool {
        self.raw.all_completed() == "Yes"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshInterval {
    Off,
    Seconds15,
    Seconds30,
    Seconds60,
    Seconds300,
}

impl RefreshInterval {
    pub const ALL: [RefreshInterval; 5] = [
        RefreshInterval::Off,
        RefreshInterval::Seconds15,
        RefreshInterval::Seconds30,
        RefreshInterval::Seconds60,
        RefreshInterval::Seconds300,
    ];

    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.secs() == secs)
    }

    pub fn secs(self) -> u64 {
        match self {
            RefreshInterval::Off => 0,
            RefreshInterval::Seconds15 => 15,
            RefreshInterval::Seconds30 => 30,
            RefreshInterval::Seconds60 => 60,
            RefreshInterval::Seconds300 => 300,
        }
    }

    pub fn period(self) -> Option<Duration> {
        match self {
            RefreshInterval::Off => None,
            other => Some(Duration::from_secs(other.secs())),
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshInterval::Off => write!(f, "Off"),
            RefreshInterval::Seconds15 => write!(f, "15s"),
            RefreshInterval::Seconds30 => write!(f, "30s"),
            RefreshInterval::Seconds60 => write!(f, "1m"),
            RefreshInterval::Seconds300 => write!(f, "5m"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_reads_as_empty() {
        let record: RawRecord = [(COL_NAME, "Ada")].into_iter().collect();
        assert_eq!(record.name(), "Ada");
        assert_eq!(record.email(), "");
    }

    #[test]
    fn blank_record_detection_ignores_whitespace() {
        let record: RawRecord = [(COL_NAME, "  "), (COL_EMAIL, "")].into_iter().collect();
        assert!(record.is_blank());
    }

    #[test]
    fn refresh_interval_accepts_only_listed_options() {
        assert_eq!(RefreshInterval::from_secs(0), Some(RefreshInterval::Off));
        assert_eq!(RefreshInterval::from_secs(300), Some(RefreshInterval::Seconds300));
        assert_eq!(RefreshInterval::from_secs(45), None);
        assert_eq!(RefreshInterval::Off.period(), None);
        assert_eq!(RefreshInterval::Seconds60.period(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn ranked_record_serializes_flat() {
        let raw: RawRecord = [(COL_NAME, "Ada"), (COL_EMAIL, "ada@x")].into_iter().collect();
        let ranked = RankedRecord {
            raw,
            badges_completed: 1,
            games_completed: 2,
            percentage: 18.75,
            rank: 1,
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["User Name"], "Ada");
        assert_eq!(json["rank"], 1);
        assert_eq!(json["percentage"], 18.75);
    }
}
