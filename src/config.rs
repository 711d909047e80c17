use crate::error::{LeaderboardError, Result};
use crate::models::RefreshInterval;
use crate::ranking::{RankingConfig, TrailingRowPolicy};
use std::env;
use std::time::Duration;

const DEFAULT_CSV: &str = "./leaderboard.csv";
const DEFAULT_DATABASE_URL: &str = "sqlite:leaderboard.db";
const DEFAULT_TOTAL_ITEMS: u32 = 16;
const DEFAULT_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    pub csv_locator: String,
    pub database_url: String,
    pub ranking: RankingConfig,
    pub refresh_interval: RefreshInterval,
    pub search_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let csv_locator = lookup("LEADERBOARD_CSV").unwrap_or_else(|| DEFAULT_CSV.to_string());
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let total_items = match lookup("LEADERBOARD_TOTAL_ITEMS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) | Err(_) => {
                    return Err(LeaderboardError::Config {
                        key: "LEADERBOARD_TOTAL_ITEMS",
                        reason: format!("expected a positive integer, got {:?}", raw),
                    });
                }
                Ok(n) => n,
            },
            None => DEFAULT_TOTAL_ITEMS,
        };

        let trailing_row = match lookup("LEADERBOARD_TRAILING_ROW").as_deref().map(str::trim) {
            None | Some("keep") => TrailingRowPolicy::Keep,
            Some("drop-nameless") => TrailingRowPolicy::DropNameless,
            Some(other) => {
                return Err(LeaderboardError::Config {
                    key: "LEADERBOARD_TRAILING_ROW",
                    reason: format!("expected `keep` or `drop-nameless`, got {:?}", other),
                });
            }
        };

        let refresh_interval = match lookup("LEADERBOARD_REFRESH_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(RefreshInterval::from_secs)
                .ok_or_else(|| LeaderboardError::Config {
                    key: "LEADERBOARD_REFRESH_SECS",
                    reason: format!("expected one of 0, 15, 30, 60, 300, got {:?}", raw),
                })?,
            None => RefreshInterval::Off,
        };

        let debounce_ms = match lookup("LEADERBOARD_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| LeaderboardError::Config {
                key: "LEADERBOARD_SEARCH_DEBOUNCE_MS",
                reason: format!("expected milliseconds, got {:?}", raw),
            })?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        Ok(Self {
            csv_locator,
            database_url,
            ranking: RankingConfig {
                total_items,
                trailing_row,
            },
            refresh_interval,
            search_debounce: Duration::from_millis(debounce_ms),
        })
    }
}
