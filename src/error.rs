use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("failed to fetch {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("preference store error: {0}")]
    Preferences(#[from] sqlx::Error),

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
