use crate::error::Result;
use crate::loader::CsvLoader;
use crate::models::RankedRecord;
use crate::ranking::{RankingConfig, transform};
use chrono::{DateTime, Local};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Arc<Vec<RankedRecord>>,
    // 0 before the first commit
    pub sequence: u64,
    pub updated_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed { sequence: u64, participants: usize },
    Stale { sequence: u64, current: u64 },
}

// Loads are never cancelled, so a slow load can finish after a newer one. Each
// refresh takes its sequence number before fetching and only commits if
// nothing newer has been committed in the meantime.
pub struct Leaderboard {
    loader: CsvLoader,
    ranking: RankingConfig,
    next_sequence: AtomicU64,
    current: Mutex<Snapshot>,
}

impl Leaderboard {
    pub fn new(loader: CsvLoader, ranking: RankingConfig) -> Self {
        Self {
            loader,
            ranking,
            next_sequence: AtomicU64::new(0),
            current: Mutex::new(Snapshot::default()),
        }
    }

    pub fn locator(&self) -> &str {
        self.loader.locator()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // On error the current snapshot is untouched.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let raw = self.loader.load().await?;
        let previous = self.snapshot();
        let ranked = transform(raw, &previous.records, &self.ranking);
        Ok(self.commit(sequence, ranked))
    }

    fn commit(&self, sequence: u64, records: Vec<RankedRecord>) -> RefreshOutcome {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if sequence <= current.sequence {
            debug!(
                "Discarding stale load #{} (snapshot is already at #{})",
                sequence, current.sequence
            );
            return RefreshOutcome::Stale {
                sequence,
                current: current.sequence,
            };
        }

        let participants = records.len();
        *current = Snapshot {
            records: Arc::new(records),
            sequence,
            updated_at: Some(Local::now()),
        };
        RefreshOutcome::Committed {
            sequence,
            participants,
        }
    }
}
