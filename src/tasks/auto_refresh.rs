use crate::models::RefreshInterval;
use log::info;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Owns the single recurring refresh timer.
///
/// Arming a new interval always aborts the previous task first, so two timers
/// never run side by side.
pub struct AutoRefresh {
    interval: RefreshInterval,
    handle: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub fn new() -> Self {
        Self {
            interval: RefreshInterval::Off,
            handle: None,
        }
    }

    pub fn interval(&self) -> RefreshInterval {
        self.interval
    }

    // `on_tick` first runs after one full period.
    pub fn set<F>(&mut self, interval: RefreshInterval, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();
        self.interval = interval;

        let Some(period) = interval.period() else {
            info!("Auto-refresh disabled");
            return;
        };

        info!("Auto-refresh every {}", interval);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick();
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.interval = RefreshInterval::Off;
    }
}

impl Default for AutoRefresh {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel();
    }
}
