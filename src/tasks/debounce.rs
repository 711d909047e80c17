use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Coalesces bursts of values and hands over only the latest one, after
/// `delay` has passed with no newer value.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F>(delay: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let handle = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    // Re-created every iteration, so each new value restarts the wait.
                    _ = sleep(delay), if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            on_settle(value);
                        }
                    }
                }
            }
        });
        Self { tx, handle }
    }

    pub fn push(&self, value: T) {
        // Only fails once the task is gone, i.e. during shutdown.
        let _ = self.tx.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
        let settled = Arc::new(Mutex::new(Vec::new()));
        let inner = settled.clone();
        (settled, move |value: String| inner.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_collapse_to_latest_value() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(250), on_settle);

        for query in ["a", "ad", "ada"] {
            debouncer.push(query.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(settled.lock().unwrap().is_empty());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(*settled.lock().unwrap(), vec!["ada".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_emit_separately() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(250), on_settle);

        debouncer.push("grace".to_string());
        sleep(Duration::from_millis(400)).await;
        debouncer.push(String::new());
        sleep(Duration::from_millis(400)).await;

        assert_eq!(*settled.lock().unwrap(), vec!["grace".to_string(), String::new()]);
    }
}
