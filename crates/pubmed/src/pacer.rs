use std::time::Duration;
use tokio::time::Instant;

/// Keeps consecutive requests at least `interval` apart
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may go out, then mark it as sent
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let ready_at = last + self.interval;
            if Instant::now() < ready_at {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
