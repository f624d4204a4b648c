use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::debug;

/// Fixed-interval gate separating upstream requests.
///
/// The first call to [`Pacer::ready`] returns immediately; each later call
/// waits until `interval` has elapsed since the previous one returned.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A gate that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn ready(&mut self) {
        if !self.interval.is_zero() {
            if let Some(last) = self.last {
                let next = last + self.interval;
                if next > Instant::now() {
                    debug!("Pacing: waiting {:?} before next request", next - Instant::now());
                    time::sleep_until(next).await;
                }
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let mut pacer = Pacer::new(Duration::from_secs(1));
        let start = Instant::now();
        pacer.ready().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_calls_are_spaced_by_interval() {
        let mut pacer = Pacer::new(Duration::from_secs(1));
        let start = Instant::now();
        pacer.ready().await;
        pacer.ready().await;
        pacer.ready().await;
        assert!(Instant::now() - start >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_pacer_never_waits() {
        let mut pacer = Pacer::disabled();
        let start = Instant::now();
        for _ in 0..10 {
            pacer.ready().await;
        }
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }
}
