use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Source of delays for the probe batches.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A scheduled callback on the tokio clock. Cancelled on [`TimerHandle::cancel`] or drop.
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Run `fire` once after `delay`.
    pub fn once<F>(runtime: &Handle, delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => fire(),
            }
        });
        Self { token }
    }

    /// Run `fire` every `interval`, first after one full interval.
    pub fn repeating<F>(runtime: &Handle, interval: Duration, mut fire: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        // A zero period would make tokio's interval panic.
        let period = interval.max(Duration::from_millis(1));
        runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => fire(),
                }
            }
        });
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
