use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::engine::Engine;

/// Default delay between drain passes (2 seconds).
pub const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_millis(2000);

/// Background task draining an [`Engine`] on a fixed interval.
///
/// The first tick fires immediately. A tick that finds the backlog empty
/// does nothing.
#[derive(Debug)]
pub struct DrainLoop {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl DrainLoop {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero.
    pub fn spawn(engine: Arc<Engine>, every: Duration) -> Self {
        let (shutdown, mut stop) = oneshot::channel();
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            tracing::debug!(interval_ms = every.as_millis() as u64, "drain loop started");
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = interval.tick() => {
                        if engine.pending() > 0 {
                            engine.drain().await;
                        }
                    }
                }
            }
            tracing::debug!("drain loop stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop the loop. A pass already in progress runs to completion first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "drain loop task ended abnormally");
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
