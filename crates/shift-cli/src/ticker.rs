//! A cancellable repeating timer task.
//!
//! The timer controller's tick is the only autonomous activity in the
//! system. It is modeled as an explicit task with a start/cancel pair
//! rather than an implicit interval tied to anything's lifetime, so a
//! finished session can guarantee no tick leaks past it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running repeating task.
///
/// Dropping the handle stops the task (the shutdown channel closes);
/// [`Ticker::cancel`] additionally waits for it to finish so no tick runs
/// afterwards.
pub struct Ticker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawns a task invoking `on_tick` once per `period`.
    ///
    /// The first invocation happens one full period after the call, not
    /// immediately. Must be called within a tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, mut cancelled) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; skip it so the
            // counter only advances after a full period.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => on_tick(),
                    _ = cancelled.changed() => break,
                }
            }
        });
        Self { shutdown, handle }
    }

    /// Stops the task and waits for it to finish.
    pub async fn cancel(self) {
        // Receiver can only be gone if the task already exited.
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
