//! Trailing-edge debounce for the search box.
//!
//! [`Debouncer`] is the clock-driven core: every push replaces the pending
//! value and moves its deadline to `now + delay`, so only the last value of a
//! burst survives. [`spawn_debounced`] runs one on a tokio task, fed by an
//! unbounded channel and publishing applied values on a `watch` channel.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records `value` as the latest input seen at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending value once its deadline has passed.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

/// Spawns a debounce task.
///
/// Values sent on the returned sender are published on the returned receiver
/// `delay` after the last of a burst. The task ends, discarding any pending
/// value, when the sender is dropped or every receiver is gone.
pub fn spawn_debounced<T>(
    delay: Duration,
    initial: T,
) -> (mpsc::UnboundedSender<T>, watch::Receiver<T>)
where
    T: Send + Sync + 'static,
{
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<T>();
    let (output_tx, output_rx) = watch::channel(initial);

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(delay);
        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                received = input_rx.recv() => match received {
                    Some(value) => debouncer.push(value, Instant::now()),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(value) = debouncer.take_ready(Instant::now()) {
                        trace!("Debounced value applied");
                        if output_tx.send(value).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    (input_tx, output_rx)
}

/// Debounced search term channel, starting from an empty term.
pub fn spawn_search_debounce(
    delay: Duration,
) -> (mpsc::UnboundedSender<String>, watch::Receiver<String>) {
    spawn_debounced(delay, String::new())
}
