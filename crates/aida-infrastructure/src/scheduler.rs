//! Tokio-backed timers delivering events into a channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aida_core::scheduler::{Scheduler, TimerId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns one sleeping task per timer; firing sends the event to the
/// receiver returned by [`TokioScheduler::new`].
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler<E> {
    sender: mpsc::UnboundedSender<E>,
    timers: Arc<Mutex<HashMap<TimerId, JoinHandle<()>>>>,
    next_id: AtomicU64,
}

impl<E: Send + 'static> TokioScheduler<E> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            sender,
            timers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        };
        (scheduler, receiver)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<E: Send + 'static> Scheduler<E> for TokioScheduler<E> {
    fn schedule(&self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let sender = self.sender.clone();
        let timers = Arc::clone(&self.timers);

        // Hold the lock across spawn so the task cannot remove its entry
        // before it has been inserted.
        let mut guard = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            timers
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&id);
            if sender.send(event).is_err() {
                tracing::debug!("[Scheduler] Receiver dropped, timer {:?} discarded", id);
            }
        });
        guard.insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) {
        let handle = self
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl<E> Drop for TokioScheduler<E> {
    fn drop(&mut self) {
        let timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        for handle in timers.values() {
            handle.abort();
        }
    }
}
