//! Cancellable timers.
//!
//! Delayed widget actions (debounced validation, panel auto-open/close,
//! alert dismissal) are expressed as events scheduled on a [`Scheduler`].
//! The host delivers fired events back to the widget on its own loop, so all
//! state changes stay on one logical thread.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Schedules events for later delivery.
pub trait Scheduler<E>: Send + Sync {
    /// Delivers `event` after `delay` unless cancelled first.
    fn schedule(&self, delay: Duration, event: E) -> TimerId;

    /// Cancels a pending timer. Unknown or already fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Coalesces rapid triggers: each trigger cancels the previous pending one.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<TimerId>,
    delay: Duration,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: None,
            delay,
        }
    }

    pub fn trigger<E>(&mut self, scheduler: &dyn Scheduler<E>, event: E) -> TimerId {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        let id = scheduler.schedule(self.delay, event);
        self.pending = Some(id);
        id
    }

    /// Forgets the pending timer once its event has been delivered.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Debug)]
struct ManualTimer<E> {
    due: Duration,
    event: E,
}

#[derive(Debug)]
struct ManualState<E> {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, ManualTimer<E>>,
}

/// A scheduler driven by an explicit virtual clock.
///
/// Nothing fires on its own: [`ManualScheduler::advance`] moves the clock
/// forward and returns the events that became due, in due order.
#[derive(Debug)]
pub struct ManualScheduler<E> {
    state: Mutex<ManualState<E>>,
}

impl<E> ManualScheduler<E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualState {
                now: Duration::ZERO,
                next_id: 1,
                timers: BTreeMap::new(),
            }),
        }
    }

    /// Advances the virtual clock and drains the timers due by then.
    pub fn advance(&self, by: Duration) -> Vec<(TimerId, E)> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.now += by;
        let now = state.now;

        let due_ids: Vec<TimerId> = state
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(id, _)| *id)
            .collect();

        let mut fired: Vec<(Duration, TimerId, E)> = due_ids
            .into_iter()
            .filter_map(|id| state.timers.remove(&id).map(|t| (t.due, id, t.event)))
            .collect();
        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, id, event)| (id, event)).collect()
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .timers
            .len()
    }
}

impl<E> Default for ManualScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send> Scheduler<E> for ManualScheduler<E> {
    fn schedule(&self, delay: Duration, event: E) -> TimerId {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let due = state.now + delay;
        state.timers.insert(id, ManualTimer { due, event });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.timers.remove(&id);
    }
}
