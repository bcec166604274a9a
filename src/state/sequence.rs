//! Request-generation guard for UI state slots.
//!
//! Each slot hands out a strictly increasing ticket when a fetch starts.
//! A response may only be applied if its ticket is still the newest one,
//! so a slow early response can never overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a fetch was started; compare against the slot's latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Supersede every outstanding ticket without starting a fetch.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// A value guarded by a [`RequestSequence`].
#[derive(Debug)]
pub struct Slot<T> {
    sequence: RequestSequence,
    value: T,
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self { sequence: RequestSequence::new(), value: T::default() }
    }
}

impl<T> Slot<T> {
    pub fn begin(&self) -> Ticket {
        self.sequence.begin()
    }

    /// Store `value` if `ticket` is still current. Returns whether it was applied.
    pub fn apply(&mut self, ticket: Ticket, value: T) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(?ticket, "dropping stale response");
            return false;
        }
        self.value = value;
        true
    }

    /// Replace the value immediately and supersede in-flight fetches.
    pub fn reset(&mut self, value: T) {
        self.sequence.invalidate();
        self.value = value;
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
#[path = "sequence_test.rs"]
mod tests;
