use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;

use crate::render::ElementId;

/// Delay before a click highlight and its forced tooltip revert.
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(1000);

/// Pending one-shot reverts keyed by element.
///
/// Time is supplied by the host as a monotonic offset, so expiry is
/// deterministic. Scheduling a revert cancels every pending one first: at most
/// one revert is outstanding and an older timer can never hide a newer
/// tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightTimers {
    delay: Duration,
    pending: BTreeMap<ElementId, Duration>,
}

impl Default for HighlightTimers {
    fn default() -> Self {
        Self::new(DEFAULT_REVERT_DELAY)
    }
}

impl HighlightTimers {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a revert for `element` at `now + delay`.
    ///
    /// Returns the elements whose pending reverts were cancelled, which the
    /// caller must revert immediately.
    pub fn schedule(&mut self, element: ElementId, now: Duration) -> Vec<ElementId> {
        let cancelled: Vec<ElementId> = std::mem::take(&mut self.pending).into_keys().collect();
        let due_at = now.saturating_add(self.delay);
        trace!(
            element = element.0,
            due_at_ms = due_at.as_millis() as u64,
            cancelled = cancelled.len(),
            "schedule highlight revert"
        );
        self.pending.insert(element, due_at);
        cancelled
    }

    /// Cancels the pending revert of `element`. Returns whether one existed.
    pub fn cancel(&mut self, element: ElementId) -> bool {
        self.pending.remove(&element).is_some()
    }

    /// Removes and returns every revert due at or before `now`.
    pub fn expire(&mut self, now: Duration) -> Vec<ElementId> {
        let expired: Vec<ElementId> = self
            .pending
            .iter()
            .filter(|(_, due_at)| **due_at <= now)
            .map(|(element, _)| *element)
            .collect();
        for element in &expired {
            self.pending.remove(element);
        }
        expired
    }

    #[must_use]
    pub fn due_at(&self, element: ElementId) -> Option<Duration> {
        self.pending.get(&element).copied()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
