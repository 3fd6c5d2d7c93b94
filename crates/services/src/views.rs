//! View-count throttling.
//!
//! A topic view bumps `views_count` at most once per (topic, viewer) per
//! window. Tracking is in-process and resets on restart; anonymous viewers
//! are never counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// Sweep cadence: every N `should_count` calls, expired entries are dropped
/// so the map does not grow without bound.
const SWEEP_EVERY: u64 = 4096;

pub struct ViewTracker {
    window: Duration,
    seen: DashMap<(Uuid, Uuid), Instant>,
    calls: AtomicU64,
}

impl ViewTracker {
    /// 30 minutes: one view per viewer per sitting, roughly.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30 * 60);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: DashMap::new(),
            calls: AtomicU64::new(0),
        }
    }

    /// Returns true when this (topic, viewer) pair has not been counted
    /// within the window, and records the view.
    pub fn should_count(&self, topic_id: Uuid, viewer_id: Uuid) -> bool {
        let now = Instant::now();

        if self.calls.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            let window = self.window;
            self.seen
                .retain(|_, last| now.duration_since(*last) < window);
        }

        match self.seen.entry((topic_id, viewer_id)) {
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
            Entry::Occupied(mut slot) => {
                if now.duration_since(*slot.get()) >= self.window {
                    slot.insert(now);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Default for ViewTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
