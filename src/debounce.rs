use std::time::{Duration, Instant};

/// Single-slot debounce timer.
///
/// Each trigger replaces any pending deadline, so a burst of events fires
/// once, one quiet period after the burst settles. The timer holds no thread
/// and no OS timer; the owner pumps `fire` from its event loop with the
/// current time.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Arms the timer, cancelling any pending deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// True exactly once when the quiet period has elapsed; clears the slot.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
