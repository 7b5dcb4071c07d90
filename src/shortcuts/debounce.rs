//! Cancel-and-reschedule single-shot timer.
//!
//! Instead of spawning a timer thread, the owner's event loop checks the
//! deadline between events (via [`ShortcutDispatcher::tick`]). Re-arming
//! replaces any pending deadline.
//!
//! [`ShortcutDispatcher::tick`]: super::ShortcutDispatcher::tick

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule (or reschedule) the deadline `delay` from now.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consume an elapsed deadline. Returns true at most once per arming.
    pub fn fire(&mut self) -> bool {
        match self.deadline {
            Some(at) if Instant::now() >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
