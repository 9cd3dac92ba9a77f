//! Engagement gate: whether join commands are currently accepted.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// External countdown shown while joins are open.
///
/// The wheel only starts and stops it; counting down is up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait CountdownTimer: Send {
    /// Reset the countdown to `seconds` and start it.
    fn start(&mut self, seconds: u32);

    /// Stop the countdown.
    fn stop(&mut self);
}

/// Countdown that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCountdown;

impl CountdownTimer for NoopCountdown {
    fn start(&mut self, _seconds: u32) {}

    fn stop(&mut self) {}
}

/// Shared "open for joins" flag.
///
/// Written by the simulation thread and read by the chat receive thread. Clones share
/// the same flag.
#[derive(Debug, Clone, Default)]
pub struct EngagementGate {
    open: Arc<AtomicBool>,
}

impl EngagementGate {
    /// New gate, closed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Set the gate, driving `timer` on an actual change only.
    ///
    /// Opening starts the countdown with `countdown_secs`; closing stops it.
    /// Setting the current value again has no effect. Returns `true` if the gate changed.
    pub fn set_open(&self, open: bool, timer: &mut dyn CountdownTimer, countdown_secs: u32) -> bool {
        let was_open = self.open.swap(open, Ordering::AcqRel);
        if was_open == open {
            return false;
        }

        if open {
            timer.start(countdown_secs);
        } else {
            timer.stop();
        }
        tracing::info!(
            "Join state changed to {}",
            if open { "OPEN" } else { "CLOSED" }
        );

        true
    }
}
