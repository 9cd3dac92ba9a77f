//! Join countdown shown while the wheel is open.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use spinwheel_core::domain::CountdownTimer;

#[derive(Debug, Default)]
struct CountdownState {
    deadline: Option<Instant>,
}

/// Wall-clock countdown driven by the engagement gate.
///
/// Clones share one countdown: the state machine starts and stops it while the host
/// reads the remaining time.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    inner: Arc<Mutex<CountdownState>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().deadline.is_some()
    }

    /// Time left, or `None` when stopped.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.inner
            .lock()
            .deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// `true` exactly once, when the deadline has passed. The countdown is stopped afterwards.
    pub fn take_expired(&self) -> bool {
        self.take_expired_at(Instant::now())
    }

    pub fn take_expired_at(&self, now: Instant) -> bool {
        let mut state = self.inner.lock();
        match state.deadline {
            Some(deadline) if now >= deadline => {
                state.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn start_at(&self, now: Instant, seconds: u32) {
        self.inner.lock().deadline = Some(now + Duration::from_secs(u64::from(seconds)));
    }
}

impl CountdownTimer for Countdown {
    fn start(&mut self, seconds: u32) {
        self.start_at(Instant::now(), seconds);
        tracing::debug!("Countdown started ({}s)", seconds);
    }

    fn stop(&mut self) {
        self.inner.lock().deadline = None;
        tracing::debug!("Countdown stopped");
    }
}
