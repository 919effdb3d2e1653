use std::time::{Duration, Instant};

pub const DEFAULT_TICK: Duration = Duration::from_secs(3);

/// Recurring deadline polled by the event loop. At most one schedule exists
/// at a time.
#[derive(Debug, Clone)]
pub struct TimerLoop {
    period: Duration,
    next_due: Option<Instant>,
}

impl TimerLoop {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns false when already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    /// Returns false when already idle.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// True once per elapsed period. A late poll fires once and the next
    /// deadline counts from `now`; missed ticks are dropped.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, if running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for TimerLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}
