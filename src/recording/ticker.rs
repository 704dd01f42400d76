//! Whole-second ticks for the recording timer.
//!
//! egui has no timers; the frame loop polls instead.  A poll may arrive late
//! or skip a frame, so [`SecondTicker::due`] reports how many seconds have
//! elapsed since the last poll rather than a yes/no.

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct SecondTicker {
    started: Instant,
    fired: u32,
}

impl SecondTicker {
    pub fn start(now: Instant) -> Self {
        Self { started: now, fired: 0 }
    }

    /// Number of ticks that came due since the previous call.
    ///
    /// ```rust
    /// use std::time::{Duration, Instant};
    /// use panya_chat::recording::SecondTicker;
    ///
    /// let t0 = Instant::now();
    /// let mut ticker = SecondTicker::start(t0);
    /// assert_eq!(ticker.due(t0 + Duration::from_millis(900)), 0);
    /// assert_eq!(ticker.due(t0 + Duration::from_millis(2_100)), 2);
    /// assert_eq!(ticker.due(t0 + Duration::from_millis(2_500)), 0);
    /// ```
    pub fn due(&mut self, now: Instant) -> u32 {
        let total = now.saturating_duration_since(self.started).as_secs();
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        let due = total.saturating_sub(self.fired);
        self.fired = self.fired.max(total);
        due
    }
}
