//! Sliding-window transmit-airtime governor.
//!
//! Tracks cumulative transmit time within a rolling window and silently
//! withholds further sends once a configured permillage of that window has
//! been spent on air. Airtime is charged edge-triggered: the radio's async
//! "currently transmitting" flag is observed once per tick, and a duration
//! is only added to the budget on its falling edge (when a transmission we
//! started actually finishes).

use std::time::{Duration, Instant};

use crate::core::constants::{
    DEFAULT_DUTY_PERMILLAGE, DEFAULT_DUTY_WINDOW_SECS, DUTY_PERMILLAGE_MAX, DUTY_PERMILLAGE_MIN,
    DUTY_WINDOW_MAX_SECS, DUTY_WINDOW_MIN_SECS,
};

/// Sliding-window duty-cycle budget tracker.
#[derive(Debug)]
pub struct DutyCycleGovernor {
    window: Duration,
    tx_time_max: Duration,
    window_start: Instant,
    tx_time: Duration,
    tx_on: bool,
    tx_start: Instant,
    exceeded: bool,
}

fn clamp_window_secs(secs: u64) -> u64 {
    secs.clamp(DUTY_WINDOW_MIN_SECS, DUTY_WINDOW_MAX_SECS)
}

fn clamp_permillage(permillage: u32) -> u32 {
    permillage.clamp(DUTY_PERMILLAGE_MIN, DUTY_PERMILLAGE_MAX)
}

fn tx_time_max(window: Duration, permillage: u32) -> Duration {
    window * permillage / 1000
}

impl Default for DutyCycleGovernor {
    fn default() -> Self {
        Self::new(DEFAULT_DUTY_WINDOW_SECS, DEFAULT_DUTY_PERMILLAGE)
    }
}

impl DutyCycleGovernor {
    /// Build a governor with `window_secs` rolling window and `permillage`
    /// (tenths of a percent) of it available for transmission. Both
    /// parameters are clamped to their legal ranges.
    pub fn new(window_secs: u64, permillage: u32) -> Self {
        let window = Duration::from_secs(clamp_window_secs(window_secs));
        let permillage = clamp_permillage(permillage);
        let now = Instant::now();
        Self {
            window,
            tx_time_max: tx_time_max(window, permillage),
            window_start: now,
            tx_time: Duration::ZERO,
            tx_on: false,
            tx_start: now,
            exceeded: false,
        }
    }

    /// Reconfigure the window/budget. Does not reset accumulated airtime or
    /// the exceeded latch; the new budget takes effect at the next window
    /// rollover.
    pub fn set_duty_cycle(&mut self, window_secs: u64, permillage: u32) {
        self.window = Duration::from_secs(clamp_window_secs(window_secs));
        self.tx_time_max = tx_time_max(self.window, clamp_permillage(permillage));
    }

    /// Whether this window's budget has been exhausted.
    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    /// Advance the governor's state. `tx_on_now` is the radio's current
    /// "is transmitting" signal, sampled once per dispatcher tick.
    pub fn tick(&mut self, now: Instant, tx_on_now: bool) {
        if now.duration_since(self.window_start) >= self.window {
            self.window_start = now;
            if self.exceeded {
                // Debt carries into the next window rather than being
                // forgiven outright: a peer that maxed out one window stays
                // locked out until enough windows roll by to absorb the
                // overage. This is intentional, not a bug (see DESIGN.md).
                self.tx_time = self.tx_time.saturating_sub(self.tx_time_max);
                self.exceeded = self.tx_time >= self.tx_time_max;
            } else {
                self.tx_time = Duration::ZERO;
            }
            // The original firmware's _duty_cycle() forces _dc_tx_on = false
            // before re-polling isTransmitting() on every window boundary, so
            // a burst straddling the boundary is split in two: only the
            // post-boundary portion is ever charged to the new window. Force
            // the same re-arm here so the in-progress-burst branch below
            // starts a fresh tx_start at `now` instead of carrying the whole
            // burst's elapsed time into this window.
            self.tx_on = false;
        }

        if tx_on_now != self.tx_on {
            self.tx_on = tx_on_now;
            if tx_on_now {
                self.tx_start = now;
            } else {
                self.tx_time += now.duration_since(self.tx_start);
                if self.tx_time >= self.tx_time_max {
                    self.exceeded = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_clamps_to_legal_range() {
        let gov = DutyCycleGovernor::new(1, 5000);
        assert_eq!(gov.window, Duration::from_secs(DUTY_WINDOW_MIN_SECS));
        assert_eq!(gov.tx_time_max, gov.window * DUTY_PERMILLAGE_MAX / 1000);
    }

    #[test]
    fn exceeding_budget_blocks_until_rollover() {
        let mut gov = DutyCycleGovernor::new(10, 500); // 5s budget per 10s window
        let t0 = Instant::now();
        gov.tick(t0, true);
        assert!(!gov.exceeded());
        let t1 = t0 + Duration::from_secs(6);
        gov.tick(t1, false);
        assert!(gov.exceeded());

        // Still exceeded well inside the same window.
        gov.tick(t1 + Duration::from_secs(1), false);
        assert!(gov.exceeded());

        // A window rollover with debt carryover below tx_time_max clears it.
        let t2 = t0 + Duration::from_secs(11);
        gov.tick(t2, false);
        assert!(!gov.exceeded());
    }

    #[test]
    fn burst_spanning_rollover_is_truncated_at_the_boundary() {
        let mut gov = DutyCycleGovernor::new(10, 500); // 5s budget per 10s window
        let t0 = Instant::now();

        // Burst starts 1s before the window rolls over...
        let tx_start = t0 + Duration::from_secs(9);
        gov.tick(tx_start, true);
        assert_eq!(gov.tx_time, Duration::ZERO);

        // ...and the rollover lands mid-burst: tx_on_now is still true, so the
        // re-arm must immediately restart tx_start at the boundary rather
        // than leaving it dangling at `tx_start`.
        let rollover = t0 + Duration::from_secs(10);
        gov.tick(rollover, true);
        assert_eq!(gov.tx_start, rollover);
        assert_eq!(gov.tx_time, Duration::ZERO);

        // Burst ends 4s after the boundary. If the full 5s (9s..13s) were
        // charged to the new window it would exceed the 5s budget; truncated
        // to the post-boundary 4s, it must not.
        let tx_end = rollover + Duration::from_secs(4);
        gov.tick(tx_end, false);
        assert_eq!(gov.tx_time, Duration::from_secs(4));
        assert!(!gov.exceeded());
    }
}
