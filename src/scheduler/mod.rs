//! Randomized-backoff handshake retry policy.
//!
//! Every tick scans the peer table once for the first peer whose retry is
//! due, (re)initiates a handshake with it, and reschedules; a full pass
//! that finds nothing due backs off to a longer poll interval. This mirrors
//! the original firmware's single-peer-per-tick scan exactly rather than
//! retrying every due peer at once, so a misbehaving peer can't starve the
//! rest of the table.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::constants::{
    RESET_BACKOFF_STEP_MS, RESET_JITTER_MS, RESET_SCAN_EMPTY_MS, RESET_SCAN_FOUND_MS,
    RESET_SCAN_POST_HANDSHAKE_MS, RESET_TRIAL_MAX, SESSION_LEN,
};
use crate::peer::{Node, ResetSchedule};

/// Drives when, and with whom, the engine (re-)initiates a handshake.
#[derive(Debug)]
pub struct Scheduler {
    last_scan: Instant,
    next_wake: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// A fresh scheduler scans immediately on the first `tick`.
    pub fn new() -> Self {
        Self { last_scan: Instant::now(), next_wake: Duration::ZERO }
    }

    /// Scan the table for a peer whose handshake retry is due. If one is
    /// found, its retry bookkeeping (`reset_trial`, `reset_last`,
    /// `reset_intvl`) is advanced and a fresh random session id is
    /// generated for it; the caller is responsible for actually sending
    /// RST_1 with the returned session and the peer's current
    /// `counter_send` (arbitrary, per spec).
    pub fn tick(&mut self, now: Instant, nodes: &mut [Node], rng: &mut impl Rng) -> Option<(usize, [u8; SESSION_LEN])> {
        if now.duration_since(self.last_scan) < self.next_wake {
            return None;
        }
        self.last_scan = now;

        for (index, node) in nodes.iter_mut().enumerate() {
            let due = match node.reset_intvl {
                ResetSchedule::Disabled => false,
                ResetSchedule::Scheduled(delay) => now.duration_since(node.reset_last) >= delay,
            };
            if !due {
                continue;
            }

            node.reset_last = now;
            let jitter = Duration::from_millis(rng.gen_range(0..RESET_JITTER_MS));
            let backoff = Duration::from_millis(node.reset_trial as u64 * RESET_BACKOFF_STEP_MS);
            node.reset_intvl = ResetSchedule::Scheduled(backoff + jitter);
            if node.reset_trial < RESET_TRIAL_MAX {
                node.reset_trial += 1;
            }

            let mut session = [0u8; SESSION_LEN];
            rng.fill(&mut session);
            node.reset_session = session;

            self.next_wake = Duration::from_millis(RESET_SCAN_FOUND_MS);
            return Some((index, session));
        }

        self.next_wake = Duration::from_millis(RESET_SCAN_EMPTY_MS);
        None
    }

    /// Called when the initiator side completes a handshake: re-scan soon
    /// rather than waiting out a full empty-scan interval, in case another
    /// peer is also stale.
    pub fn kick(&mut self, now: Instant) {
        self.last_scan = now;
        self.next_wake = Duration::from_millis(RESET_SCAN_POST_HANDSHAKE_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitAddr;
    use rand::SeedableRng;

    #[test]
    fn fresh_node_is_due_immediately() {
        let mut scheduler = Scheduler::new();
        let mut nodes = vec![Node::new(UnitAddr(1))];
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let result = scheduler.tick(Instant::now(), &mut nodes, &mut rng);
        assert!(result.is_some());
        assert_eq!(nodes[0].reset_trial, 1);
    }

    #[test]
    fn trial_saturates_at_max() {
        let mut scheduler = Scheduler::new();
        let mut nodes = vec![Node::new(UnitAddr(1))];
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let mut now = Instant::now();
        for _ in 0..(RESET_TRIAL_MAX as usize + 5) {
            scheduler.tick(now, &mut nodes, &mut rng);
            now += Duration::from_secs(600);
        }
        assert_eq!(nodes[0].reset_trial, RESET_TRIAL_MAX);
    }

    #[test]
    fn empty_scan_backs_off() {
        let mut scheduler = Scheduler::new();
        let mut nodes: Vec<Node> = vec![];
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let now = Instant::now();
        assert!(scheduler.tick(now, &mut nodes, &mut rng).is_none());
        // Immediately after an empty scan, next tick should not be due yet.
        assert!(scheduler.tick(now, &mut nodes, &mut rng).is_none());
    }
}
