//! Per-peer state: the live session/counter pair plus whatever in-flight
//! handshake is trying to replace them.

use std::time::{Duration, Instant};

use crate::core::constants::SESSION_LEN;
use crate::core::types::UnitAddr;

/// Per-peer handshake retry schedule.
///
/// Replaces the original firmware's signed `reset_intvl` sentinel (negative
/// meaning "don't retry") with a sum type: there is no "negative duration"
/// to misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetSchedule {
    /// No handshake retry is scheduled for this peer.
    Disabled,
    /// Retry is due `Duration` after `reset_last`.
    Scheduled(Duration),
}

/// State the engine keeps for one peer: a roster entry or a discovered
/// sender.
#[derive(Debug)]
pub struct Node {
    pub(crate) addr: UnitAddr,

    /// The live, authenticated session id. Only meaningful while
    /// `session_set` is true.
    pub(crate) session: [u8; SESSION_LEN],
    pub(crate) session_set: bool,

    /// Outbound counter for the next frame sent under `session`.
    pub(crate) counter_send: u16,
    /// Highest counter accepted so far under `session`.
    pub(crate) counter_recv: u16,

    /// Session id proposed by the handshake currently in flight, if any.
    pub(crate) reset_session: [u8; SESSION_LEN],
    pub(crate) reset_trial: u8,
    pub(crate) reset_last: Instant,
    pub(crate) reset_intvl: ResetSchedule,

    pub(crate) rssi: i16,
    pub(crate) snr: f32,
}

impl Node {
    /// Create a fresh record for `addr`. No session established yet; a
    /// handshake is scheduled immediately so a newly-added roster entry or
    /// discovery doesn't have to wait out the scheduler's empty-scan delay.
    pub fn new(addr: UnitAddr) -> Self {
        Self {
            addr,
            session: [0; SESSION_LEN],
            session_set: false,
            counter_send: 0,
            counter_recv: 0,
            reset_session: [0; SESSION_LEN],
            reset_trial: 0,
            reset_last: Instant::now(),
            reset_intvl: ResetSchedule::Scheduled(Duration::ZERO),
            rssi: 0,
            snr: 0.0,
        }
    }

    /// This peer's unit address.
    pub fn addr(&self) -> UnitAddr {
        self.addr
    }

    /// Whether a session has been established with this peer.
    pub fn is_session_established(&self) -> bool {
        self.session_set
    }

    /// RSSI (dBm) of the last packet received from this peer.
    pub fn rssi(&self) -> i16 {
        self.rssi
    }

    /// SNR (dB) of the last packet received from this peer.
    pub fn snr(&self) -> f32 {
        self.snr
    }
}
