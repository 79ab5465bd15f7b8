//! The application-facing capability interface.
//!
//! The original firmware dispatched to per-peer C function pointers. This
//! crate collapses that into a single trait the [`crate::engine::Engine`] is
//! generic over, matching how [`crate::core::Radio`] is modeled: one
//! capability, implemented once, invoked with the peer address as a
//! parameter rather than stored per-`Node`.
use crate::core::types::UnitAddr;

/// Application callbacks invoked by the dispatcher.
pub trait NodeCallbacks {
    /// A session with `peer` has just been (re-)established, on either the
    /// initiating or the responding side. Counters have been reset; any
    /// application-level state keyed on the old session should be dropped.
    fn on_session_reset(&mut self, peer: UnitAddr) {
        let _ = peer;
    }

    /// An authenticated, replay-checked application message arrived from
    /// `peer`. `msg_type` is always `>= 4` (handshake types are intercepted
    /// before reaching this callback).
    fn process_message(&mut self, peer: UnitAddr, msg_type: u8, data: &[u8]);
}
