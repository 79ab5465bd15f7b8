//! The four-message session-reset handshake.
//!
//! ```text
//! I -> R   RST_1   session=S               counter = I.counter_send (arbitrary)
//! R -> I   RST_2   session=S, data=C (u16)  counter = C
//! I -> R   RST_3   session=S               counter = C
//! R -> I   RST_4   session=S               counter = C+1
//! ```
//!
//! `C = (R.counter_recv + 1) mod 2^16`, clamped to `0` if it would land at or
//! above [`COUNTER_CHALLENGE_CLAMP_THRESHOLD`].
//!
//! Two behaviors here are preserved exactly as specified rather than
//! "fixed", because the spec calls them out deliberately (see `DESIGN.md`):
//! the initiator adopts `counter_recv` from RST_2 *before* RST_4's stricter
//! check ever runs, and the responder overwrites `reset_session` on every
//! RST_1 unconditionally, even mid-handshake.

use crate::core::constants::{COUNTER_CHALLENGE_CLAMP_THRESHOLD, MSG_RST_1, MSG_RST_2, MSG_RST_3, MSG_RST_4};
use crate::core::error::HandshakeMismatch;
use crate::peer::{Node, ResetSchedule};

/// What the dispatcher should do in response to a handshake message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeAction {
    /// Reject silently; no reply, no state change beyond what already
    /// happened (nothing, for every step except RST_1). Carries why, so the
    /// dispatcher can log it even though the wire protocol itself stays
    /// silent about the rejection.
    Drop(HandshakeMismatch),
    /// Send RST_2 carrying this challenge as both the wire counter and the
    /// 2-byte data payload.
    SendRst2 { challenge: u16 },
    /// Send RST_3 carrying the echoed challenge as the wire counter.
    SendRst3 { challenge: u16 },
    /// Send RST_4 carrying `challenge + 1` as the wire counter. The session
    /// is already adopted by the time this is returned; fire
    /// `on_session_reset` after the send.
    SendRst4AndComplete { counter: u16 },
    /// The initiator side just adopted the session. Fire
    /// `on_session_reset` and kick the scheduler to re-scan soon.
    CompleteAsInitiator,
}

fn clamp_challenge(counter_recv: u16) -> u16 {
    let c = counter_recv.wrapping_add(1);
    if c > COUNTER_CHALLENGE_CLAMP_THRESHOLD {
        0
    } else {
        c
    }
}

/// Advance `node`'s handshake state machine on receipt of a `step`
/// (`MSG_RST_1..=MSG_RST_4`) message carrying `sent_session`/`sent_counter`.
///
/// `node` must already be the table entry for the frame's sender; the
/// caller is responsible for session lookup/discovery and CRC/address
/// validation before this is called.
pub fn on_message(node: &mut Node, step: u8, sent_session: &[u8; 8], sent_counter: u16) -> HandshakeAction {
    match step {
        MSG_RST_1 => {
            // Unconditional overwrite, even mid-handshake: the spec treats a
            // fresh RST_1 as always authoritative over whatever handshake
            // this node thought it was already running.
            node.reset_session = *sent_session;
            HandshakeAction::SendRst2 { challenge: clamp_challenge(node.counter_recv) }
        }

        MSG_RST_2 => {
            if node.reset_session != *sent_session {
                return HandshakeAction::Drop(HandshakeMismatch::WrongSession);
            }
            if node.counter_recv.wrapping_add(1) > sent_counter {
                return HandshakeAction::Drop(HandshakeMismatch::UnexpectedCounter);
            }
            // Adopt counter_send/counter_recv here, ahead of RST_4's own
            // strict counter_recv check. Preserved as specified.
            node.counter_send = sent_counter;
            node.counter_recv = sent_counter;
            HandshakeAction::SendRst3 { challenge: sent_counter }
        }

        MSG_RST_3 => {
            if node.reset_session != *sent_session {
                return HandshakeAction::Drop(HandshakeMismatch::WrongSession);
            }
            let expected = clamp_challenge(node.counter_recv);
            if sent_counter != expected {
                return HandshakeAction::Drop(HandshakeMismatch::UnexpectedCounter);
            }
            adopt_session(node, sent_counter);
            HandshakeAction::SendRst4AndComplete { counter: sent_counter.wrapping_add(1) }
        }

        MSG_RST_4 => {
            if node.reset_session != *sent_session {
                return HandshakeAction::Drop(HandshakeMismatch::WrongSession);
            }
            if node.counter_recv >= sent_counter {
                return HandshakeAction::Drop(HandshakeMismatch::UnexpectedCounter);
            }
            adopt_session(node, sent_counter);
            HandshakeAction::CompleteAsInitiator
        }

        _ => HandshakeAction::Drop(HandshakeMismatch::UnexpectedCounter),
    }
}

fn adopt_session(node: &mut Node, counter_recv: u16) {
    node.session = node.reset_session;
    node.session_set = true;
    node.counter_recv = counter_recv;
    node.reset_session = [0; 8];
    node.reset_intvl = ResetSchedule::Disabled;
}

/// Validate and apply an ordinary application-traffic frame's counter,
/// returning whether it should be delivered to the application.
pub fn accept_application_frame(node: &mut Node, sent_session: &[u8; 8], sent_counter: u16) -> bool {
    if !node.session_set || node.session != *sent_session || sent_counter <= node.counter_recv {
        return false;
    }
    node.counter_recv = sent_counter;
    true
}

#[allow(unused)]
const _MSG_TYPE_NAMES: [u8; 4] = [MSG_RST_1, MSG_RST_2, MSG_RST_3, MSG_RST_4];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitAddr;

    #[test]
    fn happy_path_both_sides() {
        let mut initiator = Node::new(UnitAddr(2));
        let mut responder = Node::new(UnitAddr(1));
        let session = [9u8; 8];

        initiator.reset_session = session;

        // I -> R RST_1
        let action = on_message(&mut responder, MSG_RST_1, &session, 0);
        let challenge = match action {
            HandshakeAction::SendRst2 { challenge } => challenge,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(challenge, 1);

        // R -> I RST_2
        let action = on_message(&mut initiator, MSG_RST_2, &session, challenge);
        assert_eq!(action, HandshakeAction::SendRst3 { challenge });
        assert_eq!(initiator.counter_send, challenge);

        // I -> R RST_3
        let action = on_message(&mut responder, MSG_RST_3, &session, challenge);
        let rst4_counter = match action {
            HandshakeAction::SendRst4AndComplete { counter } => counter,
            other => panic!("unexpected {other:?}"),
        };
        assert!(responder.is_session_established());
        assert_eq!(responder.session, session);

        // R -> I RST_4
        let action = on_message(&mut initiator, MSG_RST_4, &session, rst4_counter);
        assert_eq!(action, HandshakeAction::CompleteAsInitiator);
        assert!(initiator.is_session_established());
        assert_eq!(initiator.session, session);
    }

    #[test]
    fn rst2_with_wrong_session_is_dropped() {
        let mut initiator = Node::new(UnitAddr(2));
        initiator.reset_session = [1; 8];
        let action = on_message(&mut initiator, MSG_RST_2, &[2; 8], 5);
        assert_eq!(action, HandshakeAction::Drop(HandshakeMismatch::WrongSession));
    }

    #[test]
    fn rst4_requires_strictly_increasing_counter() {
        let mut initiator = Node::new(UnitAddr(2));
        let session = [3u8; 8];
        initiator.reset_session = session;
        initiator.counter_recv = 10;
        let action = on_message(&mut initiator, MSG_RST_4, &session, 10);
        assert_eq!(action, HandshakeAction::Drop(HandshakeMismatch::UnexpectedCounter));
        let action = on_message(&mut initiator, MSG_RST_4, &session, 11);
        assert_eq!(action, HandshakeAction::CompleteAsInitiator);
    }

    #[test]
    fn challenge_clamps_near_counter_wrap() {
        assert_eq!(clamp_challenge(0xFFF9), 0xFFFA);
        assert_eq!(clamp_challenge(0xFFFA), 0);
        assert_eq!(clamp_challenge(0xFFFF), 0);
    }

    #[test]
    fn replay_is_rejected() {
        let mut node = Node::new(UnitAddr(2));
        node.session_set = true;
        node.session = [1; 8];
        node.counter_recv = 5;
        assert!(!accept_application_frame(&mut node, &[1; 8], 5));
        assert!(!accept_application_frame(&mut node, &[1; 8], 3));
        assert!(accept_application_frame(&mut node, &[1; 8], 6));
        assert_eq!(node.counter_recv, 6);
    }
}
