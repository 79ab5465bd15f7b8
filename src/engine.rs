//! The public entry point: [`Engine`] and [`EngineBuilder`].
//!
//! `process()` polls, in order, the duty-cycle governor, the reset
//! scheduler, then the radio for an inbound frame. This ordering matters:
//! airtime accounting must see every edge before a send is attempted this
//! tick, and a scheduled handshake retry should go out before we spend the
//! tick's attention on whatever just arrived.

use std::time::Instant;

use log::{debug, trace, warn};

use crate::codec;
use crate::core::constants::{
    MAX_CIPHERTEXT_LEN, MAX_ON_AIR_FRAME_LEN, MAX_SITE_ID_LEN, MSG_APPLICATION_MIN, MSG_RST_1,
    SESSION_LEN,
};
use crate::core::error::{ConfigError, DecodeFailure};
use crate::core::rng::seed_from_radio;
use crate::core::types::SiteKey;
use crate::core::{NodeCallbacks, Radio, SendError, UnitAddr};
use crate::duty_cycle::DutyCycleGovernor;
use crate::handshake::{self, HandshakeAction};
use crate::peer::Table;
use crate::scheduler::Scheduler;

use rand::rngs::StdRng;

/// Builds an [`Engine`], mirroring the original firmware's
/// init/set_local_addr/set_nodes-or-enable_discovery/set_duty_cycle call
/// sequence as a single fallible construction step.
pub struct EngineBuilder {
    site_id: Vec<u8>,
    site_key: [u8; 16],
    local_addr: Option<UnitAddr>,
    table: TableConfig,
    duty_window_secs: u64,
    duty_permillage: u32,
}

/// Tracks whether [`EngineBuilder::roster`]/[`EngineBuilder::discovery`] have
/// been called, so a second, conflicting call can be distinguished from
/// never having called either — both are rejected at `build()`, but only the
/// latter is silently permissive by construction.
enum TableConfig {
    Unset,
    Set(Table),
    Conflicting,
}

impl EngineBuilder {
    /// Start building an engine for the given site id and shared site key.
    pub fn new(site_id: impl Into<Vec<u8>>, site_key: [u8; 16]) -> Self {
        Self {
            site_id: site_id.into(),
            site_key,
            local_addr: None,
            table: TableConfig::Unset,
            duty_window_secs: crate::core::constants::DEFAULT_DUTY_WINDOW_SECS,
            duty_permillage: crate::core::constants::DEFAULT_DUTY_PERMILLAGE,
        }
    }

    /// Set this unit's local address. Required.
    pub fn local_addr(mut self, addr: u8) -> Self {
        self.local_addr = Some(UnitAddr(addr));
        self
    }

    /// Configure a fixed peer roster. Mutually exclusive with
    /// [`EngineBuilder::discovery`]; calling both is rejected at
    /// [`EngineBuilder::build`].
    pub fn roster(mut self, addrs: impl IntoIterator<Item = u8>) -> Self {
        self.table = match self.table {
            TableConfig::Unset => TableConfig::Set(Table::roster(addrs.into_iter().map(UnitAddr))),
            TableConfig::Set(_) | TableConfig::Conflicting => TableConfig::Conflicting,
        };
        self
    }

    /// Enable bounded peer discovery instead of a fixed roster. Mutually
    /// exclusive with [`EngineBuilder::roster`]; calling both is rejected at
    /// [`EngineBuilder::build`].
    pub fn discovery(mut self, capacity: usize) -> Self {
        self.table = match self.table {
            TableConfig::Unset => TableConfig::Set(Table::discovery(capacity)),
            TableConfig::Set(_) | TableConfig::Conflicting => TableConfig::Conflicting,
        };
        self
    }

    /// Configure the duty-cycle window (seconds) and budget (permillage of
    /// that window). Defaults to 600s / 100 permillage (10%) if unset.
    pub fn duty_cycle(mut self, window_secs: u64, permillage: u32) -> Self {
        self.duty_window_secs = window_secs;
        self.duty_permillage = permillage;
        self
    }

    /// Finalize construction, seeding the engine's PRNG from the radio's
    /// own noise-derived randomness.
    pub fn build<R: Radio, C: NodeCallbacks>(self, mut radio: R, callbacks: C) -> Result<Engine<R, C>, ConfigError> {
        let local_addr = self.local_addr.ok_or(ConfigError::MissingLocalAddr)?;
        let table = match self.table {
            TableConfig::Set(table) => table,
            TableConfig::Unset | TableConfig::Conflicting => return Err(ConfigError::PeerTableNotConfigured),
        };
        if self.site_id.is_empty() {
            return Err(ConfigError::EmptySiteId);
        }
        if self.site_id.len() > MAX_SITE_ID_LEN {
            return Err(ConfigError::SiteIdTooLong { max: MAX_SITE_ID_LEN });
        }

        let rng = seed_from_radio(&mut radio);

        Ok(Engine {
            site_id: self.site_id,
            site_key: SiteKey::new(self.site_key),
            local_addr,
            table,
            duty: DutyCycleGovernor::new(self.duty_window_secs, self.duty_permillage),
            scheduler: Scheduler::new(),
            rng,
            callbacks,
            radio,
        })
    }
}

/// The link/session engine: owns the radio, peer table, and all protocol
/// state machines, and dispatches to application callbacks.
pub struct Engine<R: Radio, C: NodeCallbacks> {
    site_id: Vec<u8>,
    site_key: SiteKey,
    local_addr: UnitAddr,
    table: Table,
    duty: DutyCycleGovernor,
    scheduler: Scheduler,
    rng: StdRng,
    callbacks: C,
    radio: R,
}

impl<R: Radio, C: NodeCallbacks> Engine<R, C> {
    /// This unit's local address.
    pub fn local_addr(&self) -> UnitAddr {
        self.local_addr
    }

    /// Reconfigure the duty-cycle budget at runtime.
    pub fn set_duty_cycle(&mut self, window_secs: u64, permillage: u32) {
        self.duty.set_duty_cycle(window_secs, permillage);
    }

    /// The tracked peer table.
    pub fn peers(&self) -> &Table {
        &self.table
    }

    /// Send an application message (`msg_type` should be `>= 4`) to an
    /// established peer.
    pub fn send(&mut self, to: UnitAddr, msg_type: u8, data: &[u8]) -> Result<(), SendError> {
        if to.is_broadcast() {
            return Err(SendError::InvalidPeer);
        }
        let idx = self.table.find_index(to).ok_or(SendError::InvalidPeer)?;
        if !self.table.nodes()[idx].session_set {
            return Err(SendError::NoSession);
        }
        let session = self.table.nodes()[idx].session;
        let counter = self.table.nodes()[idx].counter_send;

        self.send_frame(idx, session, msg_type, data, counter)?;

        let node = &mut self.table.nodes_mut()[idx];
        node.counter_send = node.counter_send.wrapping_add(1);
        if node.counter_send == 0 {
            // Counter wrap forces a fresh handshake: the wire counter space
            // for this session is exhausted.
            node.reset_trial = 0;
            node.reset_last = Instant::now();
            node.reset_intvl = crate::peer::ResetSchedule::Scheduled(std::time::Duration::ZERO);
            debug!("peer {:?}: counter_send wrapped, scheduling handshake", to);
        }
        Ok(())
    }

    /// Run one dispatcher tick: duty-cycle accounting, the reset scheduler,
    /// then a single non-blocking receive attempt.
    pub fn process(&mut self) {
        let now = Instant::now();
        self.duty.tick(now, self.radio.is_transmitting());
        self.poll_scheduler(now);
        self.poll_recv();
    }

    fn poll_scheduler(&mut self, now: Instant) {
        let Some((idx, session)) = self.scheduler.tick(now, self.table.nodes_mut(), &mut self.rng) else {
            return;
        };
        let counter = self.table.nodes()[idx].counter_send;
        if let Err(err) = self.send_handshake(idx, session, MSG_RST_1, counter, &[]) {
            warn!("failed to send RST_1 to {:?}: {err}", self.table.nodes()[idx].addr());
        }
    }

    fn poll_recv(&mut self) {
        let total_len = self.radio.parse_packet();
        if total_len == 0 {
            return;
        }
        if total_len > MAX_ON_AIR_FRAME_LEN {
            let reason = DecodeFailure::Oversize;
            warn!("dropping frame ({total_len} bytes): {reason}");
            for _ in 0..total_len {
                self.radio.read();
            }
            return;
        }

        let mut raw = [0u8; MAX_ON_AIR_FRAME_LEN];
        for byte in raw.iter_mut().take(total_len) {
            *byte = self.radio.read();
        }
        let raw = &raw[..total_len];

        let frame = match codec::split(raw, &self.site_id) {
            Ok(frame) => frame,
            Err(err) => {
                trace!("dropping frame: {err}");
                return;
            }
        };

        let mut cipher_buf = [0u8; MAX_CIPHERTEXT_LEN];
        cipher_buf[..frame.ciphertext.len()].copy_from_slice(frame.ciphertext);
        let plain = codec::cipher::decrypt_in_place(&self.site_key, frame.iv_seed, &mut cipher_buf[..frame.ciphertext.len()]);

        let decoded = match codec::decode(plain) {
            Ok(decoded) => decoded,
            Err(err) => {
                trace!("dropping frame: {err}");
                return;
            }
        };
        if decoded.to_addr != self.local_addr {
            let reason = DecodeFailure::NotForUs;
            trace!("dropping frame: {reason}");
            return;
        }

        let rssi = self.radio.packet_rssi();
        let snr = self.radio.packet_snr();

        let Some(idx) = self.table.find_or_discover(decoded.from_addr) else {
            trace!("dropping frame from unknown peer {:?}", decoded.from_addr);
            return;
        };
        {
            let node = &mut self.table.nodes_mut()[idx];
            node.rssi = rssi;
            node.snr = snr;
        }

        if decoded.msg_type < MSG_APPLICATION_MIN {
            self.dispatch_handshake(idx, decoded.msg_type, decoded.session, decoded.counter);
        } else {
            let from_addr = decoded.from_addr;
            let msg_type = decoded.msg_type;
            let data_owned = decoded.data.to_vec();
            let node = &mut self.table.nodes_mut()[idx];
            if handshake::accept_application_frame(node, &decoded.session, decoded.counter) {
                self.callbacks.process_message(from_addr, msg_type, &data_owned);
            } else {
                trace!("rejected application frame from {from_addr:?} (session/counter mismatch)");
            }
        }
    }

    fn dispatch_handshake(&mut self, idx: usize, step: u8, session: [u8; SESSION_LEN], counter: u16) {
        let addr = self.table.nodes()[idx].addr();
        let action = handshake::on_message(&mut self.table.nodes_mut()[idx], step, &session, counter);
        match action {
            HandshakeAction::Drop(reason) => {
                trace!("handshake step {step} from {addr:?} dropped: {reason}");
            }
            HandshakeAction::SendRst2 { challenge } => {
                let data = challenge.to_be_bytes();
                let _ = self.send_handshake(idx, session, crate::core::constants::MSG_RST_2, challenge, &data);
            }
            HandshakeAction::SendRst3 { challenge } => {
                let _ = self.send_handshake(idx, session, crate::core::constants::MSG_RST_3, challenge, &[]);
            }
            HandshakeAction::SendRst4AndComplete { counter } => {
                let _ = self.send_handshake(idx, session, crate::core::constants::MSG_RST_4, counter, &[]);
                self.callbacks.on_session_reset(addr);
            }
            HandshakeAction::CompleteAsInitiator => {
                self.callbacks.on_session_reset(addr);
                self.scheduler.kick(Instant::now());
            }
        }
    }

    fn send_handshake(&mut self, idx: usize, session: [u8; SESSION_LEN], msg_type: u8, counter: u16, data: &[u8]) -> Result<(), SendError> {
        self.send_frame(idx, session, msg_type, data, counter)
    }

    fn send_frame(&mut self, idx: usize, session: [u8; SESSION_LEN], msg_type: u8, data: &[u8], counter: u16) -> Result<(), SendError> {
        if self.duty.exceeded() {
            return Err(SendError::DutyCycleExceeded);
        }

        let to_addr = self.table.nodes()[idx].addr();
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let plain_len = codec::plaintext::encode(&mut buf, to_addr, self.local_addr, msg_type, &session, counter, data);
        let iv_seed: [u8; 2] = rand::Rng::gen(&mut self.rng);
        let padded_len = codec::cipher::encrypt_in_place(&self.site_key, iv_seed, &mut buf, plain_len);

        if !self.radio.begin_packet() {
            return Err(SendError::RadioBusy);
        }
        self.radio.write(&self.site_id);
        self.radio.write(&iv_seed);
        self.radio.write(&buf[..padded_len]);
        self.radio.end_packet();
        Ok(())
    }
}
