//! The radio driver boundary.
//!
//! Everything below this trait — LoRa modulation parameters, SPI/GPIO
//! wiring, interrupt handling — is out of scope for this crate. An embedder
//! supplies a [`Radio`] implementation and the engine only ever calls the
//! handful of non-blocking methods below.

/// Non-blocking LoRa radio driver interface.
///
/// All methods are synchronous and MUST NOT block. `parse_packet` and
/// `is_transmitting` are polled every [`crate::engine::Engine::process`]
/// call; a driver that blocks here stalls the entire cooperative loop.
pub trait Radio {
    /// Begin an outbound packet. Returns `false` if the radio cannot accept
    /// one right now (already transmitting, busy channel, hardware fault).
    fn begin_packet(&mut self) -> bool;

    /// Append bytes to the packet started by `begin_packet`. May be called
    /// more than once per packet; the driver is responsible for buffering.
    fn write(&mut self, buf: &[u8]);

    /// Finish and transmit the packet assembled by prior `write` calls.
    /// Transmission itself is asynchronous: completion is observed later as
    /// an edge transition on [`Radio::is_transmitting`].
    fn end_packet(&mut self);

    /// Non-blocking check for a received packet. Returns `0` if none is
    /// available, otherwise the packet length in bytes.
    fn parse_packet(&mut self) -> usize;

    /// Read the next byte of the packet most recently reported by
    /// `parse_packet`. Must be called exactly that many times per packet.
    fn read(&mut self) -> u8;

    /// Whether the radio is currently transmitting. The duty-cycle governor
    /// observes the falling edge of this signal to charge airtime.
    fn is_transmitting(&self) -> bool;

    /// RSSI of the most recently received packet, in dBm.
    fn packet_rssi(&self) -> i16;

    /// SNR of the most recently received packet, in dB.
    fn packet_snr(&self) -> f32;

    /// Draw one bit of hardware randomness (radio noise floor sampling).
    /// Used only to seed the engine's PRNG at construction time.
    fn random_bit(&mut self) -> bool;
}
