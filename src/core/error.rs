//! Error taxonomy.
//!
//! Every error kind here is handled locally by the engine; nothing is ever
//! propagated back over the air to the peer that triggered it.

use thiserror::Error;

/// Errors returned by [`crate::engine::Engine::send`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No established session with this peer yet; a handshake must complete
    /// first.
    #[error("no established session with this peer")]
    NoSession,

    /// The destination address is not in the peer table (or is the reserved
    /// broadcast/none value).
    #[error("destination is not a known peer")]
    InvalidPeer,

    /// The duty-cycle governor has exhausted this window's airtime budget.
    #[error("duty-cycle budget exhausted for the current window")]
    DutyCycleExceeded,

    /// The radio rejected `begin_packet` (busy channel or hardware fault).
    #[error("radio refused to begin a new packet")]
    RadioBusy,
}

/// Reasons a received on-air frame was rejected before it could be
/// delivered to the application or handshake layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Frame exceeds the maximum on-air length this implementation bounds
    /// its receive buffer to.
    #[error("frame exceeds the maximum on-air length")]
    Oversize,

    /// The site prefix did not match our configured site id.
    #[error("site identifier did not match")]
    SiteMismatch,

    /// Ciphertext shorter than the minimum legal frame.
    #[error("ciphertext shorter than the minimum legal frame")]
    Undersize,

    /// Ciphertext length is not a whole number of AES blocks.
    #[error("ciphertext length is not a multiple of the AES block size")]
    Misaligned,

    /// CRC-16 check over the decrypted plaintext record failed.
    #[error("CRC-16 check failed")]
    CrcMismatch,

    /// The decoded `from`/`to` address pair is illegal (broadcast, or
    /// `from == to`).
    #[error("illegal address in decoded frame")]
    IllegalAddress,

    /// The frame's `to_addr` does not match our local unit address.
    #[error("frame addressed to a different unit")]
    NotForUs,
}

/// Reasons an in-flight handshake step was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeMismatch {
    /// The reset session id did not match the handshake in progress.
    #[error("reset session id did not match the in-flight handshake")]
    WrongSession,

    /// The counter carried by this step was not valid for the current
    /// handshake phase.
    #[error("unexpected counter value for this handshake step")]
    UnexpectedCounter,
}

/// Errors raised while building an [`crate::engine::Engine`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// [`crate::engine::EngineBuilder::local_addr`] was never called.
    #[error("local unit address must be set before build()")]
    MissingLocalAddr,

    /// Neither [`crate::engine::EngineBuilder::roster`] nor
    /// [`crate::engine::EngineBuilder::discovery`] was called, or both were.
    #[error("exactly one of roster() or discovery() must be configured")]
    PeerTableNotConfigured,

    /// The site id exceeds [`crate::core::constants::MAX_SITE_ID_LEN`].
    #[error("site id exceeds the maximum supported length of {max} bytes")]
    SiteIdTooLong {
        /// The configured maximum.
        max: usize,
    },

    /// The site id was empty.
    #[error("site id must not be empty")]
    EmptySiteId,
}
