//! Protocol constants.
//!
//! These values are fixed by the link/session protocol and MUST NOT be
//! changed independently of peers on the same site.

// =============================================================================
// MESSAGE TYPES (handshake range is reserved; application types start at 4)
// =============================================================================

/// Initiator -> responder: "let's establish a fresh session".
pub const MSG_RST_1: u8 = 0;
/// Responder -> initiator: challenge counter.
pub const MSG_RST_2: u8 = 1;
/// Initiator -> responder: echo the challenge.
pub const MSG_RST_3: u8 = 2;
/// Responder -> initiator: handshake complete.
pub const MSG_RST_4: u8 = 3;
/// First message type value available to application traffic.
pub const MSG_APPLICATION_MIN: u8 = 4;

// =============================================================================
// ADDRESSING
// =============================================================================

/// Reserved "no address" / broadcast value; never a legal peer or local addr.
pub const BROADCAST_ADDR: u8 = 0xFF;

// =============================================================================
// FRAME LAYOUT (plaintext record, before AES-CBC encryption)
// =============================================================================

/// `to_addr, from_addr, msg_type, session[8], counter[2], data_len`.
pub const PLAINTEXT_HEADER_LEN: usize = 14;
/// Session identifier length, in bytes.
pub const SESSION_LEN: usize = 8;
/// CRC-16 trailer length, in bytes.
pub const CRC_LEN: usize = 2;
/// Largest legal application payload (fits in the 1-byte `data_len` field).
pub const MAX_DATA_LEN: usize = 255;
/// Largest legal plaintext record, header + data + CRC.
pub const MAX_PLAINTEXT_LEN: usize = PLAINTEXT_HEADER_LEN + MAX_DATA_LEN + CRC_LEN;

/// AES-128 block size.
pub const AES_BLOCK_LEN: usize = 16;
/// `MAX_PLAINTEXT_LEN` rounded up to a whole number of AES blocks.
pub const MAX_CIPHERTEXT_LEN: usize = MAX_PLAINTEXT_LEN.div_ceil(AES_BLOCK_LEN) * AES_BLOCK_LEN;
/// Shortest ciphertext the codec will attempt to decrypt; the original
/// firmware's floor of 15 raw bytes is kept verbatim as the rejection
/// threshold.
pub const MIN_CIPHERTEXT_LEN: usize = 15;

/// IV seed length: two random bytes, repeated eight times to fill one AES
/// block's worth of IV.
pub const IV_SEED_LEN: usize = 2;

/// Upper bound this implementation places on site-id length. The original
/// firmware `malloc`s an arbitrary-length buffer; a bounded target needs a
/// fixed ceiling for its receive buffer instead.
pub const MAX_SITE_ID_LEN: usize = 16;
/// Largest legal on-air frame: site id + IV seed + ciphertext.
pub const MAX_ON_AIR_FRAME_LEN: usize = MAX_SITE_ID_LEN + IV_SEED_LEN + MAX_CIPHERTEXT_LEN;

// =============================================================================
// HANDSHAKE
// =============================================================================

/// Challenge counters at or above this value are clamped to zero, keeping
/// the handshake clear of the counter-wrap trigger band just below 0xFFFF.
pub const COUNTER_CHALLENGE_CLAMP_THRESHOLD: u16 = 0xFFFA;

// =============================================================================
// RESET SCHEDULER
// =============================================================================

/// Per-peer retry backoff step, multiplied by the trial number.
pub const RESET_BACKOFF_STEP_MS: u64 = 5_000;
/// Upper bound of the random jitter added to each retry's backoff.
pub const RESET_JITTER_MS: u64 = 5_000;
/// Trial counter saturates here; backoff stops growing past this point.
pub const RESET_TRIAL_MAX: u8 = 30;
/// Re-scan delay once a handshake was (re-)initiated this pass.
pub const RESET_SCAN_FOUND_MS: u64 = 5_000;
/// Re-scan delay when no peer was due for a retry this pass.
pub const RESET_SCAN_EMPTY_MS: u64 = 2_000;
/// Re-scan delay immediately after an initiator completes a handshake, so a
/// second stale peer doesn't wait out the full empty-scan interval.
pub const RESET_SCAN_POST_HANDSHAKE_MS: u64 = 1_000;

// =============================================================================
// DUTY CYCLE
// =============================================================================

/// Smallest configurable duty-cycle window.
pub const DUTY_WINDOW_MIN_SECS: u64 = 10;
/// Largest configurable duty-cycle window.
pub const DUTY_WINDOW_MAX_SECS: u64 = 3_600;
/// Smallest configurable duty-cycle permillage (tenths of a percent).
pub const DUTY_PERMILLAGE_MIN: u32 = 1;
/// Largest configurable duty-cycle permillage; 1000 == 100%.
pub const DUTY_PERMILLAGE_MAX: u32 = 1_000;
/// Default duty-cycle window, matching the original firmware's 10 minutes.
pub const DEFAULT_DUTY_WINDOW_SECS: u64 = 600;
/// Default duty-cycle permillage, matching the original firmware's 1%.
pub const DEFAULT_DUTY_PERMILLAGE: u32 = 100;
