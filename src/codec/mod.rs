//! Framed, site-keyed, encrypted packet codec.
//!
//! An on-air frame is `site_id || iv_seed(2) || ciphertext`. `ciphertext` is
//! AES-128-CBC over a plaintext record (`codec::plaintext`) whose IV is the
//! two-byte `iv_seed` repeated eight times (`codec::cipher`). The plaintext
//! record itself carries a CRC-16 trailer (`codec::crc`) so corruption is
//! caught before the frame is trusted.

pub mod cipher;
pub mod crc;
pub mod frame;
pub mod plaintext;

pub use frame::{split, OnAirFrame};
pub use plaintext::{decode, encode, Decoded};
