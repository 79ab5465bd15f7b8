//! AES-128-CBC framing with a compact 2-byte IV seed.
//!
//! Carrying a full 16-byte IV on every packet would cost more than the
//! frames themselves on a LoRa link's airtime budget, so the IV is a 2-byte
//! random seed repeated eight times to fill one AES block. This halves
//! entropy compared to a full random IV but the per-peer counter already
//! carries the anti-replay burden; the IV only needs to vary the ciphertext.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;

use crate::core::constants::{AES_BLOCK_LEN, IV_SEED_LEN};
use crate::core::types::SiteKey;

type Enc = cbc::Encryptor<Aes128>;
type Dec = cbc::Decryptor<Aes128>;

/// Expand a 2-byte IV seed into a full 16-byte AES IV by repeating it.
pub fn expand_iv(seed: [u8; IV_SEED_LEN]) -> [u8; AES_BLOCK_LEN] {
    let mut iv = [0u8; AES_BLOCK_LEN];
    for chunk in iv.chunks_exact_mut(IV_SEED_LEN) {
        chunk.copy_from_slice(&seed);
    }
    iv
}

/// Encrypt `buf[..plain_len]` in place under `key`/`iv_seed`, zero-padding
/// up to the next AES block boundary first. Returns the padded length.
///
/// `buf` must be zeroed from `plain_len` onward for at least one more block.
pub fn encrypt_in_place(key: &SiteKey, iv_seed: [u8; IV_SEED_LEN], buf: &mut [u8], plain_len: usize) -> usize {
    let iv = expand_iv(iv_seed);
    let padded_len = plain_len.div_ceil(AES_BLOCK_LEN) * AES_BLOCK_LEN;
    let key = GenericArray::from_slice(key.as_bytes());
    let iv = GenericArray::from_slice(&iv);
    Enc::new(key, iv)
        .encrypt_padded_mut::<NoPadding>(&mut buf[..padded_len], plain_len)
        .expect("padded_len is a whole number of AES blocks");
    padded_len
}

/// Decrypt `buf` in place under `key`/`iv_seed`. `buf.len()` must already be
/// a whole number of AES blocks; the caller is responsible for rejecting
/// misaligned ciphertext before calling this.
pub fn decrypt_in_place<'a>(key: &SiteKey, iv_seed: [u8; IV_SEED_LEN], buf: &'a mut [u8]) -> &'a mut [u8] {
    let iv = expand_iv(iv_seed);
    let key = GenericArray::from_slice(key.as_bytes());
    let iv = GenericArray::from_slice(&iv);
    Dec::new(key, iv)
        .decrypt_padded_mut::<NoPadding>(buf)
        .expect("NoPadding never fails to unpad")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_CIPHERTEXT_LEN;

    #[test]
    fn round_trip() {
        let key = SiteKey::new([7u8; 16]);
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        buf[..5].copy_from_slice(b"hello");
        let padded_len = encrypt_in_place(&key, [0xAB, 0xCD], &mut buf, 5);
        assert_eq!(padded_len, 16);
        let plain = decrypt_in_place(&key, [0xAB, 0xCD], &mut buf[..padded_len]);
        assert_eq!(&plain[..5], b"hello");
    }

    #[test]
    fn wrong_iv_does_not_round_trip() {
        let key = SiteKey::new([7u8; 16]);
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        buf[..5].copy_from_slice(b"hello");
        let padded_len = encrypt_in_place(&key, [0xAB, 0xCD], &mut buf, 5);
        let plain = decrypt_in_place(&key, [0x00, 0x00], &mut buf[..padded_len]);
        assert_ne!(&plain[..5], b"hello");
    }
}
