//! On-air frame layout: `site_id || iv_seed || ciphertext`.

use crate::core::constants::{IV_SEED_LEN, MIN_CIPHERTEXT_LEN};
use crate::core::error::DecodeFailure;

/// A received frame split into its site-agnostic parts. `ciphertext` still
/// needs decryption and CRC validation.
pub struct OnAirFrame<'a> {
    /// The IV seed carried on the air, to be expanded by [`super::cipher`].
    pub iv_seed: [u8; IV_SEED_LEN],
    /// The AES-128-CBC ciphertext, still encrypted.
    pub ciphertext: &'a [u8],
}

/// Strip the site prefix and IV seed from `raw`, validating the site match
/// and minimum/alignment bounds on what remains.
pub fn split<'a>(raw: &'a [u8], site_id: &[u8]) -> Result<OnAirFrame<'a>, DecodeFailure> {
    if raw.len() < site_id.len() + IV_SEED_LEN {
        return Err(DecodeFailure::Undersize);
    }
    if &raw[..site_id.len()] != site_id {
        return Err(DecodeFailure::SiteMismatch);
    }
    let iv_seed = [raw[site_id.len()], raw[site_id.len() + 1]];
    let ciphertext = &raw[site_id.len() + IV_SEED_LEN..];
    if ciphertext.len() < MIN_CIPHERTEXT_LEN {
        return Err(DecodeFailure::Undersize);
    }
    if ciphertext.len() % 16 != 0 {
        return Err(DecodeFailure::Misaligned);
    }
    Ok(OnAirFrame { iv_seed, ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_site() {
        let raw = [b's', b'i', b't', b'e', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(split(&raw, b"nope").unwrap_err(), DecodeFailure::SiteMismatch);
    }

    #[test]
    fn rejects_undersize_ciphertext() {
        let raw = [b's', b'i', b't', b'e', 0, 0, 1, 2, 3];
        assert_eq!(split(&raw, b"site").unwrap_err(), DecodeFailure::Undersize);
    }
}
