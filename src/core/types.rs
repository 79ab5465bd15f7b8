//! Identity and key types shared across the crate.

use zeroize::Zeroize;

/// A local unit address within a site (`0x00..=0xFE`). `0xFF` is reserved as
/// the broadcast/none value and is never a valid peer or local address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitAddr(pub u8);

impl UnitAddr {
    /// The reserved broadcast/none address, `0xFF`.
    pub const BROADCAST: UnitAddr = UnitAddr(0xFF);

    /// Whether this is the reserved broadcast/none address.
    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }
}

impl From<u8> for UnitAddr {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<UnitAddr> for u8 {
    fn from(value: UnitAddr) -> Self {
        value.0
    }
}

/// The shared 128-bit AES site key. Zeroized on drop.
#[derive(Clone)]
pub struct SiteKey([u8; 16]);

impl SiteKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Borrow the key bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl std::fmt::Debug for SiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SiteKey(..)")
    }
}

impl Drop for SiteKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
