//! CRC-16 frame integrity check.

use crc::{Crc, CRC_16_IBM_3740};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Compute the CRC-16 over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_checksum() {
        let a = crc16(b"hello mesh");
        let b = crc16(b"hello mesh");
        assert_eq!(a, b);
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let a = crc16(&[0x00, 0x01, 0x02, 0x03]);
        let b = crc16(&[0x00, 0x01, 0x02, 0x07]);
        assert_ne!(a, b);
    }
}
