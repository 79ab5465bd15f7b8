//! Plaintext record layout: the bytes that get encrypted, not the bytes on
//! the air.
//!
//! ```text
//! offset  len  field
//! 0       1    to_addr
//! 1       1    from_addr
//! 2       1    msg_type
//! 3       8    session
//! 11      2    counter (big-endian)
//! 13      1    data_len
//! 14      N    data
//! 14+N    2    crc16 (big-endian, over bytes [0, 14+N))
//! ```

use crate::core::constants::{CRC_LEN, PLAINTEXT_HEADER_LEN, SESSION_LEN};
use crate::core::error::DecodeFailure;
use crate::core::types::UnitAddr;

use super::crc::crc16;

/// Fields decoded from a validated plaintext record.
#[derive(Debug)]
pub struct Decoded<'a> {
    /// Destination address.
    pub to_addr: UnitAddr,
    /// Source address.
    pub from_addr: UnitAddr,
    /// Message type (handshake: 0-3, application: >= 4).
    pub msg_type: u8,
    /// Session identifier this frame claims to belong to.
    pub session: [u8; SESSION_LEN],
    /// Sender-side counter value.
    pub counter: u16,
    /// Application/handshake payload, borrowed from the decrypted buffer.
    pub data: &'a [u8],
}

/// Encode a plaintext record (header + data + CRC) into `buf`, returning the
/// number of bytes written. `buf` must be at least
/// `PLAINTEXT_HEADER_LEN + data.len() + CRC_LEN` bytes; any bytes beyond
/// what's returned are left untouched (the caller pads them for AES).
pub fn encode(
    buf: &mut [u8],
    to_addr: UnitAddr,
    from_addr: UnitAddr,
    msg_type: u8,
    session: &[u8; SESSION_LEN],
    counter: u16,
    data: &[u8],
) -> usize {
    buf[0] = to_addr.0;
    buf[1] = from_addr.0;
    buf[2] = msg_type;
    buf[3..11].copy_from_slice(session);
    buf[11..13].copy_from_slice(&counter.to_be_bytes());
    buf[13] = data.len() as u8;
    buf[14..14 + data.len()].copy_from_slice(data);

    let plain_len = PLAINTEXT_HEADER_LEN + data.len();
    let crc = crc16(&buf[..plain_len]);
    buf[plain_len..plain_len + CRC_LEN].copy_from_slice(&crc.to_be_bytes());
    plain_len + CRC_LEN
}

/// Parse and CRC-validate a plaintext record out of a decrypted buffer.
/// `buf` may be longer than the record itself (AES padding); only the first
/// `PLAINTEXT_HEADER_LEN + data_len + CRC_LEN` bytes are consumed.
pub fn decode(buf: &[u8]) -> Result<Decoded<'_>, DecodeFailure> {
    if buf.len() < PLAINTEXT_HEADER_LEN + CRC_LEN {
        return Err(DecodeFailure::Undersize);
    }

    let to_addr = UnitAddr(buf[0]);
    let from_addr = UnitAddr(buf[1]);
    let msg_type = buf[2];
    let mut session = [0u8; SESSION_LEN];
    session.copy_from_slice(&buf[3..11]);
    let counter = u16::from_be_bytes([buf[11], buf[12]]);
    let data_len = buf[13] as usize;

    let plain_len = PLAINTEXT_HEADER_LEN + data_len;
    if buf.len() < plain_len + CRC_LEN {
        return Err(DecodeFailure::Undersize);
    }

    let expected = crc16(&buf[..plain_len]);
    let actual = u16::from_be_bytes([buf[plain_len], buf[plain_len + 1]]);
    if expected != actual {
        return Err(DecodeFailure::CrcMismatch);
    }

    if from_addr.is_broadcast() || to_addr.is_broadcast() || from_addr == to_addr {
        return Err(DecodeFailure::IllegalAddress);
    }

    Ok(Decoded {
        to_addr,
        from_addr,
        msg_type,
        session,
        counter,
        data: &buf[PLAINTEXT_HEADER_LEN..plain_len],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_CIPHERTEXT_LEN;

    #[test]
    fn round_trip() {
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let session = [1, 2, 3, 4, 5, 6, 7, 8];
        let len = encode(
            &mut buf,
            UnitAddr(0x02),
            UnitAddr(0x01),
            9,
            &session,
            42,
            b"hi",
        );
        let decoded = decode(&buf[..len]).unwrap();
        assert_eq!(decoded.to_addr, UnitAddr(0x02));
        assert_eq!(decoded.from_addr, UnitAddr(0x01));
        assert_eq!(decoded.msg_type, 9);
        assert_eq!(decoded.session, session);
        assert_eq!(decoded.counter, 42);
        assert_eq!(decoded.data, b"hi");
    }

    #[test]
    fn corrupted_crc_is_rejected() {
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let len = encode(&mut buf, UnitAddr(2), UnitAddr(1), 0, &[0; 8], 0, &[]);
        buf[len - 1] ^= 0xFF;
        assert_eq!(decode(&buf[..len]), Err(DecodeFailure::CrcMismatch));
    }

    #[test]
    fn broadcast_source_is_illegal() {
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let len = encode(&mut buf, UnitAddr(2), UnitAddr::BROADCAST, 0, &[0; 8], 0, &[]);
        assert_eq!(decode(&buf[..len]), Err(DecodeFailure::IllegalAddress));
    }

    #[test]
    fn from_equal_to_is_illegal() {
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let len = encode(&mut buf, UnitAddr(2), UnitAddr(2), 0, &[0; 8], 0, &[]);
        assert_eq!(decode(&buf[..len]), Err(DecodeFailure::IllegalAddress));
    }

    /// A plaintext record as it would appear in a captured hex dump (e.g.
    /// pasted from a logic analyzer), round-tripped through `hex` rather than
    /// a raw byte-array literal to document the on-the-wire layout in the
    /// same form a bug report would quote it in.
    #[test]
    fn decodes_a_hex_encoded_wire_fixture() {
        let mut buf = [0u8; MAX_CIPHERTEXT_LEN];
        let session = [0xAA; SESSION_LEN];
        let len = encode(&mut buf, UnitAddr(0x02), UnitAddr(0x01), 9, &session, 42, b"hi");

        let dump = hex::encode(&buf[..len]);
        let replayed = hex::decode(&dump).unwrap();

        let decoded = decode(&replayed).unwrap();
        assert_eq!(decoded.to_addr, UnitAddr(0x02));
        assert_eq!(decoded.from_addr, UnitAddr(0x01));
        assert_eq!(decoded.session, session);
        assert_eq!(decoded.counter, 42);
        assert_eq!(decoded.data, b"hi");
    }
}
