//! Serial API checksums
//!
//! Frame checksum, from the Z-Wave serial API:
//! 1. Start with 0xFF
//! 2. XOR every byte from the length field through the last payload byte
//! 3. The result is the trailing checksum byte
//!
//! Seeding with 0xFF is the same as XOR-reducing from zero and taking the
//! ones-complement at the end.
//!
//! The CRC-16 used by the CRC-16 Encapsulation command class lives here too,
//! it is a plain CRC-CCITT with a non-standard initial value.

use tracing::trace;

/// Initial value of the frame checksum
pub const CHECKSUM_SEED: u8 = 0xFF;

/// Initial value of the CRC-16 encapsulation checksum
pub const CRC16_SEED: u16 = 0x1D0F;

const CRC16_POLY: u16 = 0x1021;

/// Calculate the serial frame checksum
///
/// `data` is everything between the start-of-frame byte and the checksum:
/// length, message type, message class and payload.
///
/// # Examples
///
/// ```
/// use zwrust_core::checksum;
///
/// // Basic Get to node 99
/// let body = [0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00];
/// assert_eq!(checksum::calculate(&body), 0xA6);
/// ```
pub fn calculate(data: &[u8]) -> u8 {
    let checksum = data.iter().fold(CHECKSUM_SEED, |acc, byte| acc ^ byte);

    trace!(
        len = data.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify a frame checksum
pub fn verify(data: &[u8], expected: u8) -> bool {
    calculate(data) == expected
}

/// CRC-CCITT (poly 0x1021, seed 0x1D0F, no reflection, no final XOR)
///
/// # Examples
///
/// ```
/// use zwrust_core::checksum;
///
/// // CRC-16 encapsulated Basic Get
/// assert_eq!(checksum::crc16(&[0x56, 0x01, 0x20, 0x02]), 0x4D26);
/// ```
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC16_SEED;

    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
            } else {
                crc << 1
            };
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    // Length through payload of a SendData Basic Get to node 99
    const BASIC_GET_BODY: [u8; 9] = [0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00];

    #[test]
    fn test_checksum_basic_get_fixture() {
        assert_eq!(calculate(&BASIC_GET_BODY), 0xA6);
    }

    #[test]
    fn test_checksum_empty() {
        assert_eq!(calculate(&[]), CHECKSUM_SEED);
    }

    #[test]
    fn test_checksum_is_complemented_xor() {
        let xor = BASIC_GET_BODY.iter().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(calculate(&BASIC_GET_BODY), !xor);
    }

    #[test]
    fn test_checksum_verify() {
        assert!(verify(&BASIC_GET_BODY, 0xA6));
        assert!(!verify(&BASIC_GET_BODY, 0xA7));
    }

    #[test]
    fn test_checksum_single_byte_flip() {
        for i in 0..BASIC_GET_BODY.len() {
            let mut body = BASIC_GET_BODY;
            body[i] ^= 0x01;
            assert_ne!(calculate(&body), 0xA6, "flip at {}", i);
        }
    }

    #[test]
    fn test_crc16_known_values() {
        // CRC-CCITT/AUG-CCITT check value for "123456789"
        assert_eq!(crc16(b"123456789"), 0xE5CC);
        assert_eq!(crc16(&[0x56, 0x01, 0x20, 0x02]), 0x4D26);
    }

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16(&[]), CRC16_SEED);
    }
}
