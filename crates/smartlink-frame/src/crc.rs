/// CRC-16/CCITT-FALSE generator polynomial.
pub const CRC16_POLY: u16 = 0x1021;

/// Initial register value.
pub const CRC16_INIT: u16 = 0xFFFF;

/// Compute the frame integrity code over `data`.
///
/// MSB-first, no reflection, no final XOR. The register stays 16 bits wide
/// for the whole computation.
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(CRC16_INIT, |crc, &byte| update(crc, byte))
}

/// Feed one byte into a running CRC register.
///
/// Lets callers checksum a frame incrementally as bytes arrive.
pub fn update(mut crc: u16, byte: u8) -> u16 {
    crc ^= u16::from(byte) << 8;
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ CRC16_POLY
        } else {
            crc << 1
        };
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn empty_input_is_initial_value() {
        assert_eq!(crc16(&[]), CRC16_INIT);
    }

    #[test]
    fn incremental_matches_one_shot() {
        let data = b"\x02\x1a\x34\x12partial frame bytes";
        let (head, tail) = data.split_at(5);
        let partial = head.iter().fold(CRC16_INIT, |crc, &b| update(crc, b));
        let full = tail.iter().fold(partial, |crc, &b| update(crc, b));
        assert_eq!(full, crc16(data));
    }

    #[test]
    fn sensitive_to_byte_order() {
        assert_ne!(crc16(&[0x01, 0x02]), crc16(&[0x02, 0x01]));
    }
}
