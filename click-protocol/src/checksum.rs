//! Checksums used by Click board datagrams
//!
//! - [`xor8`]: longitudinal XOR, the ISM7 frame checksum
//! - [`crc16_ccitt`]: CRC-16/CCITT-FALSE, used by flash and modem boards
//! - [`crc8_dallas`]: Dallas/Maxim 1-Wire CRC-8, used by humidity/temperature sensors

/// XOR of all bytes
pub fn xor8(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// CRC-16/CCITT-FALSE
///
/// Polynomial 0x1021, initial value 0xFFFF, MSB first, no final XOR.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = 0xFFFFu16;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Dallas/Maxim CRC-8
///
/// Polynomial x^8 + x^5 + x^4 + 1 processed LSB first (0x8C reflected),
/// initial value 0.
pub fn crc8_dallas(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut current = byte;
        for _ in 0..8 {
            let mix = (crc ^ current) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            current >>= 1;
        }
    }
    crc
}
