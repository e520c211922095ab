// src/common/crc.rs

use super::error::SensorError;
use crc::{Algorithm, Crc};

/// CRC-16/MODBUS, the algorithm the serial gas-sensor family frames with.
/// Polynomial: 0x8005 (normal representation of 0xA001 reversed)
/// Initial Value: 0xFFFF
/// Input Reflected: true
/// Output Reflected: true
/// Final XOR: 0x0000
/// Check Value: 0x4B37 (for "123456789") - standard for CRC-16/MODBUS
pub const MODBUS_CRC: Algorithm<u16> = Algorithm {
    poly: 0x8005,
    init: 0xFFFF,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x4B37,
    width: 16,
    residue: 0x0000,
};

// Create a Crc instance for the Modbus algorithm for reuse.
const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&MODBUS_CRC);

/// Calculates the CRC-16/MODBUS for the given data buffer.
///
/// Covers every frame byte before the two-byte CRC trailer. The CO2 sensor's
/// fixed read command `FE 44 00 08 02 9F 25` carries exactly this CRC over
/// its first five bytes.
///
/// # Arguments
///
/// * `data`: A slice of bytes for which to calculate the CRC.
///
/// # Returns
///
/// The calculated 16-bit CRC value.
#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a 16-bit CRC value into the two-byte trailer (LSB first).
///
/// # Arguments
///
/// * `crc_value`: The 16-bit CRC to encode.
///
/// # Returns
///
/// An array of two `u8` bytes `[LSB, MSB]`.
pub fn encode_crc(crc_value: u16) -> [u8; 2] {
    crc_value.to_le_bytes()
}

/// Decodes a two-byte trailer (LSB first) into a 16-bit CRC value.
///
/// # Arguments
///
/// * `crc_bytes`: A slice or array of two `u8` bytes `[LSB, MSB]`.
///
/// # Returns
///
/// The decoded 16-bit CRC value.
///
/// # Panics
///
/// Panics if `crc_bytes` does not have a length of exactly 2.
pub fn decode_crc(crc_bytes: &[u8]) -> u16 {
    assert_eq!(crc_bytes.len(), 2, "CRC trailer must be 2 bytes long");
    u16::from_le_bytes([crc_bytes[0], crc_bytes[1]])
}

/// Verifies a gas-sensor frame that ends with its two raw CRC bytes.
///
/// # Arguments
///
/// * `frame_with_crc`: The complete frame buffer including the 2-byte CRC.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(SensorError::ShortFrame)` if the buffer cannot carry a CRC.
/// * `Err(SensorError::CrcMismatch)` if the CRCs don't match.
pub fn verify_frame_crc<E>(frame_with_crc: &[u8]) -> Result<(), SensorError<E>>
where
    E: core::fmt::Debug,
{
    if frame_with_crc.len() < 2 {
        return Err(SensorError::ShortFrame { expected: 2, got: frame_with_crc.len() });
    }
    let data_len = frame_with_crc.len() - 2;
    let data_part = &frame_with_crc[..data_len];
    let received_crc_bytes = &frame_with_crc[data_len..];

    let calculated = calculate_crc16(data_part);
    let expected = decode_crc(received_crc_bytes);

    if calculated == expected {
        Ok(())
    } else {
        Err(SensorError::CrcMismatch { expected, calculated })
    }
}
