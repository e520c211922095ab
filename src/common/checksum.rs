// src/common/checksum.rs

use super::error::SensorError;

/// Computes the 8-bit truncating sum checksum over `data`.
///
/// The particulate sensor family terminates each response frame with the
/// wrapping 8-bit sum of every preceding byte.
///
/// # Arguments
///
/// * `data`: The frame bytes covered by the checksum (everything before the
///   trailing checksum byte).
///
/// # Returns
///
/// The low 8 bits of the byte sum.
#[inline]
pub fn sum_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Verifies a frame whose last byte is the 8-bit sum of all preceding bytes.
///
/// Callers apply this only to frames the transport returned at the expected
/// full length.
///
/// # Arguments
///
/// * `frame`: The complete frame including the trailing checksum byte.
///
/// # Returns
///
/// * `Ok(())` if the checksum matches.
/// * `Err(SensorError::ShortFrame)` if the frame cannot carry a checksum.
/// * `Err(SensorError::ChecksumMismatch)` if it does not match.
pub fn verify_sum_frame<E>(frame: &[u8]) -> Result<(), SensorError<E>>
where
    E: core::fmt::Debug,
{
    if frame.len() < 2 {
        return Err(SensorError::ShortFrame { expected: 2, got: frame.len() });
    }
    let data_len = frame.len() - 1;
    let expected = frame[data_len];
    let calculated = sum_checksum(&frame[..data_len]);

    if calculated == expected {
        Ok(())
    } else {
        Err(SensorError::ChecksumMismatch { expected, calculated })
    }
}
