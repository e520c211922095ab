// src/common/payload.rs

//! Big-endian channel packing for the shared radio payload.
//!
//! Every sensor writes its channels as 16-bit big-endian words at a
//! caller-assigned byte offset. Two reserved patterns exist: `0xFFFF` is the
//! on-wire "channel unset" encoding a receiver must honor, and `0xEEEE` marks
//! a channel a driver has not successfully decoded yet.

/// Byte pattern a driver writes over its payload slice before reading.
pub const UNSET_BYTE: u8 = 0xFF;

/// On-wire encoding of an unset channel (two [`UNSET_BYTE`]s).
pub const UNSET_WORD: u16 = 0xFFFF;

/// Channel value held before the first successful decode of a cycle.
pub const NOT_MEASURED: u16 = 0xEEEE;

/// Writes `value` big-endian into `payload[offset]` and `payload[offset + 1]`.
///
/// # Panics
///
/// Panics if `offset + 2` exceeds `payload.len()`; callers guarantee bounds.
#[inline]
pub fn encode_u16(value: u16, payload: &mut [u8], offset: usize) {
    payload[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Reads the 16-bit big-endian channel at frame position `channel`.
///
/// Channel positions count in 16-bit steps from the start of the frame, so
/// the bytes read are `frame[channel * 2]` and `frame[channel * 2 + 1]`.
///
/// # Panics
///
/// Panics if the frame is too short for the requested channel.
#[inline]
pub fn decode_channel(frame: &[u8], channel: usize) -> u16 {
    u16::from_be_bytes([frame[channel * 2], frame[channel * 2 + 1]])
}

/// Overwrites `payload[offset .. offset + len]` with the unset byte pattern.
///
/// # Panics
///
/// Panics if the range exceeds `payload.len()`.
#[inline]
pub fn fill_unset(payload: &mut [u8], offset: usize, len: usize) {
    payload[offset..offset + len].fill(UNSET_BYTE);
}
