// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum SensorError<E = ()>
where
    E: core::fmt::Debug, // Need Debug for the generic transport error
{
    /// Underlying transport error from the bus/link implementation.
    #[error("transport error: {0:?}")] // Format string requires Debug on E
    Transport(E),

    /// The device supplied no bytes within the attempt.
    #[error("no data available from device")]
    NotReady,

    /// The transport supplied fewer bytes than the protocol's frame length.
    #[error("short frame: expected {expected} bytes, got {got}")]
    ShortFrame { expected: usize, got: usize },

    /// Frame's trailing 8-bit sum does not match the calculated sum.
    #[error("checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// Response frame shape is wrong (opcode echo or declared length).
    #[error("malformed response frame")]
    InvalidFrame,
}

// Allow mapping from the underlying transport error so `?` lifts it.
impl<E: core::fmt::Debug> From<E> for SensorError<E> {
    fn from(e: E) -> Self {
        SensorError::Transport(e)
    }
}

// Note: For the Transport(E) variant's #[error("...")] message to work in
// no_std, the underlying error type `E` must implement `core::fmt::Debug`.
// `Debug` is the minimum requirement for the format string used here.
