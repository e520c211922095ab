// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for blocking delays required by the acquisition cycles.
///
/// Note: This could potentially be replaced by directly requiring
/// `embedded_hal::delay::DelayNs` if embedded-hal v1 is mandated; the
/// `HalDelay` adapter bridges the two in the meantime.
pub trait Delay {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for an addressed/register-style sensor bus.
///
/// The particulate sensor hangs off a bus of this kind: single-byte command
/// writes and fixed-length frame reads against a device address the
/// implementation carries.
pub trait RegisterBus {
    /// Associated error type for transport-level failures.
    type Error: Debug;

    /// Writes a single command byte to the device.
    ///
    /// Returns `Err` when the device does not acknowledge the transfer.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Requests `frame.len()` bytes from the device.
    ///
    /// Returns how many bytes the device actually supplied; `Ok(0)` means
    /// the device had nothing ready, which callers treat as a retryable
    /// condition rather than an error.
    fn request_frame(&mut self, frame: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Abstraction for a byte-stream serial link.
///
/// The serial gas sensors talk framed request/response over a UART the
/// caller has already configured (baud rate and read timeout are properties
/// of the concrete link, not of this trait).
pub trait ByteStream {
    /// Associated error type for transport-level failures.
    type Error: Debug;

    /// Discards any unread input bytes.
    fn flush_input(&mut self) -> Result<(), Self::Error>;

    /// Writes a complete command frame.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Reads whatever is available into `buf`, blocking for at most the
    /// link's configured read timeout.
    ///
    /// Returns the number of bytes read; `Ok(0)` means the timeout elapsed
    /// with no data.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Abstraction for an active-high sensor enable line.
///
/// Infallible: the acquisition contract has no channel to report a failed
/// pin write, and GPIO writes on the supported targets cannot fail.
pub trait PowerPin {
    /// Drives the enable line high (`true`) or low (`false`).
    fn set_active(&mut self, on: bool);
}

/// Stand-in for sensors wired always-on, with no enable line fitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPower;

impl PowerPin for NoPower {
    fn set_active(&mut self, _on: bool) {}
}

// --- embedded-hal 1.0 adapters ---

/// Maps [`RegisterBus`] onto an `embedded_hal::i2c::I2c` peripheral.
#[cfg(feature = "embedded-hal")]
pub struct I2cBus<I> {
    i2c: I,
    address: u8,
}

#[cfg(feature = "embedded-hal")]
impl<I> I2cBus<I> {
    /// Wraps an I2C peripheral together with the 7-bit device address.
    pub fn new(i2c: I, address: u8) -> Self {
        I2cBus { i2c, address }
    }

    /// Releases the wrapped peripheral.
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(feature = "embedded-hal")]
impl<I: embedded_hal::i2c::I2c> RegisterBus for I2cBus<I> {
    type Error = I::Error;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[command])
    }

    fn request_frame(&mut self, frame: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, frame)?;
        Ok(frame.len())
    }
}

/// Maps [`Delay`] onto an `embedded_hal::delay::DelayNs` provider.
#[cfg(feature = "embedded-hal")]
pub struct HalDelay<D>(pub D);

#[cfg(feature = "embedded-hal")]
impl<D: embedded_hal::delay::DelayNs> Delay for HalDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}

/// Maps [`PowerPin`] onto an `embedded_hal::digital::OutputPin`.
#[cfg(feature = "embedded-hal")]
pub struct HalPin<P>(pub P);

#[cfg(feature = "embedded-hal")]
impl<P: embedded_hal::digital::OutputPin> PowerPin for HalPin<P> {
    fn set_active(&mut self, on: bool) {
        // Pin errors have nowhere to go through the infallible contract.
        let _ = if on { self.0.set_high() } else { self.0.set_low() };
    }
}
