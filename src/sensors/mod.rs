// src/sensors/mod.rs

//! Drivers for the sensors attached to the logging node and the uniform
//! capability contract that lets an application drive them as one list.

// --- Declare driver modules ---
pub mod hm330x;
pub mod senseair_s8;
pub mod sg112a;

// --- Re-export the driver types ---
pub use hm330x::Hm330x;
pub use senseair_s8::SenseairS8;
pub use sg112a::Sg112a;

/// Whether an acquisition packed live data or fallback values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// The cycle decoded a validated frame from the device.
    Fresh,
    /// The cycle fell back to sentinel or previously held values.
    Sentinel,
}

/// Outcome of one acquisition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquisition {
    /// First payload byte not written by this sensor; always
    /// `offset + payload_len()`, whatever the cycle's outcome.
    pub next_offset: usize,
    /// Whether the packed bytes carry a fresh measurement.
    pub status: SampleStatus,
}

/// Uniform capability contract every attached sensor satisfies.
///
/// Object-safe, so an application can hold heterogeneous drivers as
/// `&mut dyn PayloadSensor` and pack one composite payload for the radio.
pub trait PayloadSensor {
    /// One-time best-effort setup (handshake, warm-up wait).
    ///
    /// Never fails: a sensor that cannot be reached is left unconfigured
    /// and later acquisitions pack sentinel values instead.
    fn init(&mut self);

    /// On-demand recalibration hook; a no-op unless a driver overrides it.
    fn calibrate(&mut self) {}

    /// Fixed number of payload bytes this sensor packs per acquisition.
    fn payload_len(&self) -> usize;

    /// Runs one blocking acquisition cycle and packs the result into
    /// `payload[offset .. offset + payload_len()]`.
    fn acquire(&mut self, payload: &mut [u8], offset: usize) -> Acquisition;
}

/// Runs every sensor in order, chaining payload offsets from zero.
///
/// # Arguments
///
/// * `sensors`: The drivers to run, in payload order.
/// * `payload`: The shared outgoing buffer; must hold the summed
///   `payload_len()` of all sensors.
///
/// # Returns
///
/// The total number of payload bytes packed.
pub fn acquire_all(sensors: &mut [&mut dyn PayloadSensor], payload: &mut [u8]) -> usize {
    let mut offset = 0;
    for sensor in sensors.iter_mut() {
        let expected = offset + sensor.payload_len();
        let outcome = sensor.acquire(payload, offset);
        debug_assert_eq!(
            outcome.next_offset, expected,
            "sensor advanced the payload offset incorrectly"
        );
        offset = outcome.next_offset;
    }
    offset
}
