// src/sensors/senseair_s8.rs

//! Driver for the SenseAir S8 CO2 sensor.
//!
//! The sensor speaks Modbus over a byte-stream serial link (9600 baud; the
//! link enforces the read timeout). Each acquisition sends the fixed read
//! command for two input registers starting at 0x08 and decodes the CO2
//! concentration big-endian from response bytes 3 and 4. There is no retry
//! loop: a cycle without a response keeps the previously held value.

use crate::common::error::SensorError;
use crate::common::hal_traits::{ByteStream, Delay};
use crate::common::payload::encode_u16;
use crate::common::timing;

use super::{Acquisition, PayloadSensor, SampleStatus};

/// Fixed read command with its CRC-16/MODBUS trailer precomputed.
const CMD_READ_CO2: [u8; 7] = [0xFE, 0x44, 0x00, 0x08, 0x02, 0x9F, 0x25];

/// Response scratch capacity.
const RESPONSE_LEN: usize = 16;

/// Byte position of the concentration's high byte within a response.
const PPM_OFFSET: usize = 3;

const PAYLOAD_LEN: usize = 2;

/// SenseAir S8 driver, generic over the serial link and the delay provider.
pub struct SenseairS8<L, D> {
    link: L,
    delay: D,
    response: [u8; RESPONSE_LEN],
    ppm: u16,
}

impl<L, D> SenseairS8<L, D>
where
    L: ByteStream,
    D: Delay,
{
    /// Creates a driver over an already-configured link.
    pub fn new(link: L, delay: D) -> Self {
        SenseairS8 { link, delay, response: [0; RESPONSE_LEN], ppm: 0 }
    }

    /// Most recently decoded concentration in ppm (0 before the first
    /// successful read).
    pub fn last_ppm(&self) -> u16 {
        self.ppm
    }

    /// One command/response exchange; updates the held value on success.
    fn sample(&mut self) -> Result<(), SensorError<L::Error>> {
        self.link.flush_input()?;
        self.link.write_frame(&CMD_READ_CO2)?;
        self.delay.delay_ms(timing::COMMAND_SETTLE.as_millis() as u32);

        // Zeroed before every read so a truncated reply cannot splice into
        // the previous response.
        self.response = [0; RESPONSE_LEN];
        let got = self.link.read_available(&mut self.response)?;
        if got == 0 {
            return Err(SensorError::NotReady);
        }
        self.ppm =
            u16::from_be_bytes([self.response[PPM_OFFSET], self.response[PPM_OFFSET + 1]]);
        Ok(())
    }
}

impl<L, D> PayloadSensor for SenseairS8<L, D>
where
    L: ByteStream,
    D: Delay,
{
    fn init(&mut self) {}

    fn payload_len(&self) -> usize {
        PAYLOAD_LEN
    }

    /// Single-shot exchange, no retry. The held value is packed whatever
    /// the outcome, so a silent cycle repeats the last reading instead of
    /// resetting to a sentinel.
    fn acquire(&mut self, payload: &mut [u8], offset: usize) -> Acquisition {
        let status = match self.sample() {
            Ok(()) => SampleStatus::Fresh,
            Err(_) => SampleStatus::Sentinel,
        };
        encode_u16(self.ppm, payload, offset);
        Acquisition { next_offset: offset + PAYLOAD_LEN, status }
    }
}
