// src/sensors/sg112a.rs

//! Driver for the SG112A gas sensor module.
//!
//! The module answers framed queries over a byte-stream link. Requests and
//! responses share one shape: opcode, declared payload length, payload
//! bytes, then a CRC-16/MODBUS trailer over everything before it. Device
//! support is partial in this revision: only the concentration query is
//! exercised, and the sensor needs no setup or calibration sequence before
//! answering, so `init` and `calibrate` are empty.

use arrayvec::ArrayVec;

use crate::common::crc::{calculate_crc16, encode_crc, verify_frame_crc};
use crate::common::error::SensorError;
use crate::common::hal_traits::{ByteStream, Delay};
use crate::common::payload::encode_u16;
use crate::common::timing;

use super::{Acquisition, PayloadSensor, SampleStatus};

/// Response scratch capacity.
const RESPONSE_LEN: usize = 16;

/// Largest framed request this revision sends.
const REQUEST_CAPACITY: usize = 8;

/// Shortest well-formed concentration reply: opcode, length, two payload
/// bytes, two CRC bytes.
const PPM_RESPONSE_LEN: usize = 6;

const PAYLOAD_LEN: usize = 2;

/// Queries the SG112A understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Firmware version query.
    GetVersion,
    /// Serial number query.
    GetSerial,
    /// Gas concentration query, ppm.
    GetPpm,
}

impl Command {
    /// Wire opcode for this query.
    pub fn opcode(self) -> u8 {
        match self {
            Command::GetVersion => 0x10,
            Command::GetSerial => 0x12,
            Command::GetPpm => 0x14,
        }
    }

    /// Builds the framed request: opcode, zero payload length, CRC trailer.
    pub fn encode(self) -> ArrayVec<u8, REQUEST_CAPACITY> {
        let mut frame = ArrayVec::new();
        frame.push(self.opcode());
        frame.push(0x00);
        let crc = calculate_crc16(&frame);
        frame.extend(encode_crc(crc));
        frame
    }
}

/// SG112A driver, generic over the serial link and the delay provider.
pub struct Sg112a<L, D> {
    link: L,
    delay: D,
    response: [u8; RESPONSE_LEN],
    ppm: u16,
}

impl<L, D> Sg112a<L, D>
where
    L: ByteStream,
    D: Delay,
{
    /// Creates a driver over an already-configured link.
    pub fn new(link: L, delay: D) -> Self {
        Sg112a { link, delay, response: [0; RESPONSE_LEN], ppm: 0 }
    }

    /// Most recently decoded concentration in ppm (0 before the first
    /// successful read).
    pub fn last_ppm(&self) -> u16 {
        self.ppm
    }

    /// One framed exchange; validates the reply and updates the held value.
    fn query_ppm(&mut self) -> Result<(), SensorError<L::Error>> {
        let request = Command::GetPpm.encode();
        self.link.flush_input()?;
        self.link.write_frame(&request)?;
        self.delay.delay_ms(timing::COMMAND_SETTLE.as_millis() as u32);

        self.response = [0; RESPONSE_LEN];
        let got = self.link.read_available(&mut self.response)?;
        if got == 0 {
            return Err(SensorError::NotReady);
        }
        let frame = &self.response[..got];
        verify_frame_crc(frame)?;
        if frame.len() < PPM_RESPONSE_LEN
            || frame[0] != Command::GetPpm.opcode()
            || frame[1] != PAYLOAD_LEN as u8
        {
            return Err(SensorError::InvalidFrame);
        }
        self.ppm = u16::from_be_bytes([frame[2], frame[3]]);
        Ok(())
    }
}

impl<L, D> PayloadSensor for Sg112a<L, D>
where
    L: ByteStream,
    D: Delay,
{
    fn init(&mut self) {}

    fn payload_len(&self) -> usize {
        PAYLOAD_LEN
    }

    /// Mirrors the CO2 driver's single-shot cycle: on any failure the held
    /// value is packed and the cycle reports [`SampleStatus::Sentinel`].
    fn acquire(&mut self, payload: &mut [u8], offset: usize) -> Acquisition {
        let status = match self.query_ppm() {
            Ok(()) => SampleStatus::Fresh,
            Err(_) => SampleStatus::Sentinel,
        };
        encode_u16(self.ppm, payload, offset);
        Acquisition { next_offset: offset + PAYLOAD_LEN, status }
    }
}
