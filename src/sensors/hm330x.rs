// src/sensors/hm330x.rs

//! Driver for the HM330x particulate-matter sensor family.
//!
//! The device sits on an addressed register bus and, once selected with the
//! `0x88` command, answers frame requests with 29 bytes: a header, thirteen
//! 16-bit channels, and a trailing 8-bit sum checksum. Only the three
//! standard-atmosphere particle buckets (PM1.0, PM2.5, PM10 at frame
//! positions 5 to 7) are packed into the payload.
//!
//! An optional active-high enable pin gates sensor power. With a pin fitted
//! the driver wakes the device for every acquisition and powers it back down
//! afterward, paying the warm-up wait per cycle instead of at startup.

use crate::common::checksum::verify_sum_frame;
use crate::common::error::SensorError;
use crate::common::hal_traits::{Delay, NoPower, PowerPin, RegisterBus};
use crate::common::payload::{decode_channel, encode_u16, fill_unset, NOT_MEASURED};
use crate::common::timing;

use super::{Acquisition, PayloadSensor, SampleStatus};

/// Default 7-bit bus address of the HM330x family.
pub const BUS_ADDRESS: u8 = 0x40;

/// Command selecting the device for addressed frame reads.
const CMD_SELECT: u8 = 0x88;

/// Full response frame length including the trailing checksum byte.
const FRAME_LEN: usize = 29;

/// Frame position of the first packed channel (PM1.0, standard atmosphere).
const FIRST_CHANNEL: usize = 5;

/// Number of channels packed into the payload.
const CHANNELS: usize = 3;

const PAYLOAD_LEN: usize = CHANNELS * 2;

/// HM330x driver, generic over the register bus, the delay provider and an
/// optional power-enable pin.
pub struct Hm330x<B, D, P = NoPower> {
    bus: B,
    delay: D,
    power: Option<P>,
}

impl<B, D> Hm330x<B, D, NoPower>
where
    B: RegisterBus,
    D: Delay,
{
    /// Creates a driver for an always-powered sensor.
    ///
    /// `init` pays the full warm-up wait once; acquisitions read directly.
    pub fn new(bus: B, delay: D) -> Self {
        Hm330x { bus, delay, power: None }
    }
}

impl<B, D, P> Hm330x<B, D, P>
where
    B: RegisterBus,
    D: Delay,
    P: PowerPin,
{
    /// Creates a driver that gates sensor power through `pin`.
    pub fn with_power_pin(bus: B, delay: D, pin: P) -> Self {
        Hm330x { bus, delay, power: Some(pin) }
    }

    /// Wakes a power-gated sensor: enable line high, warm-up wait, then a
    /// single best-effort select (selection drops while powered down).
    fn wake(&mut self) {
        if let Some(pin) = self.power.as_mut() {
            pin.set_active(true);
            self.delay.delay_ms(timing::POWER_ON_SETTLE.as_millis() as u32);
            let _ = self.bus.send_command(CMD_SELECT);
        }
    }

    /// Drops the enable line on a power-gated sensor.
    fn sleep(&mut self) {
        if let Some(pin) = self.power.as_mut() {
            pin.set_active(false);
        }
    }

    /// One frame request against the bus, checked for length and checksum.
    fn try_read_frame(
        &mut self,
        frame: &mut [u8; FRAME_LEN],
    ) -> Result<(), SensorError<B::Error>> {
        let got = self.bus.request_frame(frame)?;
        if got == 0 {
            return Err(SensorError::NotReady);
        }
        if got < FRAME_LEN {
            return Err(SensorError::ShortFrame { expected: FRAME_LEN, got });
        }
        verify_sum_frame(&frame[..])
    }
}

impl<B, D, P> PayloadSensor for Hm330x<B, D, P>
where
    B: RegisterBus,
    D: Delay,
    P: PowerPin,
{
    /// Warms the sensor up and selects it for addressed reads.
    ///
    /// With a power pin the warm-up is skipped here (each acquisition pays
    /// it on wake instead); without one the driver blocks for the full
    /// warm-up before selecting. The select is retried on a fixed budget;
    /// exhausting it leaves the device unselected and later acquisitions
    /// pack sentinels.
    fn init(&mut self) {
        match self.power.as_mut() {
            Some(pin) => pin.set_active(true),
            None => self.delay.delay_ms(timing::POWER_ON_SETTLE.as_millis() as u32),
        }
        for _ in 0..timing::SELECT_ATTEMPTS {
            if self.bus.send_command(CMD_SELECT).is_ok() {
                return;
            }
            self.delay.delay_ms(timing::SELECT_RETRY_BACKOFF.as_millis() as u32);
        }
    }

    fn payload_len(&self) -> usize {
        PAYLOAD_LEN
    }

    /// Reads one validated frame (up to the fixed attempt budget) and packs
    /// the three particle channels big-endian at `offset`.
    ///
    /// The slice is reset to the unset pattern first, so an exhausted cycle
    /// leaves `FF FF FF FF FF FF` on the wire and reports
    /// [`SampleStatus::Sentinel`].
    fn acquire(&mut self, payload: &mut [u8], offset: usize) -> Acquisition {
        self.wake();
        fill_unset(payload, offset, PAYLOAD_LEN);

        let mut channels = [NOT_MEASURED; CHANNELS];
        let mut status = SampleStatus::Sentinel;
        let mut frame = [0u8; FRAME_LEN];
        for _ in 0..timing::FRAME_READ_ATTEMPTS {
            match self.try_read_frame(&mut frame) {
                Ok(()) => {
                    for (i, channel) in channels.iter_mut().enumerate() {
                        *channel = decode_channel(&frame, FIRST_CHANNEL + i);
                    }
                    status = SampleStatus::Fresh;
                    break;
                }
                Err(_) => {
                    self.delay.delay_ms(timing::FRAME_RETRY_BACKOFF.as_millis() as u32);
                }
            }
        }

        // A channel still at NOT_MEASURED never reaches the wire; its slot
        // keeps the unset fill.
        for (i, channel) in channels.iter().enumerate() {
            if *channel != NOT_MEASURED {
                encode_u16(*channel, payload, offset + 2 * i);
            }
        }

        self.sleep();
        Acquisition { next_offset: offset + PAYLOAD_LEN, status }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::checksum::sum_checksum;
    use crate::sensors::mocks::{MockBus, MockDelay, MockPin};

    /// 29-byte frame with `01 02 03 04 05 06` in the packed channel bytes
    /// and a correct trailing checksum.
    fn valid_frame() -> [u8; 29] {
        let mut frame = [0u8; 29];
        frame[10..16].copy_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        frame[28] = sum_checksum(&frame[..28]);
        frame
    }

    #[test]
    fn test_init_without_pin_waits_warmup_then_selects() {
        let mut sensor = Hm330x::new(MockBus::new(), MockDelay::new());
        sensor.init();
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[30_000]);
        assert_eq!(sensor.bus.commands.as_slice(), &[CMD_SELECT]);
    }

    #[test]
    fn test_init_select_budget_is_exactly_bounded() {
        let mut bus = MockBus::new();
        bus.failing_sends = usize::MAX;
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        sensor.init();

        // Exactly 10 select attempts, then silence.
        assert_eq!(sensor.bus.commands.len(), 10);
        assert!(sensor.bus.commands.iter().all(|c| *c == CMD_SELECT));
        assert_eq!(sensor.bus.request_count, 0);

        // Warm-up first, then one backoff per failed attempt.
        assert_eq!(sensor.delay.delays_ms[0], 30_000);
        assert_eq!(sensor.delay.delays_ms.len(), 11);
        assert!(sensor.delay.delays_ms[1..].iter().all(|ms| *ms == 500));
    }

    #[test]
    fn test_init_recovers_within_budget() {
        let mut bus = MockBus::new();
        bus.failing_sends = 3;
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        sensor.init();
        assert_eq!(sensor.bus.commands.len(), 4);
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[30_000, 500, 500, 500]);
    }

    #[test]
    fn test_init_with_pin_skips_warmup() {
        let mut sensor = Hm330x::with_power_pin(MockBus::new(), MockDelay::new(), MockPin::new());
        sensor.init();
        assert_eq!(sensor.power.as_ref().unwrap().levels.as_slice(), &[true]);
        assert!(sensor.delay.delays_ms.is_empty());
        assert_eq!(sensor.bus.commands.as_slice(), &[CMD_SELECT]);
    }

    #[test]
    fn test_acquire_never_available_packs_sentinel() {
        let mut sensor = Hm330x::new(MockBus::new(), MockDelay::new());
        let mut payload = [0xAAu8; 8];

        let outcome = sensor.acquire(&mut payload, 1);

        assert_eq!(outcome.next_offset, 7);
        assert_eq!(outcome.status, SampleStatus::Sentinel);
        assert_eq!(&payload[1..7], &[0xFF; 6]);
        assert_eq!(payload[0], 0xAA);
        assert_eq!(payload[7], 0xAA);
        assert_eq!(sensor.bus.request_count, 5);
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[2_000; 5]);
    }

    #[test]
    fn test_acquire_decodes_channels_from_valid_frame() {
        let mut bus = MockBus::new();
        bus.stage_frame(&valid_frame());
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.next_offset, 6);
        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(payload, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(sensor.bus.request_count, 1);
        assert!(sensor.delay.delays_ms.is_empty());
    }

    #[test]
    fn test_acquire_retries_after_checksum_mismatch() {
        let mut corrupted = valid_frame();
        corrupted[12] ^= 0xFF;

        let mut bus = MockBus::new();
        bus.stage_frame(&corrupted);
        bus.stage_frame(&valid_frame());
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(payload, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(sensor.bus.request_count, 2);
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[2_000]);
    }

    #[test]
    fn test_acquire_retries_after_short_frame() {
        let frame = valid_frame();
        let mut bus = MockBus::new();
        bus.stage_frame(&frame[..10]);
        bus.stage_frame(&frame);
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(sensor.bus.request_count, 2);
    }

    #[test]
    fn test_acquire_retries_after_transport_error() {
        let mut bus = MockBus::new();
        bus.failing_requests = 2;
        bus.stage_frame(&valid_frame());
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(sensor.bus.request_count, 3);
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[2_000, 2_000]);
    }

    #[test]
    fn test_acquire_with_pin_wakes_reselects_and_sleeps() {
        let mut bus = MockBus::new();
        bus.stage_frame(&valid_frame());
        let mut sensor = Hm330x::with_power_pin(bus, MockDelay::new(), MockPin::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(sensor.power.as_ref().unwrap().levels.as_slice(), &[true, false]);
        assert_eq!(sensor.delay.delays_ms.as_slice(), &[30_000]);
        assert_eq!(sensor.bus.commands.as_slice(), &[CMD_SELECT]);
        assert_eq!(sensor.bus.request_count, 1);
    }

    #[test]
    fn test_decoded_invalid_marker_keeps_unset_slot() {
        // A device-side 0xEEEE means "invalid"; it must not displace the
        // on-wire unset pattern.
        let mut frame = [0u8; 29];
        frame[10..16].copy_from_slice(&[0xEE, 0xEE, 0x03, 0x04, 0x05, 0x06]);
        frame[28] = sum_checksum(&frame[..28]);

        let mut bus = MockBus::new();
        bus.stage_frame(&frame);
        let mut sensor = Hm330x::new(bus, MockDelay::new());
        let mut payload = [0u8; 6];

        let outcome = sensor.acquire(&mut payload, 0);

        assert_eq!(outcome.status, SampleStatus::Fresh);
        assert_eq!(payload, [0xFF, 0xFF, 0x03, 0x04, 0x05, 0x06]);
    }
}
