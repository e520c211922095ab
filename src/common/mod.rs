// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod checksum;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod payload;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From checksum.rs
pub use checksum::{sum_checksum, verify_sum_frame};

// From crc.rs
pub use crc::{calculate_crc16, encode_crc, verify_frame_crc};

// From error.rs
pub use error::SensorError;

// From hal_traits.rs
pub use hal_traits::{ByteStream, Delay, NoPower, PowerPin, RegisterBus};

// From payload.rs
pub use payload::{decode_channel, encode_u16, fill_unset};

// From timing.rs (constants - users access via common::timing::*)

// --- Feature-gated re-exports ---

// embedded-hal adapters (from hal_traits.rs)
#[cfg(feature = "embedded-hal")]
pub use hal_traits::{HalDelay, HalPin, I2cBus};
