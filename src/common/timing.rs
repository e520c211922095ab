// src/common/timing.rs

use core::time::Duration;

// Note: All waits are realized as blocking sleeps through the `Delay` trait.
// Acquisition cycles on this node run tens of seconds apart, so coarse
// millisecond granularity is plenty.

// === Particulate Sensor Timing ===

/// Warm-up after cold power-on before readings stabilize.
pub const POWER_ON_SETTLE: Duration = Duration::from_secs(30);
/// Backoff between select-command attempts during initialization.
pub const SELECT_RETRY_BACKOFF: Duration = Duration::from_millis(500);
/// Backoff between frame read attempts within one acquisition.
pub const FRAME_RETRY_BACKOFF: Duration = Duration::from_secs(2);

// === Serial Link Timing ===

/// Settle time between writing a command frame and reading the reply.
pub const COMMAND_SETTLE: Duration = Duration::from_secs(1);
/// Read timeout the byte-stream link is expected to be configured with.
pub const LINK_READ_TIMEOUT: Duration = Duration::from_millis(500);

// === Retry Budgets ===

/// Select-command attempts before initialization silently gives up.
pub const SELECT_ATTEMPTS: u8 = 10;
/// Frame read attempts before an acquisition settles for sentinel values.
pub const FRAME_READ_ATTEMPTS: u8 = 5;
