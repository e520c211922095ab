// src/lib.rs

#![cfg_attr(not(test), no_std)] // Tests run hosted; targets build without std

pub mod common;
pub mod sensors;

// Re-export key types for convenience
pub use common::SensorError;
pub use sensors::{Acquisition, PayloadSensor, SampleStatus};
