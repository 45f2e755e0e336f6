//! Colour classification: raw RGBC samples in, discrete labels out.
//!
//! ```text
//!  Sample ──▶ CalibrationProfile::apply ──▶ intensity gates ──▶ RULES (first match) ──▶ Classification
//! ```
//!
//! Classification is pure.  Calibration reads the sensor only through the
//! [`ColorSensor`](crate::app::ports::ColorSensor) port.

pub mod calibration;
pub mod classifier;
pub mod label;

pub use calibration::{CalibrationProfile, CalibrationReport, calibrate};
pub use classifier::{Classification, ColorClassifier, Fractions, RULES, Rule};
pub use label::{Label, UnknownLabel};

/// One raw RGBC reading as reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub clear: u16,
}

impl Sample {
    pub const fn new(r: u16, g: u16, b: u16, clear: u16) -> Self {
        Self { r, g, b, clear }
    }

    /// Sample with the clear channel set to the sum of R, G and B.
    pub const fn rgb(r: u16, g: u16, b: u16) -> Self {
        let clear = r as u32 + g as u32 + b as u32;
        let clear = if clear > u16::MAX as u32 { u16::MAX } else { clear as u16 };
        Self { r, g, b, clear }
    }
}
