//! White-reference calibration.
//!
//! The sensor is pointed at a known-white surface and a handful of
//! samples are averaged per channel.  Each channel's factor is
//! `max(avg) / avg_channel`, so the weakest channel is boosted until a
//! white reference reads neutral.  A channel that averaged zero keeps a
//! factor of 1.0.  The profile is computed once and never mutated.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::Sample;
use crate::app::ports::ColorSensor;

/// Per-channel correction factors, all strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    factors: [f32; 3],
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CalibrationProfile {
    pub const IDENTITY: Self = Self { factors: [1.0; 3] };

    /// Derive factors from per-channel averages.
    pub fn from_averages(avg: [f32; 3]) -> Self {
        let max = avg[0].max(avg[1]).max(avg[2]);
        Self {
            factors: avg.map(|a| if a > 0.0 { max / a } else { 1.0 }),
        }
    }

    /// Average the given white-reference samples.  An empty set yields
    /// the identity profile.
    pub fn from_samples<I: IntoIterator<Item = Sample>>(samples: I) -> Self {
        let mut sums = [0u64; 3];
        let mut count = 0u64;
        for s in samples {
            sums[0] += u64::from(s.r);
            sums[1] += u64::from(s.g);
            sums[2] += u64::from(s.b);
            count += 1;
        }
        if count == 0 {
            return Self::IDENTITY;
        }
        Self::from_averages(sums.map(|sum| sum as f32 / count as f32))
    }

    /// Factors in R, G, B order.
    pub fn factors(&self) -> [f32; 3] {
        self.factors
    }

    /// Scale a raw sample, truncating each channel to an integer.
    pub fn apply(&self, sample: &Sample) -> [u32; 3] {
        let [fr, fg, fb] = self.factors;
        [
            (f32::from(sample.r) * fr) as u32,
            (f32::from(sample.g) * fg) as u32,
            (f32::from(sample.b) * fb) as u32,
        ]
    }
}

/// Outcome of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationReport {
    pub profile: CalibrationProfile,
    /// Samples that were read and averaged.
    pub accepted: usize,
    /// Samples whose read failed and were skipped.
    pub rejected: usize,
}

/// Collect `samples` readings, pausing `interval_ms` between reads.
///
/// Read failures are skipped.  If every read fails the identity profile
/// is returned.
pub fn calibrate<S, D>(
    sensor: &mut S,
    delay: &mut D,
    samples: usize,
    interval_ms: u32,
) -> CalibrationReport
where
    S: ColorSensor + ?Sized,
    D: DelayNs,
{
    let mut accepted = Vec::with_capacity(samples);
    let mut rejected = 0;

    for i in 0..samples {
        match sensor.read_raw() {
            Ok(s) => {
                info!("CAL | sample {}: R={} G={} B={}", i + 1, s.r, s.g, s.b);
                accepted.push(s);
            }
            Err(e) => {
                warn!("CAL | sample {} skipped: {}", i + 1, e);
                rejected += 1;
            }
        }
        if i + 1 < samples {
            delay.delay_ms(interval_ms);
        }
    }

    let profile = CalibrationProfile::from_samples(accepted.iter().copied());
    if accepted.is_empty() {
        warn!("CAL | no usable samples, using identity factors");
    }
    let [r, g, b] = profile.factors();
    info!("CAL | factors R={:.2} G={:.2} B={:.2}", r, g, b);

    CalibrationReport {
        profile,
        accepted: accepted.len(),
        rejected,
    }
}
