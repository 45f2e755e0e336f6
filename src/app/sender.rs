//! Sensing-node orchestration.
//!
//! ```text
//!  ColorSensor ──▶ ┌──────────────────────────────────┐ ──▶ DatagramSocket
//!                  │          SenderService            │
//!        Clock ──▶ │ classify · stability gate · send  │ ──▶ EventSink
//!                  └──────────────────────────────────┘
//! ```
//!
//! One [`tick`](SenderService::tick) is one sample.  The caller owns the
//! pacing between ticks (the sample delay).

use embedded_hal::delay::DelayNs;
use log::info;

use super::events::{AppEvent, NodeRole};
use super::ports::{Clock, ColorSensor, EventSink};
use crate::color::{self, CalibrationProfile, CalibrationReport, Classification, ColorClassifier};
use crate::config::SenderConfig;
use crate::error::{DeliveryFailure, SensorError};
use crate::net::{DatagramSocket, ReliableNotifier};
use crate::stability::{Event, Gate, StabilityFilter};

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SenderTick {
    /// Inside the post-send cooldown; the sensor was not read.
    CoolingDown,
    /// The read failed; the sample was skipped.
    SensorFault(SensorError),
    /// Classified but not (yet) stable enough to send.
    Held { result: Classification, streak: u32 },
    Delivered { event: Event, attempt: u8 },
    /// The event was dropped after every attempt failed.
    Undelivered { event: Event, failure: DeliveryFailure },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderStats {
    pub samples: u32,
    pub sensor_faults: u32,
    pub events: u32,
    pub delivered: u32,
    pub undelivered: u32,
}

pub struct SenderService<S> {
    classifier: ColorClassifier,
    profile: CalibrationProfile,
    filter: StabilityFilter,
    notifier: ReliableNotifier<S>,
    calibration_samples: usize,
    calibration_interval_ms: u32,
    stats: SenderStats,
}

impl<S: DatagramSocket> SenderService<S> {
    /// Build the service with an identity calibration profile.
    pub fn new(config: &SenderConfig, notifier: ReliableNotifier<S>) -> Self {
        Self {
            classifier: config.classifier(),
            profile: CalibrationProfile::IDENTITY,
            filter: StabilityFilter::new(config.stability()),
            notifier,
            calibration_samples: config.sensor.calibration_samples,
            calibration_interval_ms: config.sensor.calibration_interval_ms,
            stats: SenderStats::default(),
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(NodeRole::Sender));
        info!("SenderService started, peer {}", self.notifier.peer());
    }

    /// Run the white-reference calibration and adopt the resulting profile.
    /// May be called again at any time to recalibrate.
    pub fn calibrate(
        &mut self,
        sensor: &mut impl ColorSensor,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> CalibrationReport {
        let report = color::calibrate(sensor, delay, self.calibration_samples, self.calibration_interval_ms);
        self.profile = report.profile;
        sink.emit(&AppEvent::Calibrated(report));
        report
    }

    /// Sample once: read → classify → gate → deliver.
    ///
    /// After a send, successful or not, the cooldown counts from the
    /// moment `deliver` returned.
    pub fn tick(
        &mut self,
        sensor: &mut impl ColorSensor,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> SenderTick {
        if self.filter.is_cooling(clock.now()) {
            return SenderTick::CoolingDown;
        }

        let sample = match sensor.read_raw() {
            Ok(s) => s,
            Err(e) => {
                self.stats.sensor_faults = self.stats.sensor_faults.wrapping_add(1);
                sink.emit(&AppEvent::SensorFault(e));
                return SenderTick::SensorFault(e);
            }
        };
        self.stats.samples = self.stats.samples.wrapping_add(1);

        let result = self.classifier.classify(&sample, &self.profile);
        sink.emit(&AppEvent::Classified { sample, result });

        let event = match self.filter.observe(result, clock.now()) {
            Gate::CoolingDown => return SenderTick::CoolingDown,
            Gate::Hold { streak } => return SenderTick::Held { result, streak },
            Gate::Emit(event) => event,
        };
        self.stats.events = self.stats.events.wrapping_add(1);

        let delivery = self.notifier.deliver(&event);
        self.filter.start_cooldown(clock.now());

        match delivery {
            Ok(d) => {
                self.stats.delivered = self.stats.delivered.wrapping_add(1);
                sink.emit(&AppEvent::Delivered { event, attempt: d.attempt });
                SenderTick::Delivered { event, attempt: d.attempt }
            }
            Err(failure) => {
                self.stats.undelivered = self.stats.undelivered.wrapping_add(1);
                sink.emit(&AppEvent::DeliveryFailed { event, failure });
                SenderTick::Undelivered { event, failure }
            }
        }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: CalibrationProfile) {
        self.profile = profile;
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    pub fn notifier_mut(&mut self) -> &mut ReliableNotifier<S> {
        &mut self.notifier
    }
}
