//! Outbound application events.
//!
//! The sender and receiver services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use core::time::Duration;
use std::net::SocketAddr;

use crate::color::{CalibrationReport, Classification, Label, Sample};
use crate::error::{ActuatorError, DatagramDecodeError, DeliveryFailure, NetError, SensorError};
use crate::net::receiver::UNMAPPED_LABEL_CAP;
use crate::stability::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Sender,
    Receiver,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started.
    Started(NodeRole),

    // ── Sender ───────────────────────────────────────────────
    Calibrated(CalibrationReport),
    /// Every successfully read sample, before the stability gate.
    Classified { sample: Sample, result: Classification },
    SensorFault(SensorError),
    Delivered { event: Event, attempt: u8 },
    DeliveryFailed { event: Event, failure: DeliveryFailure },

    // ── Receiver ─────────────────────────────────────────────
    Played { label: Label, track: u16, confidence: f32 },
    Suppressed { label: Label, remaining: Duration },
    Unmapped {
        label: heapless::String<UNMAPPED_LABEL_CAP>,
        from: SocketAddr,
    },
    DatagramDropped { error: DatagramDecodeError, from: SocketAddr },
    ActuatorFault(ActuatorError),
    NetFault(NetError),
}
