//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one tagged line per application
//! event to the `log` facade (ESP-IDF logger on the board, whatever the
//! test harness installs on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(role) => {
                info!("START | role={:?}", role);
            }
            AppEvent::Calibrated(report) => {
                let [r, g, b] = report.profile.factors();
                info!(
                    "CAL   | factors R={:.2} G={:.2} B={:.2} | used={} skipped={}",
                    r, g, b, report.accepted, report.rejected
                );
            }
            AppEvent::Classified { sample, result } => {
                debug!(
                    "CLASS | R={} G={} B={} C={} -> {} ({:.2})",
                    sample.r, sample.g, sample.b, sample.clear, result.label, result.confidence
                );
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSE | read failed: {}", e);
            }
            AppEvent::Delivered { event, attempt } => {
                info!(
                    "SEND  | {}:{:.2} acked (attempt {})",
                    event.label, event.confidence, attempt
                );
            }
            AppEvent::DeliveryFailed { event, failure } => {
                warn!(
                    "SEND  | {}:{:.2} undelivered: {}",
                    event.label, event.confidence, failure
                );
            }
            AppEvent::Played {
                label,
                track,
                confidence,
            } => {
                info!("PLAY  | {} -> track {} ({:.2})", label, track, confidence);
            }
            AppEvent::Suppressed { label, remaining } => {
                info!("PLAY  | {} repeat suppressed ({} ms left)", label, remaining.as_millis());
            }
            AppEvent::Unmapped { label, from } => {
                warn!("RECV  | unknown label '{}' from {}", label, from);
            }
            AppEvent::DatagramDropped { error, from } => {
                warn!("RECV  | dropped datagram from {}: {}", from, error);
            }
            AppEvent::ActuatorFault(e) => {
                warn!("PLAY  | actuator fault: {}", e);
            }
            AppEvent::NetFault(e) => {
                warn!("RECV  | socket fault: {}", e);
            }
        }
    }
}
