//! Actuating-node orchestration.
//!
//! ```text
//!  DatagramSocket ──▶ ┌─────────────────────────────────────┐ ──▶ ActuatorLink
//!                     │           ReceiverService            │
//!           Clock ──▶ │ decode · ack · map · suppress · play │ ──▶ EventSink
//!                     └─────────────────────────────────────┘
//! ```
//!
//! One [`poll`](ReceiverService::poll) handles at most one datagram and
//! blocks for at most the configured poll timeout.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::info;

use super::events::{AppEvent, NodeRole};
use super::ports::{ActuatorLink, Clock, DatagramSocket, EventSink};
use crate::audio::AudioPlayer;
use crate::color::Label;
use crate::config::ReceiverConfig;
use crate::error::{ActuatorError, DatagramDecodeError, NetError};
use crate::net::{EventReceiver, ReceiveOutcome};
use crate::suppress::{Decision, RepeatSuppressor};

/// Pause after a socket failure before polling again.
pub const NET_FAULT_BACKOFF: Duration = Duration::from_millis(500);

/// What one poll did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReceiverTick {
    Idle,
    /// Undecodable datagram, not acked.
    Dropped(DatagramDecodeError),
    /// Acked, no track for the label.
    Unmapped,
    /// Acked and mapped, but a repeat inside the cooldown.
    Suppressed { label: Label, remaining: Duration },
    Played { label: Label, track: u16 },
    /// Acked and admitted, but the frame could not be written.
    ActuatorFault(ActuatorError),
    /// The socket failed for a reason other than the poll timeout.
    NetFault(NetError),
}

impl ReceiverTick {
    /// How long the caller should wait before the next poll.  Every
    /// outcome except a socket failure has already blocked for its share
    /// of the poll timeout.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::NetFault(_) => Some(NET_FAULT_BACKOFF),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub datagrams: u32,
    pub dropped: u32,
    pub unmapped: u32,
    pub suppressed: u32,
    pub played: u32,
    pub actuator_faults: u32,
}

pub struct ReceiverService<S, L> {
    receiver: EventReceiver<S>,
    player: AudioPlayer<L>,
    suppressor: RepeatSuppressor,
    volume: u8,
    stats: ReceiverStats,
}

impl<S: DatagramSocket, L: ActuatorLink> ReceiverService<S, L> {
    pub fn new(config: &ReceiverConfig, socket: S, link: L) -> Self {
        Self {
            receiver: EventReceiver::new(socket, config.audio.track_map.clone(), config.poll_timeout()),
            player: AudioPlayer::new(link),
            suppressor: RepeatSuppressor::new(config.repeat_cooldown()),
            volume: config.dfplayer.volume,
            stats: ReceiverStats::default(),
        }
    }

    /// Apply the configured volume and announce the start.  A volume
    /// failure is reported but leaves the service usable.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<(), ActuatorError> {
        let result = self.player.set_volume(self.volume);
        if let Err(e) = result {
            sink.emit(&AppEvent::ActuatorFault(e));
        }
        sink.emit(&AppEvent::Started(NodeRole::Receiver));
        info!(
            "ReceiverService started, volume {}, {} mapped label(s)",
            self.volume,
            self.receiver.mapping().len()
        );
        result
    }

    /// Receive and act on at most one datagram.
    pub fn poll(&mut self, clock: &impl Clock, sink: &mut impl EventSink) -> ReceiverTick {
        let outcome = match self.receiver.poll_once() {
            Ok(o) => o,
            Err(e) => {
                sink.emit(&AppEvent::NetFault(e));
                return ReceiverTick::NetFault(e);
            }
        };

        let (label, track, confidence) = match outcome {
            ReceiveOutcome::Idle => return ReceiverTick::Idle,
            ReceiveOutcome::Dropped { error, from } => {
                self.stats.datagrams = self.stats.datagrams.wrapping_add(1);
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                sink.emit(&AppEvent::DatagramDropped { error, from });
                return ReceiverTick::Dropped(error);
            }
            ReceiveOutcome::Unmapped { label, from } => {
                self.stats.datagrams = self.stats.datagrams.wrapping_add(1);
                self.stats.unmapped = self.stats.unmapped.wrapping_add(1);
                sink.emit(&AppEvent::Unmapped { label, from });
                return ReceiverTick::Unmapped;
            }
            ReceiveOutcome::Accepted {
                label,
                track,
                confidence,
                ..
            } => (label, track, confidence),
        };
        self.stats.datagrams = self.stats.datagrams.wrapping_add(1);

        if let Decision::Suppress { remaining } = self.suppressor.admit(label, clock.now()) {
            self.stats.suppressed = self.stats.suppressed.wrapping_add(1);
            sink.emit(&AppEvent::Suppressed { label, remaining });
            return ReceiverTick::Suppressed { label, remaining };
        }

        match self.player.play(track) {
            Ok(()) => {
                self.stats.played = self.stats.played.wrapping_add(1);
                sink.emit(&AppEvent::Played {
                    label,
                    track,
                    confidence,
                });
                ReceiverTick::Played { label, track }
            }
            Err(e) => {
                self.stats.actuator_faults = self.stats.actuator_faults.wrapping_add(1);
                sink.emit(&AppEvent::ActuatorFault(e));
                ReceiverTick::ActuatorFault(e)
            }
        }
    }

    /// One iteration of the node loop: [`poll`](Self::poll), then back
    /// off through `delay` if the socket failed.
    pub fn run_once(
        &mut self,
        clock: &impl Clock,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> ReceiverTick {
        let tick = self.poll(clock, sink);
        if let Some(pause) = tick.retry_after() {
            delay.delay_ms(u32::try_from(pause.as_millis()).unwrap_or(u32::MAX));
        }
        tick
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    pub fn player(&self) -> &AudioPlayer<L> {
        &self.player
    }

    pub fn receiver_mut(&mut self) -> &mut EventReceiver<S> {
        &mut self.receiver
    }

    pub fn suppressor(&self) -> &RepeatSuppressor {
        &self.suppressor
    }
}
