//! Receiver endpoint: one datagram per poll.
//!
//! Order per datagram: decode → ack → map.  The ack confirms receipt
//! only; a label missing from the [`TrackMapping`] is still acked and
//! then reported as [`ReceiveOutcome::Unmapped`].  Undecodable datagrams
//! are never acked.

use core::time::Duration;
use std::net::SocketAddr;

use log::{debug, warn};

use super::DatagramSocket;
use super::wire::{self, ACK, MAX_DATAGRAM_SIZE};
use crate::audio::TrackMapping;
use crate::color::Label;
use crate::error::{DatagramDecodeError, NetError};

/// Longest unmapped label kept for reporting; longer ones are truncated.
pub const UNMAPPED_LABEL_CAP: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// Nothing arrived before the poll timeout.
    Idle,
    /// Undecodable; no ack was sent.
    Dropped {
        error: DatagramDecodeError,
        from: SocketAddr,
    },
    /// Acked, but the label has no track.
    Unmapped {
        label: heapless::String<UNMAPPED_LABEL_CAP>,
        from: SocketAddr,
    },
    /// Acked and mapped.
    Accepted {
        label: Label,
        track: u16,
        confidence: f32,
        from: SocketAddr,
    },
}

pub struct EventReceiver<S> {
    socket: S,
    mapping: TrackMapping,
    poll_timeout: Duration,
    buf: [u8; MAX_DATAGRAM_SIZE],
}

impl<S: DatagramSocket> EventReceiver<S> {
    pub fn new(socket: S, mapping: TrackMapping, poll_timeout: Duration) -> Self {
        Self {
            socket,
            mapping,
            poll_timeout,
            buf: [0; MAX_DATAGRAM_SIZE],
        }
    }

    /// Wait for and process at most one datagram.
    ///
    /// Only socket failures other than the poll timeout are errors.
    pub fn poll_once(&mut self) -> Result<ReceiveOutcome, NetError> {
        let (n, from) = match self.socket.recv_from(&mut self.buf, self.poll_timeout) {
            Ok(r) => r,
            Err(NetError::Timeout) => return Ok(ReceiveOutcome::Idle),
            Err(e) => return Err(e),
        };

        let decoded = match wire::decode_event(&self.buf[..n]) {
            Ok(d) => d,
            Err(error) => {
                debug!("RECV | dropped {} byte(s) from {}: {}", n, from, error);
                return Ok(ReceiveOutcome::Dropped { error, from });
            }
        };

        // Ack failure does not invalidate the datagram; the sender will
        // retry and the repeat suppressor absorbs the duplicate.
        if let Err(e) = self.socket.send_to(ACK, from) {
            warn!("RECV | ack to {} failed: {}", from, e);
        }

        match self.mapping.resolve(decoded.label) {
            Some((label, track)) => Ok(ReceiveOutcome::Accepted {
                label,
                track,
                confidence: decoded.confidence,
                from,
            }),
            None => Ok(ReceiveOutcome::Unmapped {
                label: truncate(decoded.label),
                from,
            }),
        }
    }

    pub fn mapping(&self) -> &TrackMapping {
        &self.mapping
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }
}

fn truncate(text: &str) -> heapless::String<UNMAPPED_LABEL_CAP> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
