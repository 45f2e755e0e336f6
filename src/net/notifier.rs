//! Bounded-retry event delivery.
//!
//! Each attempt sends the identical payload and waits up to
//! `ack_timeout` for the ack literal.  A timeout, a non-ack reply or a
//! socket error all consume one attempt.  The worst-case blocking time
//! of one `send` is `ack_timeout × max_attempts`.
//!
//! Replies still queued from an earlier send (a late ack) are drained
//! before the first attempt so they cannot confirm the new datagram.

use core::time::Duration;
use std::net::SocketAddr;

use log::{debug, warn};

use super::DatagramSocket;
use super::wire::{self, MAX_DATAGRAM_SIZE};
use crate::error::{DeliveryFailure, NetError};
use crate::stability::Event;

/// Upper bound on stale replies discarded before a send.
const DRAIN_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    pub ack_timeout: Duration,
    /// Total sends per event, first one included.  Zero is treated as one.
    pub max_attempts: u8,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_millis(500),
            max_attempts: 3,
        }
    }
}

/// Successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered {
    /// 1-based attempt that got the ack.
    pub attempt: u8,
}

pub struct ReliableNotifier<S> {
    socket: S,
    peer: SocketAddr,
    config: NotifierConfig,
    reply: [u8; MAX_DATAGRAM_SIZE],
}

impl<S: DatagramSocket> ReliableNotifier<S> {
    pub fn new(socket: S, peer: SocketAddr, config: NotifierConfig) -> Self {
        Self {
            socket,
            peer,
            config,
            reply: [0; MAX_DATAGRAM_SIZE],
        }
    }

    /// Send `event` and report whether an ack for this send arrived
    /// within the bound.
    pub fn send(&mut self, event: &Event) -> bool {
        self.deliver(event).is_ok()
    }

    /// Like [`send`](Self::send) but returns the attempt that succeeded,
    /// or the failure of the last attempt.
    pub fn deliver(&mut self, event: &Event) -> Result<Delivered, DeliveryFailure> {
        let payload = wire::encode_event(event.label, event.confidence);
        self.deliver_payload(payload.as_bytes())
    }

    pub fn deliver_payload(&mut self, payload: &[u8]) -> Result<Delivered, DeliveryFailure> {
        self.drain_stale_replies();

        let attempts = self.config.max_attempts.max(1);
        let mut last = DeliveryFailure::AckTimeout;

        for attempt in 1..=attempts {
            match self.attempt(payload) {
                Ok(()) => {
                    debug!("SEND | ack on attempt {}/{}", attempt, attempts);
                    return Ok(Delivered { attempt });
                }
                Err(e) => {
                    warn!("SEND | attempt {}/{} to {}: {}", attempt, attempts, self.peer, e);
                    last = e;
                }
            }
        }
        Err(last)
    }

    fn drain_stale_replies(&mut self) {
        for _ in 0..DRAIN_LIMIT {
            match self.socket.recv_from(&mut self.reply, Duration::ZERO) {
                Ok((n, from)) => debug!("SEND | discarded stale {} byte reply from {}", n, from),
                Err(_) => break,
            }
        }
    }

    fn attempt(&mut self, payload: &[u8]) -> Result<(), DeliveryFailure> {
        self.socket
            .send_to(payload, self.peer)
            .map_err(DeliveryFailure::Send)?;

        match self.socket.recv_from(&mut self.reply, self.config.ack_timeout) {
            Ok((n, _from)) if wire::is_ack(&self.reply[..n]) => Ok(()),
            Ok(_) => Err(DeliveryFailure::AckMismatch),
            Err(NetError::Timeout) => Err(DeliveryFailure::AckTimeout),
            Err(e) => Err(DeliveryFailure::Receive(e)),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }
}
