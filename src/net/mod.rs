//! Sender ↔ receiver messaging over a connectionless datagram channel.
//!
//! ```text
//!  sender                                   receiver
//!  ──────                                   ────────
//!  ReliableNotifier ── "Red:0.87" ──────▶  EventReceiver
//!        ▲                                       │
//!        └────────────── "ACK" ◀─────────────────┘
//!   (retry on timeout / mismatch,           (ack on receipt, before
//!    at most `max_attempts` sends)            the label is checked)
//! ```
//!
//! Delivery is best-effort: no deduplication, no ordering across sends.
//! Both ends are generic over [`DatagramSocket`] so tests can script
//! replies and timeouts without real sockets or real delay.

pub mod notifier;
pub mod receiver;
pub mod wire;

use core::time::Duration;
use std::net::SocketAddr;

use crate::error::NetError;

pub use notifier::{NotifierConfig, ReliableNotifier};
pub use receiver::{EventReceiver, ReceiveOutcome};

/// Connectionless datagram endpoint.
pub trait DatagramSocket {
    /// Send one datagram to `peer`.
    fn send_to(&mut self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError>;

    /// Wait at most `timeout` for one datagram.  Returns the number of
    /// bytes written to `buf` and the sender's address, or
    /// [`NetError::Timeout`] when the deadline passes.
    fn recv_from(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(usize, SocketAddr), NetError>;
}

impl<T: DatagramSocket + ?Sized> DatagramSocket for &mut T {
    fn send_to(&mut self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError> {
        (**self).send_to(payload, peer)
    }

    fn recv_from(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(usize, SocketAddr), NetError> {
        (**self).recv_from(buf, timeout)
    }
}
