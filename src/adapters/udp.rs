//! `DatagramSocket` over `std::net::UdpSocket`.
//!
//! ESP-IDF ships an lwIP-backed std, so the same adapter serves the
//! board and host loopback tests.  Receive deadlines map onto
//! `set_read_timeout`; the OS reports an expired deadline as
//! `WouldBlock` or `TimedOut`, both surfaced as [`NetError::Timeout`].

use core::time::Duration;
use std::net::{SocketAddr, UdpSocket};

use log::info;

use crate::error::NetError;
use crate::net::DatagramSocket;

/// `set_read_timeout` rejects a zero duration.
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

pub struct UdpAdapter {
    socket: UdpSocket,
    read_timeout: Option<Duration>,
}

impl UdpAdapter {
    pub fn bind(addr: SocketAddr) -> Result<Self, NetError> {
        let socket = UdpSocket::bind(addr).map_err(|e| NetError::from_io(&e))?;
        if let Ok(local) = socket.local_addr() {
            info!("UDP | bound {}", local);
        }
        Ok(Self {
            socket,
            read_timeout: None,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        self.socket.local_addr().map_err(|e| NetError::from_io(&e))
    }
}

impl DatagramSocket for UdpAdapter {
    fn send_to(&mut self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError> {
        self.socket
            .send_to(payload, peer)
            .map(|_| ())
            .map_err(|e| NetError::from_io(&e))
    }

    fn recv_from(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(usize, SocketAddr), NetError> {
        let timeout = timeout.max(MIN_TIMEOUT);
        if self.read_timeout != Some(timeout) {
            self.socket
                .set_read_timeout(Some(timeout))
                .map_err(|e| NetError::from_io(&e))?;
            self.read_timeout = Some(timeout);
        }
        self.socket.recv_from(buf).map_err(|e| NetError::from_io(&e))
    }
}
