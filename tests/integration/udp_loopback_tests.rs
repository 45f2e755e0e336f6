//! Real UDP sockets on 127.0.0.1: notifier ↔ receiver end to end.

use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use spectrum::adapters::time::MonotonicClock;
use spectrum::adapters::udp::UdpAdapter;
use spectrum::app::{ReceiverService, ReceiverTick};
use spectrum::audio::IoLink;
use spectrum::color::Label;
use spectrum::config::ReceiverConfig;
use spectrum::net::{DatagramSocket, NotifierConfig, ReliableNotifier};
use spectrum::stability::Event;

use crate::mock_hw::RecordingSink;

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

fn event(label: Label, confidence: f32) -> Event {
    Event {
        label,
        confidence,
        timestamp: Duration::ZERO,
    }
}

#[test]
fn notifier_and_receiver_complete_a_round_trip() {
    let rx_socket = UdpAdapter::bind(loopback()).unwrap();
    let rx_addr = rx_socket.local_addr().unwrap();

    let mut config = ReceiverConfig::default();
    config.network.poll_timeout_ms = 100;

    let receiver = thread::spawn(move || {
        let mut svc = ReceiverService::new(&config, rx_socket, IoLink(Vec::new()));
        let clock = MonotonicClock::new();
        let mut sink = RecordingSink::new();
        for _ in 0..50 {
            if let ReceiverTick::Played { label, track } = svc.poll(&clock, &mut sink) {
                return Some((label, track, svc.player().link().0.clone()));
            }
        }
        None
    });

    let tx_socket = UdpAdapter::bind(loopback()).unwrap();
    let mut notifier = ReliableNotifier::new(tx_socket, rx_addr, NotifierConfig::default());
    assert!(notifier.send(&event(Label::Yellow, 0.8)));

    let (label, track, bytes) = receiver.join().unwrap().expect("receiver never played");
    assert_eq!(label, Label::Yellow);
    assert_eq!(track, 4);
    assert_eq!(bytes.len(), 10);
    assert_eq!(bytes[3], 0x03);
    assert_eq!(u16::from_be_bytes([bytes[5], bytes[6]]), 4);
}

#[test]
fn silent_peer_exhausts_attempts() {
    // Bound but never answers, so no ICMP errors reach the sender.
    let silent = UdpSocket::bind(loopback()).unwrap();
    let silent_addr = silent.local_addr().unwrap();

    let cfg = NotifierConfig {
        ack_timeout: Duration::from_millis(50),
        max_attempts: 3,
    };
    let mut notifier = ReliableNotifier::new(UdpAdapter::bind(loopback()).unwrap(), silent_addr, cfg);

    let started = Instant::now();
    assert!(!notifier.send(&event(Label::Blue, 0.8)));
    assert!(started.elapsed() >= Duration::from_millis(150));

    silent.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
    let mut buf = [0u8; 64];
    for _ in 0..3 {
        let (n, _) = silent.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"Blue:0.80");
    }
}

#[test]
fn adapter_reports_timeout_when_nothing_arrives() {
    let mut socket = UdpAdapter::bind(loopback()).unwrap();
    let mut buf = [0u8; 8];
    let err = socket.recv_from(&mut buf, Duration::from_millis(20)).unwrap_err();
    assert_eq!(err, spectrum::error::NetError::Timeout);
}
