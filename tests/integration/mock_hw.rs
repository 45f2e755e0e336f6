//! Mock hardware and network for integration tests.
//!
//! The simulated clock only moves when a test (or a timed-out receive)
//! advances it, so timing assertions are exact and nothing sleeps.

use std::cell::Cell;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use spectrum::app::AppEvent;
use spectrum::app::ports::{ActuatorLink, Clock, ColorSensor, DatagramSocket, EventSink};
use spectrum::audio::{CommandFrame, FRAME_LEN};
use spectrum::color::Sample;
use spectrum::error::{NetError, SensorError};

pub fn sender_addr() -> SocketAddr {
    "192.168.4.1:50000".parse().unwrap()
}

pub fn receiver_addr() -> SocketAddr {
    "192.168.4.2:4210".parse().unwrap()
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<Duration>>);

#[allow(dead_code)]
impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn now_ms(&self) -> u128 {
        self.0.get().as_millis()
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

/// Delay that advances the simulated clock instead of sleeping.
pub struct SimDelay(pub SimClock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance(Duration::from_nanos(u64::from(ns)));
    }
}

// ── Sensor ────────────────────────────────────────────────────

/// Returns scripted readings in order; an exhausted script reads as a
/// bus error.
#[derive(Default)]
pub struct ScriptedSensor {
    script: VecDeque<Result<Sample, SensorError>>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repeat(sample: Sample, times: usize) -> Self {
        let mut s = Self::new();
        s.push_n(sample, times);
        s
    }

    pub fn push(&mut self, sample: Sample) -> &mut Self {
        self.script.push_back(Ok(sample));
        self
    }

    pub fn push_n(&mut self, sample: Sample, times: usize) -> &mut Self {
        for _ in 0..times {
            self.script.push_back(Ok(sample));
        }
        self
    }

    pub fn push_fault(&mut self, e: SensorError) -> &mut Self {
        self.script.push_back(Err(e));
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ColorSensor for ScriptedSensor {
    fn read_raw(&mut self) -> Result<Sample, SensorError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Err(SensorError::Bus))
    }
}

// ── Datagram socket ───────────────────────────────────────────

/// In-memory datagram socket.  A receive on an empty inbox advances the
/// shared clock by the full timeout and reports `Timeout`.
pub struct ScriptedSocket {
    clock: SimClock,
    inbox: VecDeque<(Vec<u8>, SocketAddr)>,
    pub sent: Vec<(Vec<u8>, SocketAddr)>,
    /// Queue an `ACK` from the peer after every send.
    pub auto_ack: bool,
    /// Fail every receive with this error instead of reading the inbox.
    pub recv_error: Option<NetError>,
}

#[allow(dead_code)]
impl ScriptedSocket {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            inbox: VecDeque::new(),
            sent: Vec::new(),
            auto_ack: false,
            recv_error: None,
        }
    }

    pub fn acking(clock: SimClock) -> Self {
        Self {
            auto_ack: true,
            ..Self::new(clock)
        }
    }

    pub fn deliver(&mut self, payload: &[u8], from: SocketAddr) {
        self.inbox.push_back((payload.to_vec(), from));
    }

    pub fn sent_payloads(&self) -> Vec<&[u8]> {
        self.sent.iter().map(|(p, _)| p.as_slice()).collect()
    }
}

impl DatagramSocket for ScriptedSocket {
    fn send_to(&mut self, payload: &[u8], peer: SocketAddr) -> Result<(), NetError> {
        self.sent.push((payload.to_vec(), peer));
        if self.auto_ack {
            self.inbox.push_back((b"ACK".to_vec(), peer));
        }
        Ok(())
    }

    fn recv_from(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(usize, SocketAddr), NetError> {
        if let Some(e) = self.recv_error {
            return Err(e);
        }
        match self.inbox.pop_front() {
            Some((payload, from)) => {
                let n = payload.len().min(buf.len());
                buf[..n].copy_from_slice(&payload[..n]);
                Ok((n, from))
            }
            None => {
                self.clock.advance(timeout);
                Err(NetError::Timeout)
            }
        }
    }
}

// ── Actuator link ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingLink {
    pub bytes: Vec<u8>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every complete frame written so far, parsed.
    pub fn frames(&self) -> Vec<CommandFrame> {
        self.bytes
            .chunks(FRAME_LEN)
            .map(|c| CommandFrame::parse(c).expect("link carried a malformed frame"))
            .collect()
    }
}

impl ActuatorLink for RecordingLink {
    type Error = ();

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        if self.fail {
            return Err(());
        }
        self.bytes.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
