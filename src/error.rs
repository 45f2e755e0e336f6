//! Unified error types for the Sensory Spectrum firmware.
//!
//! Every failure kind in the event pipeline has its own small `Copy` enum
//! so the call site can pick a recovery action per variant:
//!
//! | Kind                  | Raised by          | Recovery                              |
//! |-----------------------|--------------------|---------------------------------------|
//! | [`SensorError`]       | `ColorSensor`      | log, skip the sample, keep looping    |
//! | [`DatagramDecodeError`]| `net::wire`       | drop the datagram, send no ack        |
//! | [`DeliveryFailure`]   | `ReliableNotifier` | retry up to `max_attempts`, then report `false` |
//! | [`NetError`]          | `DatagramSocket`   | treated as a failed attempt / idle poll |
//! | [`CodecError`]        | `audio::codec`     | refuse the command, log               |
//! | [`ActuatorError`]     | `AudioPlayer`      | log, next event retries naturally     |
//!
//! All of them funnel into [`Error`] for callers that only need to bubble up.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Sensor(SensorError),
    Decode(DatagramDecodeError),
    Delivery(DeliveryFailure),
    Net(NetError),
    Codec(CodecError),
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Decode(e) => write!(f, "datagram: {e}"),
            Self::Delivery(e) => write!(f, "delivery: {e}"),
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The I2C transaction failed (NACK, arbitration loss, bus fault).
    Bus,
    /// The RGBC integration cycle has not completed yet.
    NotReady,
    /// The ID register did not identify a TCS3472x part.
    UnknownDevice(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
            Self::NotReady => write!(f, "RGBC data not ready"),
            Self::UnknownDevice(id) => write!(f, "unexpected device id {id:#04x}"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Datagram decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatagramDecodeError {
    /// Zero-length datagram.
    Empty,
    /// Payload is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for DatagramDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty datagram"),
            Self::InvalidUtf8 => write!(f, "payload is not UTF-8"),
        }
    }
}

impl std::error::Error for DatagramDecodeError {}

impl From<DatagramDecodeError> for Error {
    fn from(e: DatagramDecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// Nothing arrived before the receive deadline.
    Timeout,
    /// Any other socket failure.
    Io(std::io::ErrorKind),
}

impl NetError {
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => Self::Timeout,
            kind => Self::Io(kind),
        }
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Io(kind) => write!(f, "socket error ({kind})"),
        }
    }
}

impl std::error::Error for NetError {}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

/// Why a single send/ack attempt did not confirm delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// No reply within `ack_timeout`.
    AckTimeout,
    /// A reply arrived but was not the ack literal.
    AckMismatch,
    /// The datagram could not be sent.
    Send(NetError),
    /// Waiting for the reply failed for a reason other than the deadline.
    Receive(NetError),
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckTimeout => write!(f, "ack timeout"),
            Self::AckMismatch => write!(f, "unexpected reply"),
            Self::Send(e) => write!(f, "send failed: {e}"),
            Self::Receive(e) => write!(f, "receive failed: {e}"),
        }
    }
}

impl std::error::Error for DeliveryFailure {}

impl From<DeliveryFailure> for Error {
    fn from(e: DeliveryFailure) -> Self {
        Self::Delivery(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator codec / link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Track numbers are limited to 1..=3000.
    TrackOutOfRange(u16),
    /// A frame must be exactly 10 bytes.
    BadLength(usize),
    /// Start/end delimiter, version or length byte is wrong.
    BadHeader,
    ChecksumMismatch { expected: u16, found: u16 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackOutOfRange(n) => write!(f, "track {n} outside 1..=3000"),
            Self::BadLength(n) => write!(f, "frame length {n}, expected 10"),
            Self::BadHeader => write!(f, "bad frame header"),
            Self::ChecksumMismatch { expected, found } => {
                write!(f, "checksum {found:#06x}, expected {expected:#06x}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The frame could not be built.
    Codec(CodecError),
    /// The byte-stream link reported an error.
    LinkWrite,
    /// The link accepted fewer bytes than the frame holds.
    ShortWrite { written: usize },
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "{e}"),
            Self::LinkWrite => write!(f, "link write failed"),
            Self::ShortWrite { written } => write!(f, "short write ({written} of 10 bytes)"),
        }
    }
}

impl From<CodecError> for ActuatorError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
