//! Datagram wire format.
//!
//! Event (sender → receiver): ASCII `<Label>:<Confidence>`, confidence
//! with exactly two decimals, e.g. `Red:0.87`.
//!
//! Ack (receiver → sender): the three bytes `ACK`.

use core::fmt::Write;

use crate::color::Label;
use crate::error::DatagramDecodeError;

/// Acknowledgment literal.
pub const ACK: &[u8; 3] = b"ACK";

/// Largest datagram the receiver reads; longer ones are truncated by the OS.
pub const MAX_DATAGRAM_SIZE: usize = 512;

/// Capacity of an encoded event (`Magenta:1.00` is 12 bytes).
pub const EVENT_PAYLOAD_CAP: usize = 24;

pub type EventPayload = heapless::String<EVENT_PAYLOAD_CAP>;

/// Encode an event payload.  Confidence is clamped to `[0, 1]`.
pub fn encode_event(label: Label, confidence: f32) -> EventPayload {
    let confidence = if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    };
    let mut out = EventPayload::new();
    // Longest label plus ":1.00" fits well inside the capacity.
    let _ = write!(out, "{}:{:.2}", label, confidence);
    out
}

/// A decoded event datagram.  The label is not validated here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedEvent<'a> {
    pub label: &'a str,
    /// 0.0 when the field is absent or unparsable.
    pub confidence: f32,
}

/// Decode an event datagram.
///
/// The text is trimmed and split on the first `:`.  A missing or
/// malformed confidence falls back to 0.0; only an empty datagram or
/// invalid UTF-8 is an error.
pub fn decode_event(datagram: &[u8]) -> Result<DecodedEvent<'_>, DatagramDecodeError> {
    if datagram.is_empty() {
        return Err(DatagramDecodeError::Empty);
    }
    let text = core::str::from_utf8(datagram)
        .map_err(|_| DatagramDecodeError::InvalidUtf8)?
        .trim();

    let (label, confidence) = match text.split_once(':') {
        Some((label, raw)) => (label, parse_confidence(raw)),
        None => (text, 0.0),
    };
    Ok(DecodedEvent { label, confidence })
}

fn parse_confidence(raw: &str) -> f32 {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|c| c.is_finite())
        .unwrap_or(0.0)
}

pub fn is_ack(reply: &[u8]) -> bool {
    reply == ACK
}
