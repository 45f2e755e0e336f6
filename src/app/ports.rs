//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SenderService / ReceiverService
//! ```
//!
//! Driven adapters (colour sensor, clock, datagram socket, actuator link,
//! event sinks, config storage) implement these traits.  The services
//! consume them via generics, so the domain core never touches hardware
//! directly and every test can substitute a scripted double.

use core::fmt;
use core::time::Duration;

use crate::color::Sample;
use crate::error::SensorError;

pub use crate::audio::ActuatorLink;
pub use crate::net::DatagramSocket;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for an RGB colour sensor.
pub trait ColorSensor {
    /// One raw RGBC reading.  A failure skips the sample; it is never fatal.
    fn read_raw(&mut self) -> Result<Sample, SensorError>;
}

impl<T: ColorSensor + ?Sized> ColorSensor for &mut T {
    fn read_raw(&mut self) -> Result<Sample, SensorError> {
        (**self).read_raw()
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait Clock {
    fn now(&self) -> Duration;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists one node's configuration.
///
/// Implementations MUST validate before returning or persisting.  Invalid
/// values are rejected with [`ConfigError::ValidationFailed`], never
/// silently clamped.
pub trait ConfigPort<T> {
    fn load(&self) -> Result<T, ConfigError>;

    fn save(&self, config: &T) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No stored config (first boot).
    NotFound,
    /// Stored config is not valid JSON for this node.
    Corrupted,
    /// A field failed range validation; the message names it.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
