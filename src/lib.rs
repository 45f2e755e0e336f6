//! Sensory Spectrum firmware library.
//!
//! Two ESP32 nodes share this crate: the sensing node classifies colour
//! samples and notifies the actuating node over UDP, which plays a mapped
//! audio track.  Every module except the ESP-IDF adapters builds and
//! tests on the host; board-only code sits behind the `espidf` feature.
//!
//! ```text
//!  TCS34725 ─▶ classify ─▶ stability gate ─▶ ReliableNotifier ══UDP══▶ EventReceiver ─▶ repeat suppressor ─▶ DFPlayer
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod audio;
pub mod color;
pub mod config;
pub mod error;
pub mod net;
pub mod sensors;
pub mod stability;
pub mod suppress;

pub use error::{Error, Result};
