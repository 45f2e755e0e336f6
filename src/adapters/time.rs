//! Monotonic clock and blocking delay.
//!
//! - **`espidf` feature**: wraps `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic since boot).
//! - **host**: uses `std::time::Instant` relative to construction.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[cfg(feature = "espidf")]
    fn now(&self) -> Duration {
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64)
    }

    #[cfg(not(feature = "espidf"))]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// `DelayNs` over `std::thread::sleep` (a FreeRTOS task delay on the board).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
