//! Sensor drivers.
//!
//! Drivers are generic over `embedded-hal` 1.0 traits so the same code
//! runs against `esp_idf_hal::i2c::I2cDriver` on the board and against a
//! register-file mock in host tests.

pub mod tcs34725;

pub use tcs34725::{Gain, IntegrationTime, Tcs34725};
