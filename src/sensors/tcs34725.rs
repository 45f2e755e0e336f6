//! TCS34725 / TCS34727 RGBC light-to-digital converter.
//!
//! ## Register access
//!
//! Every transaction starts with a command byte: `0x80 | register`.
//! Multi-byte reads auto-increment, so the eight data bytes
//! (clear, red, green, blue; little-endian words) come from a single
//! write-read starting at `CDATAL`.
//!
//! ## Bring-up
//!
//! 1. ID must read `0x44` (TCS34721/5) or `0x4D` (TCS34723/7).
//! 2. `ENABLE = PON`, wait 3 ms for the oscillator.
//! 3. `ENABLE = PON | AEN` to start RGBC integration.
//! 4. Integration time 50 ms, gain 4×.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::app::ports::ColorSensor;
use crate::color::Sample;
use crate::error::SensorError;

pub const DEFAULT_ADDRESS: u8 = 0x29;

const COMMAND_BIT: u8 = 0x80;

const REG_ENABLE: u8 = 0x00;
const REG_ATIME: u8 = 0x01;
const REG_CONTROL: u8 = 0x0F;
const REG_ID: u8 = 0x12;
const REG_STATUS: u8 = 0x13;
const REG_CDATAL: u8 = 0x14;

const ENABLE_PON: u8 = 0x01;
const ENABLE_AEN: u8 = 0x02;
const STATUS_AVALID: u8 = 0x01;

const KNOWN_IDS: [u8; 2] = [0x44, 0x4D];
const POWER_ON_DELAY_MS: u32 = 3;

/// ATIME register values.  Longer integration is more accurate but slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    Ms2_4 = 0xFF,
    Ms24 = 0xF6,
    Ms50 = 0xEB,
    Ms101 = 0xD5,
    Ms154 = 0xC0,
    Ms700 = 0x00,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    X1 = 0x00,
    X4 = 0x01,
    X16 = 0x02,
    X60 = 0x03,
}

pub struct Tcs34725<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    integration: IntegrationTime,
    gain: Gain,
}

impl<I2C: I2c, D: DelayNs> Tcs34725<I2C, D> {
    /// Probe and configure the sensor at [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C, delay: D) -> Result<Self, SensorError> {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Result<Self, SensorError> {
        let mut dev = Self {
            i2c,
            delay,
            address,
            integration: IntegrationTime::Ms50,
            gain: Gain::X4,
        };

        let id = dev.read_byte(REG_ID)?;
        if !KNOWN_IDS.contains(&id) {
            return Err(SensorError::UnknownDevice(id));
        }

        dev.enable(true)?;
        dev.set_integration_time(IntegrationTime::Ms50)?;
        dev.set_gain(Gain::X4)?;
        dev.delay.delay_ms(POWER_ON_DELAY_MS);

        info!("TCS34725 ready (id={:#04x}, addr={:#04x})", id, address);
        Ok(dev)
    }

    /// Power the ADC on (PON, then PON|AEN) or fully off.
    pub fn enable(&mut self, on: bool) -> Result<(), SensorError> {
        if on {
            self.write_byte(REG_ENABLE, ENABLE_PON)?;
            self.delay.delay_ms(POWER_ON_DELAY_MS);
            self.write_byte(REG_ENABLE, ENABLE_PON | ENABLE_AEN)
        } else {
            self.write_byte(REG_ENABLE, 0x00)
        }
    }

    pub fn set_integration_time(&mut self, atime: IntegrationTime) -> Result<(), SensorError> {
        self.write_byte(REG_ATIME, atime as u8)?;
        self.integration = atime;
        Ok(())
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), SensorError> {
        self.write_byte(REG_CONTROL, gain as u8)?;
        self.gain = gain;
        Ok(())
    }

    pub fn integration_time(&self) -> IntegrationTime {
        self.integration
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Read one RGBC sample.
    ///
    /// If the integration cycle has not completed the driver waits 3 ms
    /// and checks once more before giving up with `NotReady`.
    pub fn read_rgbc(&mut self) -> Result<Sample, SensorError> {
        if !self.data_valid()? {
            self.delay.delay_ms(POWER_ON_DELAY_MS);
            if !self.data_valid()? {
                return Err(SensorError::NotReady);
            }
        }

        let mut buf = [0u8; 8];
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | REG_CDATAL], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        let word = |i: usize| u16::from_le_bytes([buf[i], buf[i + 1]]);
        let sample = Sample::new(word(2), word(4), word(6), word(0));
        debug!(
            "TCS34725 C={} R={} G={} B={}",
            sample.clear, sample.r, sample.g, sample.b
        );
        Ok(sample)
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn data_valid(&mut self) -> Result<bool, SensorError> {
        Ok(self.read_byte(REG_STATUS)? & STATUS_AVALID != 0)
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[COMMAND_BIT | reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[COMMAND_BIT | reg, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c, D: DelayNs> ColorSensor for Tcs34725<I2C, D> {
    fn read_raw(&mut self) -> Result<Sample, SensorError> {
        self.read_rgbc()
    }
}
