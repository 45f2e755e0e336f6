//! UART link to the DFPlayer Mini (9600 8N1).

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartDriver;

use crate::audio::ActuatorLink;

pub const DFPLAYER_BAUD: u32 = 9600;

pub struct UartLink<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartLink<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl ActuatorLink for UartLink<'_> {
    type Error = EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(BLOCK)
    }
}
