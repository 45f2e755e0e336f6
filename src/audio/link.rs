//! Byte-stream link to the actuator module.
//!
//! Concrete implementations:
//! - UART on the receiver board (`adapters::uart::UartLink`, ESP-IDF only)
//! - any `std::io::Write` (host serial device, file, `Vec<u8>`)
//! - [`NullLink`] when no player is attached

/// Byte-oriented, write-only channel.
pub trait ActuatorLink {
    type Error: core::fmt::Debug;

    /// Write `data`, returning the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<L: ActuatorLink + ?Sized> ActuatorLink for &mut L {
    type Error = L::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Discards all writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLink;

impl ActuatorLink for NullLink {
    type Error = core::convert::Infallible;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Adapter for anything implementing `std::io::Write`.
pub struct IoLink<W>(pub W);

impl<W: std::io::Write> ActuatorLink for IoLink<W> {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.0.write_all(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}

impl<W> IoLink<W> {
    pub fn into_inner(self) -> W {
        self.0
    }
}
