//! Fixed 10-byte command frame.
//!
//! ```text
//!  0     1        2       3        4         5        6        7       8       9
//!  0x7E  VERSION  LEN=06  COMMAND  FEEDBACK  PARAM_H  PARAM_L  CSUM_H  CSUM_L  0xEF
//! ```
//!
//! The checksum is the 16-bit two's complement of the sum of bytes 1..=6.

use crate::error::CodecError;

pub const FRAME_LEN: usize = 10;

const START: u8 = 0x7E;
const VERSION: u8 = 0xFF;
const LENGTH: u8 = 0x06;
const NO_FEEDBACK: u8 = 0x00;
const END: u8 = 0xEF;

pub const MAX_TRACK: u16 = 3000;
pub const MAX_VOLUME: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    PlayTrack = 0x03,
    SetVolume = 0x06,
    Pause = 0x0E,
    Stop = 0x16,
}

impl Command {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x03 => Some(Self::PlayTrack),
            0x06 => Some(Self::SetVolume),
            0x0E => Some(Self::Pause),
            0x16 => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Checksum over the six body bytes (version through param low).
pub fn checksum(body: &[u8]) -> u16 {
    let sum = body.iter().fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    0u16.wrapping_sub(sum)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame([u8; FRAME_LEN]);

impl CommandFrame {
    /// Build a frame for any command code and 16-bit parameter.
    pub fn new(command: u8, param: u16) -> Self {
        let [param_h, param_l] = param.to_be_bytes();
        let mut buf = [START, VERSION, LENGTH, command, NO_FEEDBACK, param_h, param_l, 0, 0, END];
        let [csum_h, csum_l] = checksum(&buf[1..7]).to_be_bytes();
        buf[7] = csum_h;
        buf[8] = csum_l;
        Self(buf)
    }

    pub fn play_track(track: u16) -> Result<Self, CodecError> {
        if !(1..=MAX_TRACK).contains(&track) {
            return Err(CodecError::TrackOutOfRange(track));
        }
        Ok(Self::new(Command::PlayTrack as u8, track))
    }

    /// Volume is clamped to `0..=30`.
    pub fn set_volume(volume: u8) -> Self {
        Self::new(Command::SetVolume as u8, u16::from(volume.min(MAX_VOLUME)))
    }

    pub fn stop() -> Self {
        Self::new(Command::Stop as u8, 0)
    }

    pub fn pause() -> Self {
        Self::new(Command::Pause as u8, 0)
    }

    /// Validate a received or captured frame.
    pub fn parse(bytes: &[u8]) -> Result<Self, CodecError> {
        let buf: [u8; FRAME_LEN] = bytes
            .try_into()
            .map_err(|_| CodecError::BadLength(bytes.len()))?;
        if buf[0] != START || buf[1] != VERSION || buf[2] != LENGTH || buf[9] != END {
            return Err(CodecError::BadHeader);
        }
        let expected = checksum(&buf[1..7]);
        let found = u16::from_be_bytes([buf[7], buf[8]]);
        if expected != found {
            return Err(CodecError::ChecksumMismatch { expected, found });
        }
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn command_code(&self) -> u8 {
        self.0[3]
    }

    pub fn command(&self) -> Option<Command> {
        Command::from_u8(self.command_code())
    }

    pub fn param(&self) -> u16 {
        u16::from_be_bytes([self.0[5], self.0[6]])
    }

    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.0[7], self.0[8]])
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
