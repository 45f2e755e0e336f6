//! Frame writer on top of an [`ActuatorLink`].

use log::{debug, warn};

use super::codec::{CommandFrame, FRAME_LEN};
use super::link::ActuatorLink;
use crate::error::ActuatorError;

pub struct AudioPlayer<L> {
    link: L,
    frames_sent: u32,
}

impl<L: ActuatorLink> AudioPlayer<L> {
    pub fn new(link: L) -> Self {
        Self { link, frames_sent: 0 }
    }

    /// Play track `track` (1..=3000).
    pub fn play(&mut self, track: u16) -> Result<(), ActuatorError> {
        let frame = CommandFrame::play_track(track)?;
        self.send(&frame)
    }

    /// Set the output volume; values above 30 are clamped.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), ActuatorError> {
        self.send(&CommandFrame::set_volume(volume))
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.send(&CommandFrame::stop())
    }

    pub fn pause(&mut self) -> Result<(), ActuatorError> {
        self.send(&CommandFrame::pause())
    }

    /// Write one frame and flush.
    pub fn send(&mut self, frame: &CommandFrame) -> Result<(), ActuatorError> {
        let written = self.link.write(frame.as_bytes()).map_err(|e| {
            warn!("PLAY | link write failed: {:?}", e);
            ActuatorError::LinkWrite
        })?;
        if written != FRAME_LEN {
            return Err(ActuatorError::ShortWrite { written });
        }
        self.link.flush().map_err(|e| {
            warn!("PLAY | link flush failed: {:?}", e);
            ActuatorError::LinkWrite
        })?;
        self.frames_sent = self.frames_sent.wrapping_add(1);
        debug!("PLAY | frame {:02X?}", frame.as_bytes());
        Ok(())
    }

    /// Frames fully written since construction.
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
