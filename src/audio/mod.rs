//! Audio actuator: DFPlayer-style serial command frames and the
//! label → track table.

pub mod codec;
pub mod link;
pub mod player;
pub mod tracks;

pub use codec::{Command, CommandFrame, FRAME_LEN, MAX_TRACK, MAX_VOLUME};
pub use link::{ActuatorLink, IoLink, NullLink};
pub use player::AudioPlayer;
pub use tracks::TrackMapping;
