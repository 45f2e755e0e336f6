//! Label → track table.
//!
//! Loaded once from configuration and read-only afterwards.  Serialised
//! as a JSON object keyed by label name, e.g. `{"Red": 1, "Green": 2}`.

use heapless::FnvIndexMap;
use serde::{Deserialize, Serialize};

use super::codec::MAX_TRACK;
use crate::color::Label;
use crate::error::CodecError;

/// Room for every label, rounded up to a power of two.
const CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackMapping {
    tracks: FnvIndexMap<Label, u16, CAPACITY>,
}

impl Default for TrackMapping {
    /// Detectable labels in order, tracks 1 to 10.
    fn default() -> Self {
        let mut m = Self::empty();
        for (label, track) in Label::DETECTABLE.iter().zip(1u16..) {
            // Capacity exceeds the label count.
            let _ = m.tracks.insert(*label, track);
        }
        m
    }
}

impl TrackMapping {
    pub fn empty() -> Self {
        Self {
            tracks: FnvIndexMap::new(),
        }
    }

    /// Map `label` to `track`, replacing any previous entry.
    pub fn insert(&mut self, label: Label, track: u16) -> Result<(), CodecError> {
        if !(1..=MAX_TRACK).contains(&track) {
            return Err(CodecError::TrackOutOfRange(track));
        }
        // At most one entry per Label variant, so the map cannot fill up.
        let _ = self.tracks.insert(label, track);
        Ok(())
    }

    pub fn track_for(&self, label: Label) -> Option<u16> {
        self.tracks.get(&label).copied()
    }

    /// Look up a label by its wire name.  Unknown names and labels
    /// without an entry both yield `None`.
    pub fn resolve(&self, name: &str) -> Option<(Label, u16)> {
        let label: Label = name.parse().ok()?;
        self.track_for(label).map(|track| (label, track))
    }

    /// First entry whose track is outside `1..=3000`.
    pub fn validate(&self) -> Result<(), CodecError> {
        match self.tracks.values().find(|t| !(1..=MAX_TRACK).contains(*t)) {
            Some(&bad) => Err(CodecError::TrackOutOfRange(bad)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, u16)> + '_ {
        self.tracks.iter().map(|(l, t)| (*l, *t))
    }
}
