//! Receiver-side repeat suppression.
//!
//! Independent of the sender's stability gate: this layer absorbs
//! duplicates caused by retried datagrams (an ack lost on the way back
//! makes the sender resend an event the receiver already played) and by
//! near-simultaneous stable events.
//!
//! The state only changes on an accepted trigger, and the stored time
//! never moves backwards.

use core::time::Duration;

use crate::color::Label;

/// Last accepted trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebounceState {
    pub last_accepted_label: Option<Label>,
    pub last_accepted_time: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Trigger,
    /// Same label inside the cooldown window.
    Suppress { remaining: Duration },
}

pub struct RepeatSuppressor {
    cooldown: Duration,
    state: DebounceState,
}

impl RepeatSuppressor {
    pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3);

    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: DebounceState::default(),
        }
    }

    /// Decide whether `label`, accepted at `now`, should trigger the
    /// actuator.  Updates the state on `Trigger` only.
    pub fn admit(&mut self, label: Label, now: Duration) -> Decision {
        if let (Some(last), Some(at)) = (self.state.last_accepted_label, self.state.last_accepted_time) {
            let elapsed = now.saturating_sub(at);
            if last == label && elapsed < self.cooldown {
                return Decision::Suppress {
                    remaining: self.cooldown - elapsed,
                };
            }
        }

        let at = match self.state.last_accepted_time {
            Some(prev) => now.max(prev),
            None => now,
        };
        self.state = DebounceState {
            last_accepted_label: Some(label),
            last_accepted_time: Some(at),
        };
        Decision::Trigger
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Default for RepeatSuppressor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COOLDOWN)
    }
}
