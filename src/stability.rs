//! Sender-side stability gate.
//!
//! A classification only becomes an [`Event`] once the same label has
//! been seen on consecutive samples, with enough confidence, and is not
//! `Unknown`.  After each emission the streak restarts and the gate is
//! closed for a fixed cooldown; results observed while cooling are
//! discarded without touching the streak.  The caller re-arms the
//! cooldown with [`StabilityFilter::start_cooldown`] once the event has
//! been handed off.
//!
//! ```text
//!  label == last ?  ── yes ──▶ streak += 1
//!                   └─ no ───▶ last = label, streak = 0
//!
//!  streak >= threshold && confidence >= min && label != Unknown
//!        ──▶ Emit(Event), streak = 0, cooling until now + cooldown
//! ```

use core::time::Duration;

use crate::color::{Classification, Label};

/// A stability- and confidence-qualified classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub label: Label,
    pub confidence: f32,
    /// Time since boot when the gate passed.
    pub timestamp: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityConfig {
    /// Repeats required after the first sighting (2 → three equal samples).
    pub stability_threshold: u32,
    pub confidence_threshold: f32,
    /// Local pause after an emission.
    pub cooldown: Duration,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            stability_threshold: 2,
            confidence_threshold: 0.6,
            cooldown: Duration::from_secs(2),
        }
    }
}

/// What the gate did with one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Inside the post-emission cooldown; the result was ignored.
    CoolingDown,
    /// Recorded; not yet eligible.  Carries the current streak.
    Hold { streak: u32 },
    /// Eligible; hand this to the notifier.
    Emit(Event),
}

pub struct StabilityFilter {
    config: StabilityConfig,
    last_label: Option<Label>,
    streak: u32,
    resume_at: Option<Duration>,
}

impl StabilityFilter {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            config,
            last_label: None,
            streak: 0,
            resume_at: None,
        }
    }

    /// Feed one classification observed at `now` (time since boot).
    pub fn observe(&mut self, result: Classification, now: Duration) -> Gate {
        if let Some(resume_at) = self.resume_at {
            if now < resume_at {
                return Gate::CoolingDown;
            }
            self.resume_at = None;
        }

        if self.last_label == Some(result.label) {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.last_label = Some(result.label);
            self.streak = 0;
        }

        let eligible = self.streak >= self.config.stability_threshold
            && result.confidence >= self.config.confidence_threshold
            && !result.label.is_unknown();

        if !eligible {
            return Gate::Hold {
                streak: self.streak,
            };
        }

        self.streak = 0;
        self.resume_at = Some(now + self.config.cooldown);
        Gate::Emit(Event {
            label: result.label,
            confidence: result.confidence,
            timestamp: now,
        })
    }

    /// Current streak length (0 after a label change or an emission).
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_label(&self) -> Option<Label> {
        self.last_label
    }

    /// Restart the cooldown at `now`.  Called once the send that followed
    /// an emission has returned, so network waits never eat into it.
    pub fn start_cooldown(&mut self, now: Duration) {
        self.resume_at = Some(now + self.config.cooldown);
    }

    pub fn is_cooling(&self, now: Duration) -> bool {
        self.resume_at.is_some_and(|t| now < t)
    }
}
