//! Rule-based colour classifier.
//!
//! A sample is calibrated, squeezed into the 0–255 range, run through two
//! intensity gates (Black, White) and then through [`RULES`], an ordered
//! table evaluated first-match-wins.  The order is policy: the narrow
//! primary-colour bands come before the permissive secondary and
//! asymmetric bands so the latter can never shadow the former.
//!
//! [`ColorClassifier::classify`] is total: it returns a label and a
//! confidence in `[0, 1]` for every possible input.

use super::{CalibrationProfile, Label, Sample};

/// Ceiling a calibrated channel is rescaled to.
const CHANNEL_CEILING: u64 = 255;

/// Maximum pairwise channel spread still considered neutral (White).
const NEUTRAL_SPREAD: i64 = 50;

/// Confidence for the intensity-gated labels.
const GATE_CONFIDENCE: f32 = 0.9;

/// Upper bound for primary-colour confidence.
const PRIMARY_CAP: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    /// Always within `[0, 1]`.
    pub confidence: f32,
}

impl Classification {
    /// Result when no rule matched.
    pub const UNMATCHED: Self = Self {
        label: Label::Unknown,
        confidence: 0.3,
    };

    pub fn new(label: Label, confidence: f32) -> Self {
        Self {
            label,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
        }
    }
}

/// Per-channel share of the total intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fractions {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Fractions {
    /// `total` must be non-zero.
    fn of([r, g, b]: [u32; 3], total: u32) -> Self {
        let total = total as f32;
        Self {
            r: r as f32 / total,
            g: g as f32 / total,
            b: b as f32 / total,
        }
    }
}

/// One entry of the ordered rule table.
pub struct Rule {
    pub label: Label,
    pub matches: fn(&Fractions) -> bool,
    pub confidence: fn(&Fractions) -> f32,
}

impl Rule {
    pub fn evaluate(&self, fractions: &Fractions) -> Option<Classification> {
        (self.matches)(fractions)
            .then(|| Classification::new(self.label, (self.confidence)(fractions)))
    }
}

fn primary(dominant: f32) -> f32 {
    (dominant * 1.5).min(PRIMARY_CAP)
}

/// Ordered classification rules, evaluated first-match-wins.
pub static RULES: [Rule; 8] = [
    // ── Primary: one dominant channel ──────────────────────────
    Rule {
        label: Label::Red,
        matches: |f| f.r > 0.5 && f.g < 0.3 && f.b < 0.3,
        confidence: |f| primary(f.r),
    },
    Rule {
        label: Label::Green,
        matches: |f| f.g > 0.5 && f.r < 0.3 && f.b < 0.3,
        confidence: |f| primary(f.g),
    },
    Rule {
        label: Label::Blue,
        matches: |f| f.b > 0.5 && f.r < 0.3 && f.g < 0.3,
        confidence: |f| primary(f.b),
    },
    // ── Secondary: two strong channels, one weak ───────────────
    Rule {
        label: Label::Yellow,
        matches: |f| f.r > 0.35 && f.g > 0.35 && f.b < 0.25,
        confidence: |_| 0.8,
    },
    Rule {
        label: Label::Magenta,
        matches: |f| f.r > 0.35 && f.b > 0.35 && f.g < 0.25,
        confidence: |_| 0.8,
    },
    Rule {
        label: Label::Cyan,
        matches: |f| f.g > 0.35 && f.b > 0.35 && f.r < 0.25,
        confidence: |_| 0.8,
    },
    // ── Asymmetric bands ───────────────────────────────────────
    Rule {
        label: Label::Orange,
        matches: |f| f.r > 0.45 && f.g > 0.25 && f.g < 0.40 && f.b < 0.2,
        confidence: |_| 0.75,
    },
    Rule {
        label: Label::Purple,
        matches: |f| f.b > 0.35 && f.r > 0.30 && f.g < 0.25,
        confidence: |_| 0.75,
    },
];

/// Scale all channels down proportionally so the largest is at most 255.
pub fn normalise(rgb: [u32; 3]) -> [u32; 3] {
    let max = u64::from(rgb[0].max(rgb[1]).max(rgb[2]));
    if max <= CHANNEL_CEILING {
        return rgb;
    }
    rgb.map(|c| (u64::from(c) * CHANNEL_CEILING / max) as u32)
}

fn is_neutral([r, g, b]: [u32; 3]) -> bool {
    let (r, g, b) = (i64::from(r), i64::from(g), i64::from(b));
    (r - g).abs() < NEUTRAL_SPREAD && (g - b).abs() < NEUTRAL_SPREAD && (r - b).abs() < NEUTRAL_SPREAD
}

/// Threshold-parameterised classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorClassifier {
    min_intensity: u16,
    high_intensity: u16,
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_INTENSITY, Self::DEFAULT_HIGH_INTENSITY)
    }
}

impl ColorClassifier {
    pub const DEFAULT_MIN_INTENSITY: u16 = 50;
    pub const DEFAULT_HIGH_INTENSITY: u16 = 700;

    /// `min_intensity` is per channel: totals below `3 × min_intensity`
    /// read as Black.  `high_intensity` is the total above which a
    /// neutral sample reads as White.
    pub const fn new(min_intensity: u16, high_intensity: u16) -> Self {
        Self {
            min_intensity,
            high_intensity,
        }
    }

    pub fn classify(&self, sample: &Sample, profile: &CalibrationProfile) -> Classification {
        let rgb = normalise(profile.apply(sample));
        let total = rgb[0] + rgb[1] + rgb[2];

        if total < 3 * u32::from(self.min_intensity) {
            return Classification::new(Label::Black, GATE_CONFIDENCE);
        }
        if total > u32::from(self.high_intensity) && is_neutral(rgb) {
            return Classification::new(Label::White, GATE_CONFIDENCE);
        }
        if total == 0 {
            return Classification::new(Label::Unknown, 0.0);
        }

        let fractions = Fractions::of(rgb, total);
        RULES
            .iter()
            .find_map(|rule| rule.evaluate(&fractions))
            .unwrap_or(Classification::UNMATCHED)
    }
}
