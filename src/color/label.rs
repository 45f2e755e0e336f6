//! The closed set of colour labels.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A classification outcome: one of ten detectable colours, or `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Orange,
    Purple,
    White,
    Black,
    Unknown,
}

impl Label {
    /// Every label the classifier can emit with confidence, in track order.
    pub const DETECTABLE: [Label; 10] = [
        Label::Red,
        Label::Green,
        Label::Blue,
        Label::Yellow,
        Label::Cyan,
        Label::Magenta,
        Label::Orange,
        Label::Purple,
        Label::White,
        Label::Black,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
            Self::Magenta => "Magenta",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::White => "White",
            Self::Black => "Black",
            Self::Unknown => "Unknown",
        }
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Label::from_str`] for names outside the label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownLabel;

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a colour label")
    }
}

impl FromStr for Label {
    type Err = UnknownLabel;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DETECTABLE
            .iter()
            .chain(core::iter::once(&Self::Unknown))
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or(UnknownLabel)
    }
}
