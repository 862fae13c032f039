//! Instruments, string labels and device classes.
//!
//! ## Learning: Newtypes
//!
//! `StringLabel` wraps a `String`. It costs nothing at runtime but keeps
//! a label from being confused with a whole line of tab, and gives us a
//! place to hang label-specific helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal prefix identifying one instrument string, e.g. `"e|"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringLabel(String);

impl StringLabel {
    /// Creates a label from any string-like value.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Builds an ordered label list from string literals.
    pub fn list(labels: &[&str]) -> Vec<Self> {
        labels.iter().map(|l| Self::new(*l)).collect()
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StringLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StringLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StringLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for StringLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl PartialEq<str> for StringLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StringLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Client device class. Selects the filler width of generated rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Mobile-class clients: short rows, on-screen buttons instead of key commands.
    Narrow,
    /// Desktop-class clients.
    #[default]
    Wide,
}

impl DeviceClass {
    /// Filler characters per string line.
    pub fn row_width(self) -> usize {
        match self {
            DeviceClass::Narrow => 36,
            DeviceClass::Wide => 50,
        }
    }

    /// Returns true if keyboard commands (Enter, Ctrl+Backspace) are intercepted.
    pub fn intercepts_keys(self) -> bool {
        matches!(self, DeviceClass::Wide)
    }

    /// Classifies a user-agent string supplied by the host.
    ///
    /// Anything mentioning `Mobi` or `Android` (case-insensitive) is narrow.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let lower = user_agent.to_lowercase();
        if lower.contains("mobi") || lower.contains("android") {
            DeviceClass::Narrow
        } else {
            DeviceClass::Wide
        }
    }

    /// Parses `"narrow"`/`"mobile"` or `"wide"`/`"desktop"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "narrow" | "mobile" => Some(DeviceClass::Narrow),
            "wide" | "desktop" => Some(DeviceClass::Wide),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Narrow => write!(f, "narrow"),
            DeviceClass::Wide => write!(f, "wide"),
        }
    }
}

/// The instrument a part is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Guitar,
    Bass,
}

impl Instrument {
    /// All instruments, in export order.
    pub const ALL: [Instrument; 2] = [Instrument::Guitar, Instrument::Bass];

    /// Number of strings, i.e. lines per block.
    pub fn string_count(self) -> usize {
        match self {
            Instrument::Guitar => 6,
            Instrument::Bass => 4,
        }
    }

    /// The canonical string labels, high string first.
    pub fn default_labels(self) -> Vec<StringLabel> {
        match self {
            Instrument::Guitar => StringLabel::list(&["e|", "B|", "G|", "D|", "A|", "E|"]),
            Instrument::Bass => StringLabel::list(&["G|", "D|", "A|", "E|"]),
        }
    }

    /// Default part title.
    pub fn default_title(self) -> &'static str {
        match self {
            Instrument::Guitar => "Guitar",
            Instrument::Bass => "Bass",
        }
    }

    /// The other instrument.
    pub fn toggled(self) -> Self {
        match self {
            Instrument::Guitar => Instrument::Bass,
            Instrument::Bass => Instrument::Guitar,
        }
    }

    /// Parses `"guitar"` or `"bass"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guitar" => Some(Instrument::Guitar),
            "bass" => Some(Instrument::Bass),
            _ => None,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Guitar => write!(f, "guitar"),
            Instrument::Bass => write!(f, "bass"),
        }
    }
}
