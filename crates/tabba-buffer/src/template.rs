//! Blank row generation.

use std::fmt;

use crate::{DeviceClass, StringLabel};

/// The filler character that pads every string line.
pub const FILLER: char = '-';

/// One blank row: a line per string, each `label + FILLER × width`.
///
/// Templates are generated on demand and turned into text right away;
/// nothing stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTemplate {
    lines: Vec<String>,
}

impl RowTemplate {
    /// Generates a blank row for `labels` at the device's row width.
    ///
    /// Callers guarantee `labels` is non-empty. An empty list yields an
    /// empty template, which renders as an empty string.
    pub fn generate(labels: &[StringLabel], device: DeviceClass) -> Self {
        let filler: String = std::iter::repeat_n(FILLER, device.row_width()).collect();
        let lines = labels
            .iter()
            .map(|label| format!("{label}{filler}"))
            .collect();
        Self { lines }
    }

    /// Returns the string lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of string lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the template has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for RowTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Generates one blank row as content text. No trailing separator.
pub fn generate_row(labels: &[StringLabel], device: DeviceClass) -> String {
    RowTemplate::generate(labels, device).to_string()
}
