//! Tabs, parts and the named-tab library.
//!
//! ## Learning: Value Semantics
//!
//! Saving a tab into the library clones its parts. Rust has no implicit
//! sharing, so a later edit to the current tab can never reach back into
//! a saved snapshot: each `Parts` value owns its own `String`s.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tabba_buffer::{reset_content, DeviceClass, Instrument};

/// Name given to a tab before the user renames it.
pub const DEFAULT_TAB_NAME: &str = "My Tab";

/// One instrument's part: a display title plus its tab content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub title: String,
    pub content: String,
}

impl Part {
    /// A part holding one blank row with the instrument's canonical labels.
    pub fn blank(instrument: Instrument, device: DeviceClass) -> Self {
        Self {
            title: instrument.default_title().to_string(),
            content: reset_content(instrument, device),
        }
    }
}

/// The guitar and bass parts of a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parts {
    pub guitar: Part,
    pub bass: Part,
}

impl Parts {
    /// Blank parts for both instruments.
    pub fn blank(device: DeviceClass) -> Self {
        Self {
            guitar: Part::blank(Instrument::Guitar, device),
            bass: Part::blank(Instrument::Bass, device),
        }
    }

    /// Returns the part for an instrument.
    pub fn get(&self, instrument: Instrument) -> &Part {
        match instrument {
            Instrument::Guitar => &self.guitar,
            Instrument::Bass => &self.bass,
        }
    }

    /// Returns a mutable reference to the part for an instrument.
    pub fn get_mut(&mut self, instrument: Instrument) -> &mut Part {
        match instrument {
            Instrument::Guitar => &mut self.guitar,
            Instrument::Bass => &mut self.bass,
        }
    }
}

/// The tab under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub name: String,
    pub parts: Parts,
}

impl Tab {
    /// A fresh tab with blank parts.
    pub fn new(name: impl Into<String>, device: DeviceClass) -> Self {
        Self {
            name: name.into(),
            parts: Parts::blank(device),
        }
    }
}

/// Named snapshots of tab parts.
///
/// Keys are kept sorted so listings and the persisted JSON are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    tabs: BTreeMap<String, Parts>,
}

impl Library {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a copy of `parts` under `name`, replacing any previous entry.
    pub fn save(&mut self, name: impl Into<String>, parts: &Parts) {
        self.tabs.insert(name.into(), parts.clone());
    }

    /// Returns the parts saved under `name`.
    pub fn get(&self, name: &str) -> Option<&Parts> {
        self.tabs.get(name)
    }

    /// Removes an entry. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.tabs.remove(name).is_some()
    }

    /// Saved tab names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tabs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_parts() {
        let parts = Parts::blank(DeviceClass::Wide);
        assert_eq!(parts.guitar.title, "Guitar");
        assert_eq!(parts.bass.title, "Bass");
        assert_eq!(parts.guitar.content.lines().count(), 6);
        assert_eq!(parts.bass.content.lines().count(), 4);
    }

    #[test]
    fn test_library_snapshot_is_independent() {
        let mut tab = Tab::new(DEFAULT_TAB_NAME, DeviceClass::Narrow);
        let mut library = Library::new();
        library.save("riff", &tab.parts);

        tab.parts.guitar.content.push_str("\n\nchanged");

        let saved = library.get("riff").unwrap();
        assert_ne!(saved.guitar.content, tab.parts.guitar.content);
    }

    #[test]
    fn test_library_serializes_as_map() {
        let mut library = Library::new();
        library.save("b", &Parts::blank(DeviceClass::Wide));
        library.save("a", &Parts::blank(DeviceClass::Wide));

        let json = serde_json::to_value(&library).unwrap();
        assert!(json["a"]["guitar"]["content"].is_string());
        assert_eq!(library.names().collect::<Vec<_>>(), ["a", "b"]);

        assert!(library.remove("a"));
        assert!(!library.remove("a"));
        assert_eq!(library.len(), 1);
    }
}
