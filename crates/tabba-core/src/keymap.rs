//! Keyboard mapping and input handling.
//!
//! The text widget owns ordinary typing. The keymap only decides whether
//! a key press is a *command* (the host must suppress the widget's
//! default action) or should pass through to the widget untouched.
//!
//! Default bindings, active on wide devices only:
//!
//! | keys           | result                                |
//! |----------------|---------------------------------------|
//! | Enter          | add a row (no newline inserted)       |
//! | Shift+Enter    | passthrough: a manual line break      |
//! | Ctrl+Backspace | delete last row (nothing else erased) |
//!
//! Narrow devices use on-screen buttons instead, so every key passes
//! through.

use std::collections::HashMap;

use tabba_buffer::{DeviceClass, Instrument};

use crate::command::Command;
use crate::config::Config;
use crate::{CoreError, CoreResult};

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Cmd on macOS, Win on Windows
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Shift modifier.
    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Parses modifiers from a string like "ctrl+shift".
    ///
    /// Returns `None` if any part is not a known modifier name.
    pub fn parse(s: &str) -> Option<Self> {
        let mut mods = Modifiers::NONE;
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" | "option" => mods.alt = true,
                "shift" => mods.shift = true,
                "meta" | "cmd" | "win" => mods.meta = true,
                _ => return None,
            }
        }
        Some(mods)
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join(" + "))
    }
}

/// A key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Space,
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "space" => Some(Key::Space),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Space => write!(f, "Space"),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parses a key binding string like "ctrl+backspace" or "shift+enter".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key_str, mod_parts) = parts.split_last()?;
        let key = Key::parse(key_str)?;
        let modifiers = Modifiers::parse(&mod_parts.join("+"))?;
        Some(Self { key, modifiers })
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{} + {}", self.modifiers, self.key)
        }
    }
}

/// A key binding maps a key press to a command.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// The key press.
    pub key: KeyPress,
    /// The command to execute.
    pub command: Command,
    /// Device classes on which this binding is active.
    pub devices: Vec<DeviceClass>,
}

impl KeyBinding {
    /// A binding active on wide devices only.
    pub fn wide(key: KeyPress, command: Command) -> Self {
        Self {
            key,
            command,
            devices: vec![DeviceClass::Wide],
        }
    }

    /// Parses a config entry such as `"ctrl+r" = "tab.reset"`.
    pub fn parse(key: &str, command: &str) -> CoreResult<Self> {
        let key = KeyPress::parse(key).ok_or_else(|| CoreError::InvalidKeyBinding(key.to_string()))?;
        let command =
            Command::from_id(command).ok_or_else(|| CoreError::UnknownCommand(command.to_string()))?;
        Ok(Self::wide(key, command))
    }
}

/// Result of processing a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapResult {
    /// A command was matched; the widget's default action must be suppressed.
    Match(Command),
    /// Not a command; let the widget handle the key.
    Passthrough,
}

/// One line of the keyboard shortcut help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: String,
    pub description: String,
}

/// Keyboard mapping configuration.
pub struct Keymap {
    /// All key bindings.
    bindings: Vec<KeyBinding>,
    /// Index by key press for fast lookup.
    by_key: HashMap<KeyPress, Vec<usize>>,
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: Vec::new(),
            by_key: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap.rebuild_index();
        keymap
    }

    /// Creates a keymap from configuration.
    ///
    /// User bindings are checked before the defaults. Invalid entries are
    /// logged and skipped. Entries are read in key-string order, so when two
    /// spellings name the same key press the first one wins.
    pub fn from_config(config: &Config) -> Self {
        let mut user: Vec<KeyBinding> = Vec::new();
        for (key_str, cmd_str) in &config.keyboard.bindings {
            match KeyBinding::parse(key_str, cmd_str) {
                Ok(binding) if user.iter().any(|b| b.key == binding.key) => {
                    tracing::warn!(
                        "Skipping key binding {:?}: {} is already bound",
                        key_str,
                        binding.key
                    );
                }
                Ok(binding) => user.push(binding),
                Err(e) => tracing::warn!("Skipping key binding {:?}: {}", key_str, e),
            }
        }

        let mut keymap = Self::new();
        user.append(&mut keymap.bindings);
        keymap.bindings = user;
        keymap.rebuild_index();
        keymap
    }

    /// Adds default key bindings.
    fn add_default_bindings(&mut self) {
        self.bindings.push(KeyBinding::wide(
            KeyPress::new(Key::Enter, Modifiers::NONE),
            Command::RowAdd,
        ));
        self.bindings.push(KeyBinding::wide(
            KeyPress::new(Key::Backspace, Modifiers::CTRL),
            Command::RowDelete,
        ));
    }

    /// Rebuilds the key index.
    fn rebuild_index(&mut self) {
        self.by_key.clear();
        for (i, binding) in self.bindings.iter().enumerate() {
            self.by_key.entry(binding.key.clone()).or_default().push(i);
        }
    }

    /// Processes a key press.
    pub fn process(&self, key: &KeyPress, device: DeviceClass) -> KeymapResult {
        let Some(indices) = self.by_key.get(key) else {
            return KeymapResult::Passthrough;
        };

        indices
            .iter()
            .map(|&i| &self.bindings[i])
            .find(|binding| binding.devices.contains(&device))
            .map_or(KeymapResult::Passthrough, |binding| {
                KeymapResult::Match(binding.command.clone())
            })
    }

    /// Returns all bindings.
    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Keyboard help for `device`, with row sizes for `instrument`.
    ///
    /// Empty on devices that do not intercept keys.
    pub fn shortcuts(&self, instrument: Instrument, device: DeviceClass) -> Vec<Shortcut> {
        if !device.intercepts_keys() {
            return Vec::new();
        }

        let active: Vec<&KeyBinding> = self
            .bindings
            .iter()
            .filter(|binding| binding.devices.contains(&device))
            .collect();

        let mut shortcuts: Vec<Shortcut> = active
            .iter()
            .map(|binding| {
                let description = match binding.command {
                    Command::RowAdd => format!(
                        "{} ({} strings)",
                        binding.command.display_name(),
                        instrument.string_count()
                    ),
                    _ => binding.command.display_name().to_string(),
                };
                Shortcut {
                    keys: binding.key.to_string(),
                    description,
                }
            })
            .collect();

        // The line-break hint sits right after the row-add entry
        let at = active
            .iter()
            .position(|binding| binding.command == Command::RowAdd)
            .map_or(shortcuts.len(), |i| i + 1);
        shortcuts.insert(
            at,
            Shortcut {
                keys: KeyPress::new(Key::Enter, Modifiers::SHIFT).to_string(),
                description: "Manual line break".to_string(),
            },
        );
        shortcuts
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter() -> KeyPress {
        KeyPress::new(Key::Enter, Modifiers::NONE)
    }

    #[test]
    fn test_keypress_parse() {
        let kp = KeyPress::parse("ctrl+backspace").unwrap();
        assert_eq!(kp.key, Key::Backspace);
        assert!(kp.modifiers.ctrl);
        assert!(!kp.modifiers.shift);

        let kp = KeyPress::parse("Shift + Enter").unwrap();
        assert_eq!(kp, KeyPress::new(Key::Enter, Modifiers::SHIFT));

        assert_eq!(KeyPress::parse("ctrl+nope"), None);
        assert_eq!(KeyPress::parse("hyper+enter"), None);
        assert_eq!(KeyPress::parse("ctrl+super+backspace"), None);
    }

    #[test]
    fn test_modifiers_parse() {
        assert_eq!(Modifiers::parse(""), Some(Modifiers::NONE));
        assert_eq!(Modifiers::parse("Control"), Some(Modifiers::CTRL));
        assert_eq!(Modifiers::parse("shift + cmd").map(|m| m.meta), Some(true));
        assert_eq!(Modifiers::parse("super"), None);
        // Whole words only: "shifty" is not shift
        assert_eq!(Modifiers::parse("shifty"), None);
    }

    #[test]
    fn test_enter_adds_row_on_wide() {
        let keymap = Keymap::new();
        assert_eq!(
            keymap.process(&enter(), DeviceClass::Wide),
            KeymapResult::Match(Command::RowAdd)
        );
    }

    #[test]
    fn test_shift_enter_passes_through() {
        let keymap = Keymap::new();
        let shift_enter = KeyPress::new(Key::Enter, Modifiers::SHIFT);
        assert_eq!(
            keymap.process(&shift_enter, DeviceClass::Wide),
            KeymapResult::Passthrough
        );
    }

    #[test]
    fn test_ctrl_backspace_deletes_row() {
        let keymap = Keymap::new();
        let ctrl_bs = KeyPress::new(Key::Backspace, Modifiers::CTRL);
        assert_eq!(
            keymap.process(&ctrl_bs, DeviceClass::Wide),
            KeymapResult::Match(Command::RowDelete)
        );

        let plain_bs = KeyPress::new(Key::Backspace, Modifiers::NONE);
        assert_eq!(
            keymap.process(&plain_bs, DeviceClass::Wide),
            KeymapResult::Passthrough
        );
    }

    #[test]
    fn test_narrow_devices_pass_everything_through() {
        let keymap = Keymap::new();
        let ctrl_bs = KeyPress::new(Key::Backspace, Modifiers::CTRL);
        assert_eq!(keymap.process(&enter(), DeviceClass::Narrow), KeymapResult::Passthrough);
        assert_eq!(keymap.process(&ctrl_bs, DeviceClass::Narrow), KeymapResult::Passthrough);
        assert!(keymap.shortcuts(Instrument::Guitar, DeviceClass::Narrow).is_empty());
    }

    #[test]
    fn test_config_bindings_take_precedence() {
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("enter".to_string(), "tab.reset".to_string());
        config
            .keyboard
            .bindings
            .insert("ctrl+q".to_string(), "tab.explode".to_string());

        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.process(&enter(), DeviceClass::Wide),
            KeymapResult::Match(Command::Reset)
        );
        assert_eq!(keymap.bindings().len(), 3);
    }

    #[test]
    fn test_unknown_modifier_binding_is_skipped() {
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("super+enter".to_string(), "tab.reset".to_string());

        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.process(&enter(), DeviceClass::Wide),
            KeymapResult::Match(Command::RowAdd)
        );
        assert_eq!(keymap.bindings().len(), 2);
    }

    #[test]
    fn test_duplicate_config_bindings_first_wins() {
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("return".to_string(), "tab.copy".to_string());
        config
            .keyboard
            .bindings
            .insert("enter".to_string(), "tab.reset".to_string());

        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.process(&enter(), DeviceClass::Wide),
            KeymapResult::Match(Command::Reset)
        );
        assert_eq!(keymap.bindings().len(), 3);
    }

    #[test]
    fn test_shortcut_help() {
        let keymap = Keymap::new();
        let help = keymap.shortcuts(Instrument::Bass, DeviceClass::Wide);

        assert_eq!(help.len(), 3);
        assert_eq!(help[0].keys, "Enter");
        assert_eq!(help[0].description, "Add new tab row (4 strings)");
        assert_eq!(help[1].keys, "Shift + Enter");
        assert_eq!(help[1].description, "Manual line break");
        assert_eq!(help[2].keys, "Ctrl + Backspace");
    }
}
