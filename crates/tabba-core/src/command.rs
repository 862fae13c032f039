//! Commands the host can send to the editor.
//!
//! ## Learning: The Command Pattern
//!
//! Every user action is a `Command` value. Key bindings, on-screen
//! buttons and scripts all produce the same values, so the editor has a
//! single entry point ([`Editor::execute`](crate::Editor::execute)) and
//! bindings can be stored in config as plain strings.

use std::fmt;
use std::str::FromStr;

use crate::export::Export;
use crate::CoreError;

/// Editor commands, one per input event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Append a blank row to the active part
    RowAdd,
    /// Delete the last row of the active part
    RowDelete,
    /// Replace the active part's content verbatim
    RawEdit { text: String },
    /// Switch between guitar and bass
    InstrumentToggle,
    /// Rename the active part
    TitleEdit { text: String },
    /// Rename the tab
    NameEdit { text: String },
    /// Reset the active part to one blank row
    Reset,
    /// Copy the active part's content
    Copy,
    /// Export the whole tab as text
    Download,
    /// Save the current tab into the library under its name
    SaveNamed,
    /// Replace the current tab with a saved one
    LoadNamed { name: String },
    /// Remove a tab from the library
    DeleteNamed { name: String },
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::RowAdd => "Add new tab row",
            Command::RowDelete => "Delete last tab row",
            Command::RawEdit { .. } => "Edit",
            Command::InstrumentToggle => "Switch instrument",
            Command::TitleEdit { .. } => "Rename part",
            Command::NameEdit { .. } => "Rename tab",
            Command::Reset => "Reset tab",
            Command::Copy => "Copy",
            Command::Download => "Download",
            Command::SaveNamed => "Save tab",
            Command::LoadNamed { .. } => "Load tab",
            Command::DeleteNamed { .. } => "Delete saved tab",
        }
    }

    /// Stable identifier for commands that take no argument, used in key
    /// binding config.
    pub fn id(&self) -> Option<&'static str> {
        match self {
            Command::RowAdd => Some("tab.row_add"),
            Command::RowDelete => Some("tab.row_delete"),
            Command::InstrumentToggle => Some("tab.toggle_instrument"),
            Command::Reset => Some("tab.reset"),
            Command::Copy => Some("tab.copy"),
            Command::Download => Some("tab.download"),
            Command::SaveNamed => Some("tab.save"),
            _ => None,
        }
    }

    /// Looks up an argument-less command by its id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "tab.row_add" => Some(Command::RowAdd),
            "tab.row_delete" => Some(Command::RowDelete),
            "tab.toggle_instrument" => Some(Command::InstrumentToggle),
            "tab.reset" => Some(Command::Reset),
            "tab.copy" => Some(Command::Copy),
            "tab.download" => Some(Command::Download),
            "tab.save" => Some(Command::SaveNamed),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Parses one script line: a verb, then the rest of the line as argument.
///
/// ```text
/// row-add
/// title Clean Guitar
/// edit e|--0--\nB|--1--
/// load My Tab
/// ```
///
/// `edit` turns `\n` into a newline and `\\` into a backslash. Command ids
/// (`tab.row_add`) are accepted too.
impl FromStr for Command {
    type Err = CoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, arg) = match line.split_once(' ') {
            Some((verb, arg)) => (verb, arg),
            None => (line.trim_end(), ""),
        };

        if let Some(command) = Command::from_id(verb) {
            return Ok(command);
        }

        let command = match verb {
            "row-add" | "add" => Command::RowAdd,
            "row-delete" | "delete" => Command::RowDelete,
            "toggle" => Command::InstrumentToggle,
            "reset" => Command::Reset,
            "copy" => Command::Copy,
            "download" => Command::Download,
            "save" => Command::SaveNamed,
            "edit" => Command::RawEdit {
                text: unescape(arg),
            },
            "title" => Command::TitleEdit {
                text: arg.to_string(),
            },
            "name" => Command::NameEdit {
                text: arg.to_string(),
            },
            "load" => Command::LoadNamed {
                name: arg.to_string(),
            },
            "remove" => Command::DeleteNamed {
                name: arg.to_string(),
            },
            _ => return Err(CoreError::UnknownCommand(verb.to_string())),
        };
        Ok(command)
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// What a command produced for the host, beyond the state change itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Nothing to hand back
    Done,
    /// Text for the system clipboard
    Copied(String),
    /// A file to offer for download
    Exported(Export),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for cmd in [
            Command::RowAdd,
            Command::RowDelete,
            Command::InstrumentToggle,
            Command::Reset,
            Command::Copy,
            Command::Download,
            Command::SaveNamed,
        ] {
            let id = cmd.id().unwrap();
            assert_eq!(Command::from_id(id), Some(cmd));
        }
        assert_eq!(Command::NameEdit { text: "x".into() }.id(), None);
    }

    #[test]
    fn test_parse_script_lines() {
        assert_eq!("row-add".parse::<Command>().unwrap(), Command::RowAdd);
        assert_eq!("tab.reset".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!(
            "load My Tab".parse::<Command>().unwrap(),
            Command::LoadNamed {
                name: "My Tab".to_string()
            }
        );
        assert_eq!(
            "title Clean Guitar".parse::<Command>().unwrap(),
            Command::TitleEdit {
                text: "Clean Guitar".to_string()
            }
        );
    }

    #[test]
    fn test_edit_unescapes_newlines() {
        let cmd: Command = r"edit e|--0--\nB|--1--\\x".parse().unwrap();
        assert_eq!(
            cmd,
            Command::RawEdit {
                text: "e|--0--\nB|--1--\\x".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_verb() {
        assert!(matches!(
            "strum".parse::<Command>(),
            Err(CoreError::UnknownCommand(v)) if v == "strum"
        ));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Command::RowAdd.to_string(), "Add new tab row");
        assert_eq!(Command::SaveNamed.display_name(), "Save tab");
    }
}
