//! Plain-text export of a whole tab.

use tabba_buffer::Instrument;

use crate::tab::Tab;

/// A rendered download: suggested file name plus file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

impl Export {
    /// Renders `tab` as the name line, a blank line, then each part as
    /// `"{title}:"` followed by its content, parts separated by blank lines.
    pub fn from_tab(tab: &Tab) -> Self {
        let parts: Vec<String> = Instrument::ALL
            .iter()
            .map(|&instrument| {
                let part = tab.parts.get(instrument);
                format!("{}:\n{}", part.title, part.content)
            })
            .collect();

        Self {
            file_name: file_name_for(&tab.name),
            contents: format!("{}\n\n{}", tab.name, parts.join("\n\n")),
        }
    }
}

/// Replaces every whitespace run in `name` with one underscore and adds `.txt`.
pub fn file_name_for(name: &str) -> String {
    let mut file_name = String::with_capacity(name.len() + 4);
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                file_name.push('_');
            }
            in_space = true;
        } else {
            file_name.push(c);
            in_space = false;
        }
    }
    file_name.push_str(".txt");
    file_name
}
