//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` is the only type a host needs. It owns the current tab, the
//! library and the active instrument, runs row operations from
//! `tabba-buffer` against the active part, and announces every change on
//! its event bus.
//!
//! ## Thread Safety
//!
//! `Editor` is owned by a single thread. Every operation runs to
//! completion before it returns; there is nothing to cancel or await.

use tabba_buffer::{
    add_row, block_count, delete_last_row, extract_string_labels, reset_content, DeviceClass,
    Instrument, StringLabel,
};

use crate::command::{Command, CommandOutcome};
use crate::config::Config;
use crate::event::{EditorEvent, EventBus, EventReceiver};
use crate::export::Export;
use crate::keymap::{KeyPress, Keymap, KeymapResult};
use crate::storage::SavedState;
use crate::tab::{Library, Part, Tab};

/// What happened to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key ran a command. The host must suppress its default action.
    Handled(CommandOutcome),
    /// The key belongs to the text widget.
    Passthrough,
}

/// The editor state.
pub struct Editor {
    /// The tab under edit
    tab: Tab,

    /// Named snapshots
    library: Library,

    /// Which part is visible and editable
    instrument: Instrument,

    /// Row width and key interception policy
    device: DeviceClass,

    /// Editor configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor with a fresh tab and default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor with a fresh tab.
    pub fn with_config(config: Config) -> Self {
        let state = SavedState::defaults(
            config.editor.device,
            config.editor.default_tab_name.clone(),
        );
        Self::from_saved(state, config)
    }

    /// Restores an editor from persisted state. Guitar is active.
    pub fn from_saved(state: SavedState, config: Config) -> Self {
        let keymap = Keymap::from_config(&config);
        Self {
            tab: Tab {
                name: state.tab_name,
                parts: state.tab_data,
            },
            library: state.saved_tabs,
            instrument: Instrument::default(),
            device: config.editor.device,
            config,
            keymap,
            event_bus: EventBus::new(),
        }
    }

    /// Snapshot of everything that should be persisted.
    pub fn snapshot(&self) -> SavedState {
        SavedState {
            tab_data: self.tab.parts.clone(),
            tab_name: self.tab.name.clone(),
            saved_tabs: self.library.clone(),
        }
    }

    // ==================== Getters ====================

    /// Returns the tab under edit.
    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    /// Returns the library of saved tabs.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Returns the active instrument.
    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Returns the device class.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Returns the active part.
    pub fn active_part(&self) -> &Part {
        self.tab.parts.get(self.instrument)
    }

    /// Returns the active part's content.
    pub fn content(&self) -> &str {
        &self.active_part().content
    }

    /// Labels detected in the active content.
    pub fn string_labels(&self) -> Vec<StringLabel> {
        extract_string_labels(self.content(), self.instrument)
    }

    /// Number of rows in the active content.
    pub fn row_count(&self) -> usize {
        block_count(self.content())
    }

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the keymap.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // ==================== Row Operations ====================

    /// Appends a blank row using the labels found in the active content.
    pub fn add_row(&mut self) {
        let content = add_row(self.content(), self.instrument, self.device);
        self.set_content(content);
    }

    /// Deletes the last row. The only remaining row is never deleted.
    pub fn delete_last_row(&mut self) {
        let content = delete_last_row(self.content());
        self.set_content(content);
    }

    /// Replaces the active content with one blank row using the
    /// instrument's canonical labels, whatever labels the content had.
    pub fn reset(&mut self) {
        let content = reset_content(self.instrument, self.device);
        self.set_content(content);
    }

    /// Accepts free-typed text verbatim as the active content.
    pub fn apply_raw_edit(&mut self, text: impl Into<String>) {
        self.set_content(text.into());
    }

    fn set_content(&mut self, content: String) {
        let instrument = self.instrument;
        let part = self.tab.parts.get_mut(instrument);
        if part.content == content {
            return;
        }
        part.content = content;
        tracing::debug!(%instrument, rows = block_count(&part.content), "content changed");
        self.emit(EditorEvent::ContentChanged(instrument));
    }

    // ==================== Instrument & Names ====================

    /// Switches between guitar and bass. Content is not touched.
    pub fn toggle_instrument(&mut self) {
        self.set_instrument(self.instrument.toggled());
    }

    /// Makes `instrument` the active one.
    pub fn set_instrument(&mut self, instrument: Instrument) {
        if self.instrument != instrument {
            self.instrument = instrument;
            self.emit(EditorEvent::InstrumentSwitched(instrument));
        }
    }

    /// Renames the active part.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let instrument = self.instrument;
        self.tab.parts.get_mut(instrument).title = title.into();
        self.emit(EditorEvent::TitleChanged(instrument));
    }

    /// Renames the tab.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.tab.name = name.into();
        self.emit(EditorEvent::NameChanged);
    }

    // ==================== Library ====================

    /// Saves a copy of both parts under the tab's name.
    pub fn save_named(&mut self) {
        self.library.save(self.tab.name.clone(), &self.tab.parts);
        tracing::info!("Saved tab {:?}", self.tab.name);
        self.emit(EditorEvent::LibraryChanged);
    }

    /// Replaces the current tab with a saved one.
    ///
    /// Returns false, changing nothing, if no tab has that name.
    pub fn load_named(&mut self, name: &str) -> bool {
        let Some(parts) = self.library.get(name) else {
            tracing::debug!("No saved tab named {:?}", name);
            return false;
        };
        self.tab = Tab {
            name: name.to_string(),
            parts: parts.clone(),
        };
        tracing::info!("Loaded tab {:?}", name);
        self.emit(EditorEvent::TabLoaded(name.to_string()));
        true
    }

    /// Removes a saved tab. Returns false if it did not exist.
    pub fn delete_named(&mut self, name: &str) -> bool {
        let removed = self.library.remove(name);
        if removed {
            tracing::info!("Deleted saved tab {:?}", name);
            self.emit(EditorEvent::LibraryChanged);
        }
        removed
    }

    // ==================== Export ====================

    /// The active part's content, verbatim, for the clipboard.
    pub fn copy_text(&self) -> &str {
        self.content()
    }

    /// The whole tab rendered as a text file.
    pub fn download(&self) -> Export {
        Export::from_tab(&self.tab)
    }

    // ==================== Dispatch ====================

    /// Executes a command.
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        tracing::trace!("Executing {:?}", command);
        match command {
            Command::RowAdd => self.add_row(),
            Command::RowDelete => self.delete_last_row(),
            Command::RawEdit { text } => self.apply_raw_edit(text),
            Command::InstrumentToggle => self.toggle_instrument(),
            Command::TitleEdit { text } => self.set_title(text),
            Command::NameEdit { text } => self.set_name(text),
            Command::Reset => self.reset(),
            Command::Copy => return CommandOutcome::Copied(self.copy_text().to_string()),
            Command::Download => return CommandOutcome::Exported(self.download()),
            Command::SaveNamed => self.save_named(),
            Command::LoadNamed { name } => {
                self.load_named(&name);
            }
            Command::DeleteNamed { name } => {
                self.delete_named(&name);
            }
        }
        CommandOutcome::Done
    }

    /// Runs the command bound to `key`, if any.
    pub fn handle_key(&mut self, key: &KeyPress) -> KeyOutcome {
        match self.keymap.process(key, self.device) {
            KeymapResult::Match(command) => KeyOutcome::Handled(self.execute(command)),
            KeymapResult::Passthrough => KeyOutcome::Passthrough,
        }
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::drain;
    use crate::keymap::{Key, Modifiers};

    fn narrow_config() -> Config {
        let mut config = Config::default();
        config.editor.device = DeviceClass::Narrow;
        config
    }

    #[test]
    fn test_defaults() {
        let editor = Editor::new();
        assert_eq!(editor.instrument(), Instrument::Guitar);
        assert_eq!(editor.tab().name, "My Tab");
        assert_eq!(editor.row_count(), 1);
        assert_eq!(editor.string_labels(), Instrument::Guitar.default_labels());
    }

    #[test]
    fn test_add_then_delete_row() {
        let mut editor = Editor::new();
        let original = editor.content().to_string();

        editor.add_row();
        assert_eq!(editor.row_count(), 2);

        editor.delete_last_row();
        assert_eq!(editor.content(), original);
    }

    #[test]
    fn test_delete_sole_row_emits_nothing() {
        let mut editor = Editor::new();
        let mut rx = editor.subscribe();

        editor.delete_last_row();
        editor.delete_last_row();

        assert_eq!(editor.row_count(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_add_row_follows_edited_labels() {
        let mut editor = Editor::with_config(narrow_config());
        editor.toggle_instrument();
        editor.apply_raw_edit("B|--\nE|--\nA|--\nD|--");
        editor.add_row();

        let dashes = "-".repeat(36);
        assert!(editor.content().ends_with(&format!("\n\nB|{dashes}\nE|{dashes}\nA|{dashes}\nD|{dashes}")));
    }

    #[test]
    fn test_reset_ignores_edited_labels() {
        let mut editor = Editor::new();
        editor.apply_raw_edit("x|--\n\ny|--");
        editor.reset();

        assert_eq!(editor.row_count(), 1);
        assert_eq!(editor.string_labels(), Instrument::Guitar.default_labels());
    }

    #[test]
    fn test_toggle_keeps_content() {
        let mut editor = Editor::new();
        editor.add_row();
        let guitar = editor.content().to_string();

        editor.toggle_instrument();
        assert_eq!(editor.instrument(), Instrument::Bass);
        assert_eq!(editor.row_count(), 1);

        editor.toggle_instrument();
        assert_eq!(editor.content(), guitar);
    }

    #[test]
    fn test_title_edits_active_part() {
        let mut editor = Editor::new();
        editor.toggle_instrument();
        editor.execute(Command::TitleEdit {
            text: "Fretless".to_string(),
        });

        assert_eq!(editor.tab().parts.bass.title, "Fretless");
        assert_eq!(editor.tab().parts.guitar.title, "Guitar");
    }

    #[test]
    fn test_library_round_trip() {
        let mut editor = Editor::new();
        editor.set_name("Verse");
        editor.add_row();
        editor.save_named();
        let saved = editor.tab().clone();

        editor.set_name("Chorus");
        editor.reset();
        assert!(editor.load_named("Verse"));
        assert_eq!(editor.tab(), &saved);

        assert!(!editor.load_named("Bridge"));
        assert_eq!(editor.tab(), &saved);

        assert!(editor.delete_named("Verse"));
        assert!(editor.library().is_empty());
    }

    #[test]
    fn test_copy_and_download() {
        let mut editor = Editor::new();
        editor.toggle_instrument();

        let CommandOutcome::Copied(text) = editor.execute(Command::Copy) else {
            panic!("copy should produce clipboard text");
        };
        assert_eq!(text, editor.tab().parts.bass.content);

        let CommandOutcome::Exported(export) = editor.execute(Command::Download) else {
            panic!("download should produce a file");
        };
        assert_eq!(export.file_name, "My_Tab.txt");
        assert!(export.contents.starts_with("My Tab\n\nGuitar:\ne|"));
    }

    #[test]
    fn test_keys_on_wide_device() {
        let mut editor = Editor::new();
        let enter = KeyPress::new(Key::Enter, Modifiers::NONE);
        let shift_enter = KeyPress::new(Key::Enter, Modifiers::SHIFT);
        let ctrl_bs = KeyPress::new(Key::Backspace, Modifiers::CTRL);

        assert_eq!(editor.handle_key(&enter), KeyOutcome::Handled(CommandOutcome::Done));
        assert_eq!(editor.row_count(), 2);

        assert_eq!(editor.handle_key(&shift_enter), KeyOutcome::Passthrough);
        assert_eq!(editor.row_count(), 2);

        assert_eq!(editor.handle_key(&ctrl_bs), KeyOutcome::Handled(CommandOutcome::Done));
        assert_eq!(editor.row_count(), 1);
    }

    #[test]
    fn test_keys_on_narrow_device() {
        let mut editor = Editor::with_config(narrow_config());
        let enter = KeyPress::new(Key::Enter, Modifiers::NONE);

        assert_eq!(editor.handle_key(&enter), KeyOutcome::Passthrough);
        assert_eq!(editor.row_count(), 1);
    }

    #[test]
    fn test_events() {
        let mut editor = Editor::new();
        let mut rx = editor.subscribe();

        editor.add_row();
        editor.toggle_instrument();
        editor.set_name("Renamed");

        assert_eq!(
            drain(&mut rx),
            vec![
                EditorEvent::ContentChanged(Instrument::Guitar),
                EditorEvent::InstrumentSwitched(Instrument::Bass),
                EditorEvent::NameChanged,
            ]
        );
    }

    #[test]
    fn test_snapshot_restores() {
        let mut editor = Editor::new();
        editor.add_row();
        editor.save_named();

        let restored = Editor::from_saved(editor.snapshot(), Config::default());
        assert_eq!(restored.tab(), editor.tab());
        assert_eq!(restored.library(), editor.library());
    }
}
