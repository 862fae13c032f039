//! One editing session: an editor wired to its persistence.
//!
//! The editor never touches storage. After every command the session
//! drains the editor's events and, if any of them changed persisted
//! state, writes a fresh snapshot. Writes are fire-and-forget.

use tabba_core::event::{drain, EditorEvent, EventReceiver};
use tabba_core::{
    Command, CommandOutcome, Config, Editor, Instrument, KeyOutcome, KeyPress, KeyValueStore,
    Persistence,
};

pub struct Session<S: KeyValueStore> {
    editor: Editor,
    persistence: Persistence<S>,
    events: EventReceiver,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads saved state and builds the editor on top of it.
    pub fn open(persistence: Persistence<S>, config: Config, instrument: Option<Instrument>) -> Self {
        let mut editor = Editor::from_saved(persistence.load(), config);
        if let Some(instrument) = instrument {
            editor.set_instrument(instrument);
        }
        let events = editor.subscribe();
        Self {
            editor,
            persistence,
            events,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Executes a command and persists whatever it changed.
    pub fn run(&mut self, command: Command) -> CommandOutcome {
        let outcome = self.editor.execute(command);
        self.sync();
        outcome
    }

    /// Feeds a key press through the keymap.
    pub fn press(&mut self, key: &KeyPress) -> KeyOutcome {
        let outcome = self.editor.handle_key(key);
        self.sync();
        outcome
    }

    fn sync(&mut self) {
        let events = drain(&mut self.events);
        if events.iter().any(EditorEvent::is_persistent) {
            tracing::debug!(?events, "persisting state");
            self.persistence.save(&self.editor.snapshot());
        }
    }
}
