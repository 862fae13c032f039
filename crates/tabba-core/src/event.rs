//! Event system for editor notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rust's ownership model makes traditional observer patterns tricky.
//! We use a `tokio::sync::broadcast` channel as the event bus: events
//! are values, subscribers receive clones, and there are no callback
//! lifetimes to manage.
//!
//! The editor is synchronous, so nothing here needs a runtime. `send`
//! and `try_recv` are plain, non-blocking calls.

use tabba_buffer::Instrument;
use tokio::sync::broadcast;

/// Events that can occur in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// An instrument's content changed
    ContentChanged(Instrument),
    /// An instrument's part title changed
    TitleChanged(Instrument),
    /// The tab was renamed
    NameChanged,
    /// The active instrument switched
    InstrumentSwitched(Instrument),
    /// A tab was saved to or removed from the library
    LibraryChanged,
    /// A saved tab replaced the current one
    TabLoaded(String),
}

impl EditorEvent {
    /// Returns true if the event changed state that must be persisted.
    ///
    /// The active instrument is session state and is not stored.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, EditorEvent::InstrumentSwitched(_))
    }
}

/// Receiving end of an [`EventBus`] subscription.
pub type EventReceiver = broadcast::Receiver<EditorEvent>;

/// Event bus for broadcasting editor events.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    ///
    /// Returns a receiver that will get all future events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Takes every event currently queued on `receiver`.
pub fn drain(receiver: &mut EventReceiver) -> Vec<EditorEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("Event receiver lagged, missed {} events", n);
            }
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
                return events;
            }
        }
    }
}
