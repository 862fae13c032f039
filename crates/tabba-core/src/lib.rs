//! # Tabba Core
//!
//! Editor state and everything the host needs to drive it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Editor                           │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐ │
//! │  │  Config  │ │  Keymap  │ │ EventBus │ │   Library    │ │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────────┘ │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  Tab { name, parts: { guitar: Part, bass: Part } } │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//!         │ EditorEvent                     ▲ SavedState
//!         ▼                                 │
//! ┌──────────────────────────────────────────────────────────┐
//! │          Persistence<S: KeyValueStore> (host)            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The editor never touches storage. The host feeds it [`Command`]s or
//! key presses, watches the event bus, and hands [`SavedState`] snapshots
//! to [`Persistence`] after every change.

pub mod command;
pub mod config;
pub mod editor;
pub mod event;
pub mod export;
pub mod keymap;
pub mod storage;
pub mod tab;

pub use command::{Command, CommandOutcome};
pub use config::{Config, ConfigError};
pub use editor::{Editor, KeyOutcome};
pub use event::{EditorEvent, EventBus};
pub use export::Export;
pub use keymap::{Key, KeyBinding, KeyPress, Keymap, KeymapResult, Modifiers, Shortcut};
pub use storage::{FileStore, KeyValueStore, MemoryStore, Persistence, SavedState, StoreError};
pub use tab::{Library, Part, Parts, Tab};

pub use tabba_buffer::{DeviceClass, Instrument, StringLabel};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid key binding: {0}")]
    InvalidKeyBinding(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
