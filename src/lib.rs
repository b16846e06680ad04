//! Flip Cards - 100 editable flip cards in the browser
//!
//! Core modules:
//! - `cards`: Card records, normalization, the fixed-size collection
//! - `store`: Snapshot load/save, JSON import/export
//! - `persistence`: Key-value backends (memory, LocalStorage)
//! - `app`: Mode and editor state machine driving every mutation
//! - `view`: Pure view models derived from app state
//! - `platform`: Browser DOM glue (wasm32 only)

pub mod app;
pub mod cards;
pub mod error;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod store;
pub mod view;

pub use app::{App, CardClick, EditorForm, EditorSession, Mode};
pub use cards::{Card, CardCollection};
pub use error::{Error, ImportError, Result, StorageError};
pub use persistence::{KeyValueStore, MemoryStore};
pub use store::CardStore;

/// Configuration constants
pub mod consts {
    /// Number of cards on the board, always
    pub const CARD_COUNT: usize = 100;

    /// LocalStorage slot (versioned)
    pub const STORAGE_KEY: &str = "editable_flip_cards_v1";

    /// Image used when a card has none
    pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder.png";

    /// Default back-face text is `"{prefix} {position}"`
    pub const DEFAULT_LABEL_PREFIX: &str = "Carta";

    /// Export download name
    pub const EXPORT_FILENAME: &str = "cartas.json";
    pub const EXPORT_MIME: &str = "application/json";

    /// Reset-all confirmation prompt
    pub const RESET_PROMPT: &str = "¿Seguro que deseas reiniciar las 100 cartas al estado inicial?";

    /// Shown after a successful import
    pub const IMPORT_OK_NOTICE: &str = "Cartas cargadas correctamente.";

    /// Shown when an import could not be read or stored
    pub const READ_FAILED_NOTICE: &str = "No se pudo leer el JSON.";
}
