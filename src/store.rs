//! Card store: snapshot load/save, import and export
//!
//! Snapshot format (same for the storage slot and export files):
//! `{ "cards": [ { "text": "...", "image": "...", "flipped": false }, ... ] }`

use serde::Serialize;
use serde_json::Value;

use crate::cards::{CardCollection, FlipPolicy};
use crate::consts::{CARD_COUNT, STORAGE_KEY};
use crate::error::{ImportError, StorageError};
use crate::persistence::KeyValueStore;

#[derive(Serialize)]
struct Snapshot<'a> {
    cards: &'a CardCollection,
}

/// Owns the persistent slot the card collection lives in
#[derive(Debug, Clone)]
pub struct CardStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CardStore<S> {
    /// Store under the default versioned key
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Raw contents of the slot
    pub fn raw(&self) -> Option<String> {
        self.backend.get(&self.key)
    }

    /// Read the persisted collection, falling back to defaults.
    ///
    /// Only a snapshot with exactly [`CARD_COUNT`] cards is accepted; each
    /// element is then normalized on its own.
    pub fn load_or_initialize(&self) -> CardCollection {
        let Some(json) = self.backend.get(&self.key) else {
            log::info!("No saved cards, starting with defaults");
            return CardCollection::defaults();
        };

        let value: Value = match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Saved cards are not valid JSON, using defaults: {}", e);
                return CardCollection::defaults();
            }
        };

        match value.get("cards").and_then(Value::as_array) {
            Some(cards) if cards.len() == CARD_COUNT => {
                log::info!("Loaded {} cards", cards.len());
                CardCollection::from_raw(cards, FlipPolicy::Keep)
            }
            Some(cards) => {
                log::warn!(
                    "Saved snapshot has {} cards instead of {}, using defaults",
                    cards.len(),
                    CARD_COUNT
                );
                CardCollection::defaults()
            }
            None => {
                log::warn!("Saved snapshot has no cards array, using defaults");
                CardCollection::defaults()
            }
        }
    }

    /// Overwrite the slot with `cards`
    pub fn persist(&mut self, cards: &CardCollection) -> Result<(), StorageError> {
        let json = serde_json::to_string(&Snapshot { cards })?;
        self.backend.set(&self.key, &json)?;
        log::debug!("Cards saved ({} bytes)", json.len());
        Ok(())
    }
}

/// Fresh default collection, for an explicitly confirmed reset
pub fn reset_to_defaults() -> CardCollection {
    CardCollection::defaults()
}

/// Parse and normalize an imported snapshot.
///
/// Any number of cards is accepted; the result always has [`CARD_COUNT`]
/// cards, all face down.
pub fn import_from(raw: &str) -> Result<CardCollection, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(ImportError::Unparsable)?;
    let cards = value
        .as_object()
        .and_then(|obj| obj.get("cards"))
        .and_then(Value::as_array)
        .ok_or(ImportError::Malformed)?;

    if cards.len() != CARD_COUNT {
        log::info!(
            "Imported {} cards, normalizing to {}",
            cards.len(),
            CARD_COUNT
        );
    }
    Ok(CardCollection::from_raw(cards, FlipPolicy::FaceDown))
}

/// Pretty-printed snapshot for download; flip state is kept
pub fn export_snapshot(cards: &CardCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Snapshot { cards })
}
