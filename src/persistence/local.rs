//! Browser LocalStorage backend

use web_sys::Storage;

use super::KeyValueStore;
use crate::error::StorageError;

/// `window.localStorage`
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Open the window's LocalStorage, if the browser allows it
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}
