// window.localStorage behind the ScoreBackend port.

use wasm_bindgen::JsValue;
use web_sys::{Storage, window};

use crate::error::{GameError, Result};
use crate::score::ScoreBackend;

fn persistence(e: JsValue) -> GameError {
    GameError::Persistence(format!("{e:?}"))
}

/// `localStorage` when the page may use it. Private browsing modes can deny
/// access; reads then report no score and writes fail (and get logged).
pub struct LocalStorageBackend {
    storage: Option<Storage>,
}

impl LocalStorageBackend {
    pub fn open() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; best scores will not persist");
        }
        Self { storage }
    }
}

impl ScoreBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(persistence),
            None => Ok(None),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| GameError::Persistence("localStorage unavailable".into()))?;
        storage.set_item(key, value).map_err(persistence)
    }
}
