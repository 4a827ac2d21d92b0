//! Save/load boundary.
//!
//! The core only sees an opaque key-value store of JSON values. Stores
//! never report I/O failures to the core: a failed write is logged and a
//! failed read looks the same as "no save exists".

use crate::cards::{CardGrid, TOTAL_CARDS};
use crate::content::CharacterId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Storage key of the player save.
pub const SAVE_KEY: &str = "buffBrawlSave";

/// Key-value persistence collaborator.
pub trait SaveStore {
    fn save(&mut self, key: &str, data: &Value);

    fn load(&self, key: &str) -> Option<Value>;
}

/// In-process store. Clones share the same entries.
///
/// # Examples
///
/// ```rust
/// use buffbrawl::persistence::{MemoryStore, SaveStore};
///
/// let mut store = MemoryStore::new();
/// let view = store.clone();
/// store.save("k", &serde_json::json!(3));
/// assert_eq!(view.load("k"), Some(serde_json::json!(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, key: &str, data: &Value) {
        self.entries.borrow_mut().insert(key.to_string(), data.clone());
    }

    fn load(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }
}

/// One pretty-printed JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File backing `key`: `<dir>/<key>.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, key: &str, data: &Value) {
        let path = self.path_for(key);
        let text = match serde_json::to_string_pretty(data) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, key, "failed to encode save");
                return;
            }
        };
        if let Err(err) = fs::create_dir_all(&self.dir).and_then(|()| fs::write(&path, text)) {
            tracing::warn!(%err, path = %path.display(), "failed to write save");
        }
    }

    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "failed to read save");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "save is not valid JSON");
                None
            }
        }
    }
}

/// Persisted record of one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSave {
    pub id: CharacterId,
    pub unlocked: bool,
    pub level: u8,
    pub flipped_cards: [bool; TOTAL_CARDS],
    pub card_grid: Option<CardGrid>,
}

/// Persisted player save.
///
/// ```json
/// { "currency": 9, "currentWave": 0, "currentCharacterId": 1,
///   "characters": [{ "id": 1, "unlocked": true, "level": 1,
///                    "flippedCards": [true, false, ...], "cardGrid": [...] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(alias = "flipPoints")]
    pub currency: u32,
    #[serde(default)]
    pub current_wave: u32,
    pub characters: Vec<CharacterSave>,
    pub current_character_id: CharacterId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> SaveData {
        let mut flipped = [false; TOTAL_CARDS];
        flipped[4] = true;
        SaveData {
            currency: 9,
            current_wave: 0,
            characters: vec![CharacterSave {
                id: 1,
                unlocked: true,
                level: 2,
                flipped_cards: flipped,
                card_grid: Some([Card::Blank; TOTAL_CARDS]),
            }],
            current_character_id: 1,
        }
    }

    #[test]
    fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        assert!(store.load(SAVE_KEY).is_none());
    }

    #[test]
    fn test_save_data_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["currency"], json!(9));
        assert_eq!(value["currentCharacterId"], json!(1));
        assert_eq!(value["characters"][0]["flippedCards"][4], json!(true));
        assert_eq!(
            value["characters"][0]["cardGrid"][0],
            json!({"type": "blank"})
        );
    }

    #[test]
    fn test_wrong_flip_length_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["characters"][0]["flippedCards"] = json!([true, false]);
        assert!(serde_json::from_value::<SaveData>(value).is_err());
    }

    #[test]
    fn test_legacy_currency_name() {
        let value = json!({
            "flipPoints": 4,
            "characters": [],
            "currentCharacterId": 1
        });
        let data: SaveData = serde_json::from_value(value).unwrap();
        assert_eq!(data.currency, 4);
        assert_eq!(data.current_wave, 0);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("saves"));
        assert!(store.load(SAVE_KEY).is_none());

        let value = serde_json::to_value(sample()).unwrap();
        store.save(SAVE_KEY, &value);
        assert!(store.path_for(SAVE_KEY).exists());
        assert_eq!(store.load(SAVE_KEY), Some(value));
    }

    #[test]
    fn test_json_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path_for(SAVE_KEY), "{ not json").unwrap();
        assert!(store.load(SAVE_KEY).is_none());
    }
}
