use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::Game;

use super::{SaveData, apply_save_data, load_from_json_string, save_data_from_game, save_to_json_string};

pub const STORAGE_KEY: &str = "complex-idle:game-state";
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;

/// String storage addressed by key.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, value).with_context(|| format!("failed to write {}", temp.display()))?;
        fs::rename(&temp, &path)
            .with_context(|| format!("failed to move save into {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Reads and writes the game state under one storage key.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn save(&mut self, save: &SaveData) -> Result<()> {
        let json = save_to_json_string(save)?;
        self.storage.set(&self.key, &json)
    }

    pub fn save_game(&mut self, game: &Game) -> Result<()> {
        self.save(&save_data_from_game(game))?;
        log::info!("game saved at revision {}", game.revision());
        Ok(())
    }

    /// `None` when nothing is stored or the stored record cannot be used.
    pub fn load(&self) -> Option<SaveData> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("could not read saved game: {err:#}");
                return None;
            }
        };
        match load_from_json_string(&raw) {
            Ok(save) => Some(save),
            Err(err) => {
                log::warn!("discarding saved game: {err:#}");
                None
            }
        }
    }

    /// Loads into `game`. Returns false, leaving `game` untouched, when no
    /// usable save exists.
    pub fn restore(&self, game: &mut Game) -> bool {
        let Some(save) = self.load() else {
            return false;
        };
        match apply_save_data(game, &save) {
            Ok(()) => {
                log::info!("saved game restored");
                true
            }
            Err(err) => {
                log::warn!("discarding saved game: {err:#}");
                false
            }
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(&self.key)?;
        log::info!("saved game cleared");
        Ok(())
    }
}

/// Debounced writer: saves once the game has changed and stayed unsaved
/// for the debounce window.
#[derive(Debug, Clone, PartialEq)]
pub struct Autosave {
    pub debounce_ms: u64,
    saved_revision: Option<u64>,
    dirty_since_ms: Option<u64>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DEBOUNCE_MS)
    }
}

impl Autosave {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            saved_revision: None,
            dirty_since_ms: None,
        }
    }

    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = Some(revision);
        self.dirty_since_ms = None;
    }

    pub fn is_dirty(&self, game: &Game) -> bool {
        self.saved_revision != Some(game.revision())
    }

    /// Returns whether a save was written.
    pub fn poll<S: KeyValueStorage>(
        &mut self,
        now_ms: u64,
        game: &Game,
        persistence: &mut Persistence<S>,
    ) -> Result<bool> {
        if !self.is_dirty(game) {
            self.dirty_since_ms = None;
            return Ok(false);
        }
        let since = *self.dirty_since_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) < self.debounce_ms {
            return Ok(false);
        }
        persistence.save_game(game)?;
        self.mark_saved(game.revision());
        Ok(true)
    }

    /// Writes now if anything is unsaved.
    pub fn flush<S: KeyValueStorage>(
        &mut self,
        game: &Game,
        persistence: &mut Persistence<S>,
    ) -> Result<bool> {
        if !self.is_dirty(game) {
            return Ok(false);
        }
        persistence.save_game(game)?;
        self.mark_saved(game.revision());
        Ok(true)
    }
}
