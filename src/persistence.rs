use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LeagueError, Result};
use crate::season::SeasonState;

/// Somewhere to keep the season between sessions.
pub trait SeasonStore {
    /// Last saved snapshot, or None if nothing was saved.
    fn load(&self) -> Result<Option<SeasonState>>;

    fn save(&mut self, state: &SeasonState) -> Result<()>;

    /// Forget the saved snapshot.
    fn clear(&mut self) -> Result<()>;
}

impl<S: SeasonStore + ?Sized> SeasonStore for Box<S> {
    fn load(&self) -> Result<Option<SeasonState>> {
        (**self).load()
    }

    fn save(&mut self, state: &SeasonState) -> Result<()> {
        (**self).save(state)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

fn parse_snapshot(json: &str) -> Result<SeasonState> {
    serde_json::from_str(json).map_err(|e| LeagueError::CorruptPersistedState(e.to_string()))
}

/// Keeps the serialized snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshot: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw JSON, valid or not.
    pub fn with_json(json: &str) -> Self {
        MemoryStore {
            snapshot: Some(json.to_string()),
            saves: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SeasonStore for MemoryStore {
    fn load(&self) -> Result<Option<SeasonState>> {
        self.snapshot.as_deref().map(parse_snapshot).transpose()
    }

    fn save(&mut self, state: &SeasonState) -> Result<()> {
        self.snapshot = Some(serde_json::to_string(state)?);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.snapshot = None;
        Ok(())
    }
}

/// Keeps the snapshot in a single JSON file.
///
/// Saves write a sibling temp file and rename it over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SeasonStore for JsonFileStore {
    fn load(&self) -> Result<Option<SeasonState>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_snapshot(&json).map(Some)
    }

    fn save(&mut self, state: &SeasonState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        debug!("Season saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
