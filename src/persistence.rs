//! Best score persistence
//!
//! The simulation never touches storage. A [`BestScoreStore`] is handed to
//! [`crate::Run`] at construction; failures are reported to the caller,
//! which treats them as non-fatal.

use std::fmt;

/// Storage failure
#[derive(Debug)]
pub enum PersistenceError {
    /// Backing storage cannot be reached
    Unavailable(String),
    Io(std::io::Error),
    /// Stored value could not be parsed
    Format(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Unavailable(why) => write!(f, "storage unavailable: {}", why),
            PersistenceError::Io(e) => write!(f, "storage I/O error: {}", e),
            PersistenceError::Format(why) => write!(f, "malformed stored score: {}", why),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Format(e.to_string())
    }
}

/// Durable storage for the single best-score value
pub trait BestScoreStore {
    /// Stored best score, 0 if never written
    fn load(&mut self) -> Result<u64, PersistenceError>;
    fn save(&mut self, score: u64) -> Result<(), PersistenceError>;
}

/// In-memory store (tests, and the fallback when nothing durable exists)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub best: u64,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_best(best: u64) -> Self {
        Self { best, writes: 0 }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, PersistenceError> {
        Ok(self.best)
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        self.best = score;
        self.writes += 1;
        Ok(())
    }
}

/// On-disk record
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
struct TopScoreRecord {
    top_score: u64,
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u64, PersistenceError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: TopScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded top score {} from {}", record.top_score, self.path.display());
        Ok(record.top_score)
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&TopScoreRecord { top_score: score })?;
        // Write to a sibling temp file first so a crash never leaves a torn record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Top score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "top-score";

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .ok_or_else(|| PersistenceError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistenceError::Unavailable("LocalStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<u64, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(value)) => value
                .trim()
                .parse()
                .map_err(|e| PersistenceError::Format(format!("{:?}: {}", value, e))),
            Ok(None) => Ok(0),
            Err(e) => Err(PersistenceError::Unavailable(format!("{:?}", e))),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))
    }
}
