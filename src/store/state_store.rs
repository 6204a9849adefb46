use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::store::MigrationRecord;
use crate::utils::atomic_write;

pub type StateMap = BTreeMap<String, MigrationRecord>;

/// Durable `name -> record` mapping behind a single pretty-printed JSON file.
/// Reads degrade to an empty map so missing or corrupt state never blocks a
/// run; writes rewrite the whole map atomically.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StateMap {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet, starting empty");
                return StateMap::new();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "State file unreadable, treating all migrations as unseen"
                );
                return StateMap::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "State file corrupt, treating all migrations as unseen"
                );
                StateMap::new()
            }
        }
    }

    /// The one fatal failure path in a run: losing tracking integrity is
    /// worse than stopping.
    pub fn save(&self, state: &StateMap) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(state).context("Failed to serialize migration state")?;
        atomic_write(&self.path, &json).with_context(|| {
            format!(
                "Failed to persist migration state to {}",
                self.path.display()
            )
        })
    }

    /// Drops one record. Returns whether it existed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut state = self.load();
        let existed = state.remove(name).is_some();
        if existed {
            self.save(&state)?;
        }
        Ok(existed)
    }

    /// Deletes the whole state file. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", self.path.display()))
            }
        }
    }
}
