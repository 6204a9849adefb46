use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::types::MigrationKind;

/// One executable migration unit. `name` is the stable key into the state
/// store; catalog position fixes the execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub name: String,
    pub path: PathBuf,
    pub kind: MigrationKind,
}

impl Migration {
    pub fn new(dir: &Path, name: &str) -> Self {
        let path = dir.join(name);
        let kind = MigrationKind::from_path(&path);
        Self {
            name: name.to_string(),
            path,
            kind,
        }
    }
}

/// The fixed, ordered unit list one orchestrator run processes. Order is the
/// only dependency contract: later migrations may assume earlier ones applied.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    migrations: Vec<Migration>,
}

impl Catalog {
    /// Builds the catalog from an explicit ordered list. Duplicates keep their
    /// first position.
    pub fn from_entries(dir: &Path, entries: &[String]) -> Self {
        let migrations = entries
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unique()
            .map(|name| Migration::new(dir, name))
            .collect();

        Self { migrations }
    }

    /// Scans `dir` for `.sql`/`.py` payloads, ordered by filename. Names
    /// containing `template` never qualify; when `prefixes` is set, only
    /// matching names do.
    pub fn discover(dir: &Path, prefixes: Option<&[String]>) -> Result<Self> {
        let dir_entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read migration directory {}", dir.display()))?;

        let mut names: Vec<String> = Vec::new();
        for entry in dir_entries {
            let entry = entry
                .with_context(|| format!("Failed to list directory {}", dir.display()))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_eligible(&name, prefixes) {
                names.push(name);
            }
        }
        names.sort();

        debug!(count = names.len(), dir = %dir.display(), "Discovered migrations");

        Ok(Self {
            migrations: names.iter().map(|name| Migration::new(dir, name)).collect(),
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        match &config.entries {
            Some(entries) => Ok(Self::from_entries(&config.dir, entries)),
            None => Self::discover(&config.dir, config.prefixes.as_deref()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.migrations.iter().any(|m| m.name == name)
    }
}

fn is_eligible(name: &str, prefixes: Option<&[String]>) -> bool {
    let lower = name.to_lowercase();
    if lower.contains("template") {
        return false;
    }
    if !(lower.ends_with(".sql") || lower.ends_with(".py")) {
        return false;
    }
    if let Some(prefixes) = prefixes {
        return prefixes.iter().any(|p| name.starts_with(p.as_str()));
    }
    true
}
