use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::RunPolicy;
use crate::utils::serde::deserialize_opt_vec_from_string;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Directory scanned for migration payloads.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Explicit ordered unit list. When set, discovery is skipped entirely.
    #[serde(default, deserialize_with = "deserialize_opt_vec_from_string")]
    pub entries: Option<Vec<String>>,

    /// Filename prefixes eligible during discovery (e.g. `11_`). Unset means
    /// every non-template `.sql`/`.py` file qualifies.
    #[serde(default, deserialize_with = "deserialize_opt_vec_from_string")]
    pub prefixes: Option<Vec<String>>,

    #[serde(default)]
    pub policy: RunPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            entries: None,
            prefixes: None,
            policy: RunPolicy::default(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("migrations")
}
