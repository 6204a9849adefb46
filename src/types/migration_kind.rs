use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How a migration payload is executed: handed to the configured interpreter,
/// or shipped to the database as a statement batch via the external client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationKind {
    Script,
    Sql,
}

impl MigrationKind {
    /// Tags the kind once, at catalog construction time.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("sql") => MigrationKind::Sql,
            _ => MigrationKind::Script,
        }
    }

    pub fn to_colored_string(&self) -> String {
        match self {
            MigrationKind::Script => "SCRIPT".blue().to_string(),
            MigrationKind::Sql => "SQL".cyan().to_string(),
        }
    }
}
