use colored::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Outcome of the most recent attempt to run a migration. A migration with no
/// recorded status has never been attempted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationStatus {
    Success,
    Failed,
    TimedOut,
}

impl MigrationStatus {
    pub fn to_colored_string(&self) -> String {
        match self {
            MigrationStatus::Success => "SUCCESS".green().bold().to_string(),
            MigrationStatus::Failed => "FAILED".red().bold().to_string(),
            MigrationStatus::TimedOut => "TIMED_OUT".yellow().bold().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MigrationStatus::Success)
    }
}
