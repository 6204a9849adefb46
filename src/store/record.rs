use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::MigrationStatus;

/// Persisted result of the most recent attempt to run one migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub status: MigrationStatus,

    /// Payload hash at the last attempt; only run-if-changed catalogs track it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    pub finished_at: DateTime<Utc>,

    /// Never reset, grows by one per attempt.
    pub attempts: u32,

    /// Trailing excerpt of captured output. Diagnostics only, not
    /// authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}
