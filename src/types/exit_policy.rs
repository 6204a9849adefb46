use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How a completed run maps unit failures onto the process exit code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ExitPolicy {
    /// Exit non-zero if any migration failed or timed out this run.
    Strict,
    /// Always exit zero after a completed run; failures are logged only.
    Tolerant,
}
