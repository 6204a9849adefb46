use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::types::ExitPolicy;

/// Skip-decision strategy for a whole catalog.
///
/// `RunOnce` skips anything that already succeeded. `RunIfChanged` also
/// re-runs a succeeded migration when its payload fingerprint no longer
/// matches the recorded one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RunPolicy {
    #[default]
    RunOnce,
    RunIfChanged,
}

impl RunPolicy {
    /// Each policy variant tracks state in its own file so the two catalogs
    /// never clobber each other.
    pub fn state_file_name(&self) -> &'static str {
        match self {
            RunPolicy::RunOnce => "schema_migrations_state.json",
            RunPolicy::RunIfChanged => "code_migrations_state.json",
        }
    }

    /// Schema migrations gate deploys, so they fail the process. Code
    /// migrations must not block an application start, so they default to
    /// tolerant exits.
    pub fn default_exit_policy(&self) -> ExitPolicy {
        match self {
            RunPolicy::RunOnce => ExitPolicy::Strict,
            RunPolicy::RunIfChanged => ExitPolicy::Tolerant,
        }
    }

    pub fn uses_fingerprint(&self) -> bool {
        matches!(self, RunPolicy::RunIfChanged)
    }
}
