use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ExitPolicy, RunPolicy};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RunnerConfig {
    /// Directory holding the state files. Unset picks `/data` when that
    /// directory exists (container deployments), otherwise the working
    /// directory.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Wall-clock budget per migration, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Interpreter handed script payloads.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Unset means strict for run-once catalogs, tolerant for run-if-changed.
    #[serde(default)]
    pub exit_policy: Option<ExitPolicy>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            timeout_secs: default_timeout_secs(),
            interpreter: default_interpreter(),
            exit_policy: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl RunnerConfig {
    pub fn effective_state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }
        let data = Path::new("/data");
        if data.is_dir() {
            data.to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn state_path(&self, policy: &RunPolicy) -> PathBuf {
        self.effective_state_dir().join(policy.state_file_name())
    }

    pub fn effective_exit_policy(&self, policy: &RunPolicy) -> ExitPolicy {
        self.exit_policy
            .clone()
            .unwrap_or_else(|| policy.default_exit_policy())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
