use std::str::FromStr;

use crate::types::RunPolicy;

pub fn parse_run_policy(input: &str) -> Result<RunPolicy, String> {
    RunPolicy::from_str(input).map_err(|_| {
        format!(
            "Invalid policy: '{}'. Expected 'run-once' or 'run-if-changed'",
            input
        )
    })
}
