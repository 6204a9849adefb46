pub mod run_service;

use std::path::PathBuf;

use anyhow::Result;

pub use run_service::{Decision, RunReason, RunService, SkipReason};

use crate::{
    catalog::Catalog, config::Settings, executor::Executor, store::StateStore, types::RunPolicy,
};

/// Wires a [`RunService`] from settings. `dir` and `policy` are the CLI
/// overrides; everything else comes from configuration.
pub fn build_run_service(
    settings: &Settings,
    dir: Option<PathBuf>,
    policy: Option<RunPolicy>,
) -> Result<RunService> {
    let mut catalog_config = settings.catalog.clone();
    if let Some(dir) = dir {
        catalog_config.dir = dir;
    }
    let policy = policy.unwrap_or_else(|| catalog_config.policy.clone());

    let catalog = Catalog::from_config(&catalog_config)?;
    let store = StateStore::new(settings.runner.state_path(&policy));
    let executor = Executor::new(
        settings.connection.clone(),
        settings.runner.interpreter.clone(),
        settings.runner.timeout(),
    );

    Ok(RunService::new(catalog, store, executor, policy))
}
