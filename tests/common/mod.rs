use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use ratchet::{
    catalog::Catalog,
    config::ConnectionConfig,
    executor::Executor,
    services::RunService,
    store::{StateMap, StateStore},
    types::RunPolicy,
};
use tempfile::TempDir;

/// Throwaway migration directory plus state file. Scripts are plain `sh`
/// bodies named `*.py` so the catalog picks them up and the `sh` interpreter
/// runs them; each one appends its name to a witness log, which is how tests
/// prove what actually executed.
pub struct Sandbox {
    pub dir: TempDir,
    pub migrations: PathBuf,
    pub state_path: PathBuf,
    pub witness: PathBuf,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let migrations = dir.path().join("migrations");
        fs::create_dir(&migrations)?;
        let state_path = dir.path().join("state.json");
        let witness = dir.path().join("witness.log");

        Ok(Self {
            dir,
            migrations,
            state_path,
            witness,
        })
    }

    pub fn write_script(&self, name: &str, body: &str) -> Result<()> {
        fs::write(self.migrations.join(name), body)?;
        Ok(())
    }

    /// Script that records its execution and exits 0.
    pub fn add_ok(&self, name: &str) -> Result<()> {
        self.write_script(
            name,
            &format!("echo {} >> \"{}\"\n", name, self.witness.display()),
        )
    }

    /// Script that records its execution, prints to stderr and exits 3.
    pub fn add_failing(&self, name: &str) -> Result<()> {
        self.write_script(
            name,
            &format!(
                "echo {} >> \"{}\"\necho boom >&2\nexit 3\n",
                name,
                self.witness.display()
            ),
        )
    }

    pub fn service(&self, policy: RunPolicy) -> Result<RunService> {
        self.service_with_timeout(policy, Duration::from_secs(30))
    }

    pub fn service_with_timeout(&self, policy: RunPolicy, timeout: Duration) -> Result<RunService> {
        let catalog = Catalog::discover(&self.migrations, None)?;
        Ok(self.assemble(catalog, ConnectionConfig::default(), policy, timeout))
    }

    pub fn service_with_entries(&self, policy: RunPolicy, entries: &[&str]) -> RunService {
        let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        let catalog = Catalog::from_entries(&self.migrations, &entries);
        self.assemble(
            catalog,
            ConnectionConfig::default(),
            policy,
            Duration::from_secs(30),
        )
    }

    pub fn service_with_connection(
        &self,
        policy: RunPolicy,
        connection: ConnectionConfig,
    ) -> Result<RunService> {
        let catalog = Catalog::discover(&self.migrations, None)?;
        Ok(self.assemble(catalog, connection, policy, Duration::from_secs(30)))
    }

    fn assemble(
        &self,
        catalog: Catalog,
        connection: ConnectionConfig,
        policy: RunPolicy,
        timeout: Duration,
    ) -> RunService {
        RunService::new(
            catalog,
            StateStore::new(&self.state_path),
            Executor::new(connection, "sh", timeout),
            policy,
        )
    }

    /// Names from the witness log, in execution order.
    pub fn executions(&self) -> Vec<String> {
        fs::read_to_string(&self.witness)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn state(&self) -> StateMap {
        StateStore::new(&self.state_path).load()
    }

    pub fn store(&self) -> StateStore {
        StateStore::new(&self.state_path)
    }
}
