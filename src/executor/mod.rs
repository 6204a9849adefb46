use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::catalog::Migration;
use crate::config::{ConnectionConfig, ResolvedConnection};
use crate::types::MigrationKind;

/// What happened to one subprocess invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The process ran to completion; `code` is None when a signal killed it.
    Exited { code: Option<i32> },
    /// The time budget expired and the process was killed.
    TimedOut,
    /// The process could not be started at all (missing binary, unusable
    /// connection configuration).
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub outcome: ExecutionOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    fn error(message: String) -> Self {
        Self {
            outcome: ExecutionOutcome::Error(message),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ExecutionOutcome::Exited { code: Some(0) })
    }
}

/// Runs migrations out-of-process: scripts through the configured
/// interpreter, statement batches through `psql`. Failures of any shape
/// travel back inside the `ExecutionResult`; this boundary never errors and
/// never mutates the target itself.
pub struct Executor {
    connection: ConnectionConfig,
    interpreter: String,
    timeout: Duration,
}

impl Executor {
    pub fn new(
        connection: ConnectionConfig,
        interpreter: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            connection,
            interpreter: interpreter.into(),
            timeout,
        }
    }

    pub async fn execute(&self, migration: &Migration) -> ExecutionResult {
        let command = match migration.kind {
            MigrationKind::Script => self.script_command(migration),
            MigrationKind::Sql => match self.connection.resolve() {
                Ok(conn) => {
                    debug!(
                        target_db = %conn.display_target(),
                        migration = %migration.name,
                        "Invoking psql"
                    );
                    self.sql_command(&conn, migration)
                }
                Err(e) => return ExecutionResult::error(e.to_string()),
            },
        };

        self.run(command, &migration.name).await
    }

    fn script_command(&self, migration: &Migration) -> Command {
        let mut command = Command::new(&self.interpreter);
        command.arg(&migration.path);
        command
    }

    fn sql_command(&self, conn: &ResolvedConnection, migration: &Migration) -> Command {
        let mut command = Command::new("psql");
        command
            .arg("-h")
            .arg(&conn.host)
            .arg("-p")
            .arg(conn.port.to_string())
            .arg("-U")
            .arg(&conn.user)
            .arg("-d")
            .arg(&conn.database)
            // Without ON_ERROR_STOP psql exits 0 even when statements fail
            .arg("-v")
            .arg("ON_ERROR_STOP=1")
            .arg("-f")
            .arg(&migration.path)
            .env("PGPASSWORD", &conn.password);
        command
    }

    async fn run(&self, mut command: Command, name: &str) -> ExecutionResult {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                let program = command
                    .as_std()
                    .get_program()
                    .to_string_lossy()
                    .into_owned();
                return ExecutionResult::error(format!("Failed to spawn '{}': {}", program, e));
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => ExecutionResult {
                outcome: ExecutionOutcome::Exited {
                    code: output.status.code(),
                },
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Ok(Err(e)) => ExecutionResult::error(format!("Failed to collect output: {}", e)),
            Err(_) => {
                // Dropping the timed-out future kills the child (kill_on_drop)
                warn!(
                    migration = %name,
                    timeout_secs = self.timeout.as_secs(),
                    "Migration exceeded its time budget"
                );
                ExecutionResult {
                    outcome: ExecutionOutcome::TimedOut,
                    stdout: String::new(),
                    stderr: String::new(),
                }
            }
        }
    }
}
