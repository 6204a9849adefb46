use std::fmt;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, Migration};
use crate::executor::{ExecutionOutcome, ExecutionResult, Executor};
use crate::store::{MigrationRecord, StateStore};
use crate::types::{MigrationStatus, RunPolicy, RunSummary};
use crate::utils::{ProgressReporter, fingerprint_file};

/// Captured output kept per record, in characters.
const OUTPUT_EXCERPT_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum RunReason {
    NeverRun,
    Changed,
    Retry,
}

impl fmt::Display for RunReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReason::NeverRun => write!(f, "never run"),
            RunReason::Changed => write!(f, "content changed"),
            RunReason::Retry => write!(f, "retry after earlier failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    AlreadyApplied,
    MissingPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyApplied => write!(f, "already applied"),
            SkipReason::MissingPayload => write!(f, "payload missing"),
        }
    }
}

/// Verdict for one migration before anything executes.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Run(RunReason),
    Skip(SkipReason),
}

impl Decision {
    pub fn is_run(&self) -> bool {
        matches!(self, Decision::Run(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Run(reason) => write!(f, "run ({reason})"),
            Decision::Skip(reason) => write!(f, "skip ({reason})"),
        }
    }
}

/// Drives one catalog through the decide -> execute -> record loop, in
/// catalog order, one migration at a time. State is persisted after every
/// migration so an interrupted run resumes where it stopped; a failing
/// migration never stops the ones after it.
pub struct RunService {
    catalog: Catalog,
    store: StateStore,
    executor: Executor,
    policy: RunPolicy,
}

impl RunService {
    pub fn new(catalog: Catalog, store: StateStore, executor: Executor, policy: RunPolicy) -> Self {
        Self {
            catalog,
            store,
            executor,
            policy,
        }
    }

    pub fn policy(&self) -> &RunPolicy {
        &self.policy
    }

    /// Skip-vs-run verdict for one migration, from the payload and the prior
    /// record as they are right now.
    pub fn decide(&self, migration: &Migration, record: Option<&MigrationRecord>) -> Decision {
        match self.policy {
            RunPolicy::RunOnce => match record {
                Some(record) if record.status.is_success() => {
                    Decision::Skip(SkipReason::AlreadyApplied)
                }
                _ if !migration.path.is_file() => {
                    warn!(
                        migration = %migration.name,
                        path = %migration.path.display(),
                        "Payload not found, skipping"
                    );
                    Decision::Skip(SkipReason::MissingPayload)
                }
                Some(_) => Decision::Run(RunReason::Retry),
                None => Decision::Run(RunReason::NeverRun),
            },
            RunPolicy::RunIfChanged => {
                if !migration.path.is_file() {
                    warn!(
                        migration = %migration.name,
                        path = %migration.path.display(),
                        "Payload not found, skipping"
                    );
                    return Decision::Skip(SkipReason::MissingPayload);
                }
                let Some(record) = record else {
                    return Decision::Run(RunReason::NeverRun);
                };
                if !record.status.is_success() {
                    return Decision::Run(RunReason::Retry);
                }
                match fingerprint_file(&migration.path) {
                    Ok(current) if record.fingerprint.as_deref() == Some(current.as_str()) => {
                        Decision::Skip(SkipReason::AlreadyApplied)
                    }
                    Ok(_) => Decision::Run(RunReason::Changed),
                    Err(e) => {
                        warn!(migration = %migration.name, error = %e, "Payload unreadable, skipping");
                        Decision::Skip(SkipReason::MissingPayload)
                    }
                }
            }
        }
    }

    /// Decision preview over the whole catalog. Executes nothing and writes
    /// no state.
    pub fn plan(&self) -> Vec<(Migration, Decision)> {
        let state = self.store.load();
        self.catalog
            .iter()
            .map(|migration| {
                let decision = self.decide(migration, state.get(&migration.name));
                (migration.clone(), decision)
            })
            .collect()
    }

    pub async fn run(&self, progress: ProgressReporter) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let mut state = self.store.load();
        let mut summary = RunSummary {
            started_at: Some(Utc::now()),
            ..Default::default()
        };

        info!(
            run_id = %run_id,
            policy = %self.policy,
            migrations = self.catalog.len(),
            state_file = %self.store.path().display(),
            "Starting migration run"
        );

        for migration in self.catalog.iter() {
            let decision = self.decide(migration, state.get(&migration.name));
            match decision {
                Decision::Skip(reason) => {
                    debug!(migration = %migration.name, reason = %reason, "Skipping");
                    progress.report(format!("⏭️  {} ({})", migration.name, reason));
                    summary.record_skip();
                    continue;
                }
                Decision::Run(reason) => {
                    debug!(
                        migration = %migration.name,
                        kind = %migration.kind,
                        reason = %reason,
                        "Executing migration"
                    );
                    progress.report(format!("Running {} ({})...", migration.name, reason));
                }
            }

            let result = self.executor.execute(migration).await;
            let record = self.build_record(migration, &result, state.get(&migration.name));

            if record.status.is_success() {
                info!(
                    migration = %migration.name,
                    attempts = record.attempts,
                    "Migration succeeded"
                );
                progress.report(format!("✅ {}", migration.name));
                summary.record_success();
            } else {
                warn!(
                    migration = %migration.name,
                    status = %record.status,
                    attempts = record.attempts,
                    output = record.output.as_deref().unwrap_or(""),
                    "Migration did not complete"
                );
                progress.report(format!("❌ {} ({})", migration.name, record.status));
                summary.record_failure(&migration.name);
            }

            state.insert(migration.name.clone(), record);
            // Persisted before moving on, so a crash costs at most this unit
            self.store
                .save(&state)
                .with_context(|| format!("Run aborted after '{}'", migration.name))?;
        }

        summary.finished_at = Some(Utc::now());
        info!(
            run_id = %run_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            duration = %summary.duration_string(),
            "Run complete"
        );

        Ok(summary)
    }

    fn build_record(
        &self,
        migration: &Migration,
        result: &ExecutionResult,
        prior: Option<&MigrationRecord>,
    ) -> MigrationRecord {
        let status = match result.outcome {
            ExecutionOutcome::Exited { code: Some(0) } => MigrationStatus::Success,
            ExecutionOutcome::Exited { .. } => MigrationStatus::Failed,
            ExecutionOutcome::Error(_) => MigrationStatus::Failed,
            ExecutionOutcome::TimedOut => MigrationStatus::TimedOut,
        };

        let output = match &result.outcome {
            ExecutionOutcome::TimedOut => None,
            ExecutionOutcome::Error(message) => Some(tail(message, OUTPUT_EXCERPT_CHARS)),
            ExecutionOutcome::Exited { code: Some(0) } => {
                Some(tail(&result.stdout, OUTPUT_EXCERPT_CHARS)).filter(|s| !s.is_empty())
            }
            ExecutionOutcome::Exited { .. } => {
                let source = if result.stderr.trim().is_empty() {
                    &result.stdout
                } else {
                    &result.stderr
                };
                Some(tail(source, OUTPUT_EXCERPT_CHARS)).filter(|s| !s.is_empty())
            }
        };

        // Recorded from the payload as executed, re-read after the run
        let fingerprint = if self.policy.uses_fingerprint() {
            fingerprint_file(&migration.path).ok()
        } else {
            None
        };

        MigrationRecord {
            status,
            fingerprint,
            finished_at: Utc::now(),
            attempts: prior.map(|r| r.attempts).unwrap_or(0) + 1,
            output,
        }
    }
}

fn tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        text.chars().skip(count - max_chars).collect()
    }
}
