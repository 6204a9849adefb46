use std::fs;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use ratchet::{
    config::ConnectionConfig,
    store::{MigrationRecord, StateMap},
    types::{MigrationStatus, RunPolicy},
    utils::{ProgressReporter, sha256_hex},
};

use crate::common::Sandbox;

#[tokio::test]
async fn test_run_applies_catalog_in_order_and_records_success() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_ok("002_teams.py")?;
    sandbox.add_ok("003_sprints.py")?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(
        sandbox.executions(),
        vec!["001_users.py", "002_teams.py", "003_sprints.py"]
    );

    let state = sandbox.state();
    assert_eq!(state.len(), 3);
    for record in state.values() {
        assert_eq!(record.status, MigrationStatus::Success);
        assert_eq!(record.attempts, 1);
        assert_eq!(record.fingerprint, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_second_run_skips_everything_without_executing() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_ok("002_teams.py")?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    service.run(ProgressReporter::disabled()).await?;
    let bytes_after_first = fs::read(&sandbox.state_path)?;

    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(sandbox.executions().len(), 2);
    assert_eq!(fs::read(&sandbox.state_path)?, bytes_after_first);
    Ok(())
}

#[tokio::test]
async fn test_failure_is_isolated_and_retried_with_attempt_count() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_failing("002_teams.py")?;
    sandbox.add_ok("003_sprints.py")?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed_migrations, vec!["002_teams.py"]);
    assert_eq!(
        sandbox.executions(),
        vec!["001_users.py", "002_teams.py", "003_sprints.py"]
    );

    let state = sandbox.state();
    assert_eq!(state["002_teams.py"].status, MigrationStatus::Failed);
    assert_eq!(state["002_teams.py"].attempts, 1);
    assert!(state["002_teams.py"].output.as_deref().unwrap().contains("boom"));

    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 2);

    let state = sandbox.state();
    assert_eq!(state["002_teams.py"].attempts, 2);
    assert_eq!(state["001_users.py"].attempts, 1);
    assert_eq!(state["003_sprints.py"].attempts, 1);
    // Only the failed migration ran again
    assert_eq!(sandbox.executions().len(), 4);
    assert_eq!(sandbox.executions()[3], "002_teams.py");
    Ok(())
}

#[tokio::test]
async fn test_interrupted_run_resumes_where_it_stopped() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_ok("002_teams.py")?;
    sandbox.add_ok("003_sprints.py")?;

    // State left behind by a run that died after the first migration
    let mut seeded = StateMap::new();
    seeded.insert(
        "001_users.py".to_string(),
        MigrationRecord {
            status: MigrationStatus::Success,
            fingerprint: None,
            finished_at: Utc::now(),
            attempts: 1,
            output: None,
        },
    );
    sandbox.store().save(&seeded)?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(sandbox.executions(), vec!["002_teams.py", "003_sprints.py"]);
    assert_eq!(sandbox.state().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_state_file_reruns_everything() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_ok("002_teams.py")?;
    fs::write(&sandbox.state_path, "{ this is not json")?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(sandbox.executions().len(), 2);

    // The state file is valid again afterwards
    let state = sandbox.state();
    assert_eq!(state.len(), 2);
    assert!(state.values().all(|r| r.status == MigrationStatus::Success));
    Ok(())
}

#[tokio::test]
async fn test_missing_payload_is_skipped_without_record() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;

    let service =
        sandbox.service_with_entries(RunPolicy::RunOnce, &["001_users.py", "002_ghost.py"]);
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);

    let state = sandbox.state();
    assert!(state.contains_key("001_users.py"));
    assert!(!state.contains_key("002_ghost.py"));
    Ok(())
}

#[tokio::test]
async fn test_state_is_persisted_before_next_migration_runs() -> Result<()> {
    let sandbox = Sandbox::new()?;
    let captured = sandbox.dir.path().join("captured.json");

    sandbox.add_ok("001_users.py")?;
    // Snapshots the state file as seen while this migration is running
    sandbox.write_script(
        "002_capture.py",
        &format!(
            "cat \"{}\" > \"{}\"\n",
            sandbox.state_path.display(),
            captured.display()
        ),
    )?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    service.run(ProgressReporter::disabled()).await?;

    let snapshot: StateMap = serde_json::from_str(&fs::read_to_string(&captured)?)?;
    assert_eq!(snapshot["001_users.py"].status, MigrationStatus::Success);
    assert!(!snapshot.contains_key("002_capture.py"));
    Ok(())
}

#[tokio::test]
async fn test_timeout_kills_migration_and_run_continues() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.write_script("001_slow.py", "sleep 3\n")?;
    sandbox.add_ok("002_after.py")?;

    let service = sandbox.service_with_timeout(RunPolicy::RunOnce, Duration::from_secs(1))?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let state = sandbox.state();
    assert_eq!(state["001_slow.py"].status, MigrationStatus::TimedOut);
    assert_eq!(state["001_slow.py"].output, None);
    assert_eq!(state["002_after.py"].status, MigrationStatus::Success);
    assert_eq!(sandbox.executions(), vec!["002_after.py"]);
    Ok(())
}

#[tokio::test]
async fn test_changed_content_reruns_under_run_if_changed() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("10_reindex.py")?;
    sandbox.add_ok("11_backfill.py")?;

    let service = sandbox.service(RunPolicy::RunIfChanged)?;
    service.run(ProgressReporter::disabled()).await?;

    let changed_body = format!(
        "echo 10_reindex.py >> \"{}\"\n# second pass\n",
        sandbox.witness.display()
    );
    sandbox.write_script("10_reindex.py", &changed_body)?;

    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        sandbox.executions(),
        vec!["10_reindex.py", "11_backfill.py", "10_reindex.py"]
    );

    let state = sandbox.state();
    assert_eq!(state["10_reindex.py"].attempts, 2);
    assert_eq!(
        state["10_reindex.py"].fingerprint.as_deref(),
        Some(sha256_hex(changed_body.as_bytes()).as_str())
    );
    Ok(())
}

#[tokio::test]
async fn test_unchanged_content_skips_under_run_if_changed() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("10_reindex.py")?;

    let service = sandbox.service(RunPolicy::RunIfChanged)?;
    service.run(ProgressReporter::disabled()).await?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.skipped, 1);
    assert_eq!(sandbox.executions().len(), 1);
    assert!(sandbox.state()["10_reindex.py"].fingerprint.is_some());
    Ok(())
}

#[tokio::test]
async fn test_sql_with_bad_connection_url_is_recorded_failed() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.write_script("001_schema.sql", "select 1;\n")?;
    sandbox.add_ok("002_after.py")?;

    let connection = ConnectionConfig {
        url: Some("mysql://db/timetrack".to_string()),
        ..ConnectionConfig::default()
    };
    let service = sandbox.service_with_connection(RunPolicy::RunOnce, connection)?;
    let summary = service.run(ProgressReporter::disabled()).await?;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let state = sandbox.state();
    assert_eq!(state["001_schema.sql"].status, MigrationStatus::Failed);
    assert!(
        state["001_schema.sql"]
            .output
            .as_deref()
            .unwrap()
            .contains("Unsupported connection URL scheme")
    );
    assert_eq!(state["002_after.py"].status, MigrationStatus::Success);
    Ok(())
}

#[tokio::test]
async fn test_plan_previews_without_executing() -> Result<()> {
    let sandbox = Sandbox::new()?;
    sandbox.add_ok("001_users.py")?;
    sandbox.add_ok("002_teams.py")?;

    let service = sandbox.service(RunPolicy::RunOnce)?;
    service.run(ProgressReporter::disabled()).await?;

    sandbox.add_ok("003_sprints.py")?;
    let service = sandbox.service(RunPolicy::RunOnce)?;
    let bytes_before = fs::read(&sandbox.state_path)?;

    let plan = service.plan();

    assert_eq!(plan.len(), 3);
    assert!(!plan[0].1.is_run());
    assert!(!plan[1].1.is_run());
    assert!(plan[2].1.is_run());
    // Nothing executed, nothing written
    assert_eq!(sandbox.executions().len(), 2);
    assert_eq!(fs::read(&sandbox.state_path)?, bytes_before);
    Ok(())
}
