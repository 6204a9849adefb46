use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Rows},
};
use terminal_size::{Width as TermWidth, terminal_size};

use crate::{
    catalog::Catalog,
    cli::{Context, commands::ExitOnErr},
    store::{MigrationRecord, StateMap, StateStore},
    types::{MigrationKind, RunPolicy},
    utils::{parsers::parse_run_policy, validate_dir},
};

#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Migration directory, overrides the configured one
    #[arg(long, value_name = "DIR", value_parser = validate_dir)]
    dir: Option<PathBuf>,

    /// Run policy: selects which state file to read
    #[arg(long, value_name = "POLICY", value_parser = parse_run_policy)]
    policy: Option<RunPolicy>,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Migration")]
    name: String,

    #[tabled(rename = "Kind")]
    kind: String,

    #[tabled(rename = "Status")]
    status: String,

    #[tabled(rename = "Attempts")]
    attempts: String,

    #[tabled(rename = "Fingerprint")]
    fingerprint: String,

    #[tabled(rename = "Finished At")]
    finished_at: String,
}

pub async fn execute(args: &StatusArgs, ctx: &Context<'_>) {
    let mut catalog_config = ctx.settings.catalog.clone();
    if let Some(dir) = &args.dir {
        catalog_config.dir = dir.clone();
    }
    let policy = args
        .policy
        .clone()
        .unwrap_or_else(|| catalog_config.policy.clone());

    let catalog =
        Catalog::from_config(&catalog_config).exit_on_err("Failed to load migration catalog");
    let store = StateStore::new(ctx.settings.runner.state_path(&policy));
    let state = store.load();

    println!(
        "{} (policy: {}, state file: {})",
        "=== Migration Status ===".blue(),
        policy,
        store.path().display()
    );

    if catalog.is_empty() && state.is_empty() {
        println!("✅ No migrations found");
        return;
    }

    let mut table_data = Vec::new();
    let mut index = 1;

    for migration in catalog.iter() {
        let record = state.get(&migration.name);
        table_data.push(StatusRow {
            index: index.to_string().bright_black().to_string(),
            name: migration.name.clone(),
            kind: migration.kind.to_colored_string(),
            status: record
                .map(|r| r.status.to_colored_string())
                .unwrap_or_else(|| "PENDING".bright_black().to_string()),
            attempts: record
                .map(|r| r.attempts.to_string())
                .unwrap_or_else(|| "-".to_string()),
            fingerprint: record
                .and_then(|r| r.fingerprint.as_deref())
                .map(short_fingerprint)
                .unwrap_or_else(|| "-".to_string()),
            finished_at: record
                .map(|r| r.finished_at.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        });
        index += 1;
    }

    for (name, record) in orphaned_records(&catalog, &state) {
        table_data.push(StatusRow {
            index: index.to_string().bright_black().to_string(),
            name: format!("{} {}", name, "(not in catalog)".bright_black()),
            kind: MigrationKind::from_path(Path::new(name)).to_colored_string(),
            status: record.status.to_colored_string(),
            attempts: record.attempts.to_string(),
            fingerprint: record
                .fingerprint
                .as_deref()
                .map(short_fingerprint)
                .unwrap_or_else(|| "-".to_string()),
            finished_at: record.finished_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        });
        index += 1;
    }

    let terminal_width = if let Some((TermWidth(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    };

    let table = Table::new(table_data)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .with(Width::increase(terminal_width))
        .to_string();
    println!("{}", table);
}

fn short_fingerprint(hex: &str) -> String {
    hex.chars().take(12).collect()
}

fn orphaned_records<'a>(
    catalog: &Catalog,
    state: &'a StateMap,
) -> Vec<(&'a String, &'a MigrationRecord)> {
    state
        .iter()
        .filter(|(name, _)| !catalog.contains(name))
        .collect()
}
