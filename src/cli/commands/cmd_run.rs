use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::{
    cli::{
        Context,
        commands::{ExitOnErr, new_spinner},
    },
    services::{Decision, build_run_service},
    types::{ExitPolicy, RunPolicy},
    utils::{ProgressReporter, parsers::parse_run_policy, validate_dir},
};

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Migration directory, overrides the configured one
    #[arg(long, value_name = "DIR", value_parser = validate_dir)]
    dir: Option<PathBuf>,

    /// Run policy: run-once or run-if-changed, overrides the configured one
    #[arg(long, value_name = "POLICY", value_parser = parse_run_policy)]
    policy: Option<RunPolicy>,

    /// Print the decision table without executing anything or writing state
    #[arg(long)]
    dry: bool,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Migration")]
    name: String,

    #[tabled(rename = "Kind")]
    kind: String,

    #[tabled(rename = "Decision")]
    decision: String,

    #[tabled(rename = "Reason")]
    reason: String,
}

pub async fn execute(args: &RunArgs, ctx: &Context<'_>) {
    if args.dry {
        dry_run(args, ctx);
    } else {
        run(args, ctx).await;
    }
}

fn dry_run(args: &RunArgs, ctx: &Context<'_>) {
    let service = build_run_service(ctx.settings, args.dir.clone(), args.policy.clone())
        .exit_on_err("Failed to load migration catalog");

    println!(
        "{} (policy: {})",
        "=== Dry Run ===".blue(),
        service.policy()
    );

    let plan = service.plan();
    if plan.is_empty() {
        println!("✅ No migrations found");
        return;
    }

    let table_data: Vec<PlanRow> = plan
        .iter()
        .enumerate()
        .map(|(i, (migration, decision))| {
            let (verdict, reason) = match decision {
                Decision::Run(reason) => ("RUN".green().bold().to_string(), reason.to_string()),
                Decision::Skip(reason) => ("SKIP".yellow().to_string(), reason.to_string()),
            };
            PlanRow {
                index: (i + 1).to_string().bright_black().to_string(),
                name: migration.name.clone(),
                kind: migration.kind.to_colored_string(),
                decision: verdict,
                reason,
            }
        })
        .collect();

    let table = Table::new(table_data)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

async fn run(args: &RunArgs, ctx: &Context<'_>) {
    let service = build_run_service(ctx.settings, args.dir.clone(), args.policy.clone())
        .exit_on_err("Failed to load migration catalog");
    let exit_policy = ctx.settings.runner.effective_exit_policy(service.policy());

    let (spinner, tx) = new_spinner();
    let progress = ProgressReporter::new(Some(tx));

    let res = service.run(progress).await;
    spinner.finish_and_clear();

    let summary = res.exit_on_err("Migration run aborted");

    println!("{}", "=== Migration Summary ===".blue());
    println!("✅ Successful: {}", summary.succeeded);
    println!("❌ Failed: {}", summary.failed);
    println!("⏭️  Skipped: {}", summary.skipped);
    println!("📊 Total: {} ({})", summary.total(), summary.duration_string());

    if summary.has_failures() {
        for name in &summary.failed_migrations {
            eprintln!("   ❌ {}", name);
        }
        println!("\n⚠️  Some migrations failed. Check the logs for details.");
        if exit_policy == ExitPolicy::Strict {
            std::process::exit(1);
        }
    } else {
        println!("\n✨ All migrations completed successfully!");
    }
}
