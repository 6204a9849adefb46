use clap::Parser;

use crate::{
    cli::{Context, commands::ExitOnErr},
    store::StateStore,
    types::RunPolicy,
    utils::parsers::parse_run_policy,
};

#[derive(Parser, Debug, Clone)]
pub struct ResetArgs {
    /// Run policy: selects which state file to reset
    #[arg(long, value_name = "POLICY", value_parser = parse_run_policy)]
    policy: Option<RunPolicy>,

    /// Remove the record for one migration only
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Confirm the reset
    #[arg(short, long)]
    yes: bool,
}

pub async fn execute(args: &ResetArgs, ctx: &Context<'_>) {
    let policy = args
        .policy
        .clone()
        .unwrap_or_else(|| ctx.settings.catalog.policy.clone());
    let store = StateStore::new(ctx.settings.runner.state_path(&policy));

    if !args.yes {
        match &args.name {
            Some(name) => eprintln!(
                "❌ This would remove the record for '{}' from {}. Re-run with --yes to confirm",
                name,
                store.path().display()
            ),
            None => eprintln!(
                "❌ This would clear all records in {}. Re-run with --yes to confirm",
                store.path().display()
            ),
        }
        std::process::exit(1);
    }

    match &args.name {
        Some(name) => {
            let removed = store
                .remove(name)
                .exit_on_err(&format!("Failed to reset '{}'", name));
            if removed {
                println!("✅ Record for '{}' removed, it will run again", name);
            } else {
                println!("✅ No record found for '{}'", name);
            }
        }
        None => {
            let removed = store.clear().exit_on_err("Failed to clear migration state");
            if removed {
                println!("✅ Migration state cleared, all migrations will run again");
            } else {
                println!("✅ No state file found, nothing to clear");
            }
        }
    }
}
