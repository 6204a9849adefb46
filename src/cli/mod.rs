mod commands;

use clap::Parser;
use colored::Colorize;

use crate::cli::commands::{Commands, cmd_reset, cmd_run, cmd_status, cmd_version};
use crate::config::Settings;

pub struct Context<'a> {
    pub settings: &'a Settings,
}

#[derive(Parser, Debug)]
#[command(
    name = "ratchet",
    about = "Ratchet CLI application",
    long_about = format!(
r#"{} - {}
by {} - {}"#,
"RATCHET".green().bold(),
"Forward-only migration runner for Postgres databases and operational scripts.",
"primeit".blue(), "https://primeit.com.tr".on_bright_black()
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub async fn execute(&self, ctx: &Context<'_>) {
        match &self.command {
            Commands::Run(args) => cmd_run::execute(args, ctx).await,
            Commands::Status(args) => cmd_status::execute(args, ctx).await,
            Commands::Reset(args) => cmd_reset::execute(args, ctx).await,
            Commands::Version(action) => cmd_version::execute(action, ctx.settings).await,
        }
    }
}
