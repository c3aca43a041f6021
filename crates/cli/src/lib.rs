pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "trellis",
    about = "Trellis operator CLI",
    long_about = "Operate Trellis runtime readiness, migrations, seed data, config inspection, \
                  and combination resolution.",
    after_help = "Examples:\n  trellis doctor --json\n  trellis config\n  trellis suggest small full_sun beginner low food"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic suggestion-set and store-item seed dataset")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database connectivity, and catalog readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Resolve a combination profile against the stored suggestion sets")]
    Suggest {
        space: String,
        sunlight: String,
        experience: String,
        time: String,
        purpose: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Suggest { space, sunlight, experience, time, purpose } => {
            commands::suggest::run(&space, &sunlight, &experience, &time, &purpose)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
