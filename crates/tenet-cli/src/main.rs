//! Tenet CLI - Validate JSON records against rule files

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, rules};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tenet")]
#[command(about = "Validate records against declarative rule files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON record against a rule file
    Check {
        /// Path to the JSON record
        record: String,

        /// Rule file, or a project directory containing rules/*.toml
        #[arg(long)]
        rules: String,

        /// Report field paths under this naming scheme
        #[arg(long)]
        scheme: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json", "wire"])]
        format: String,
    },

    /// List the rules and settings in a rule file
    Rules {
        /// Rule file, or a project directory containing rules/*.toml
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            record,
            rules,
            scheme,
            format,
        } => check::run(check::CheckArgs {
            record,
            rules,
            scheme,
            format,
        }),
        Commands::Rules { path } => rules::run(&path),
    }
}
