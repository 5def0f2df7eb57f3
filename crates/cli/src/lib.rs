pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::commands::BriefInput;

#[derive(Debug, Parser)]
#[command(
    name = "leadflow",
    about = "Leadflow operator CLI",
    long_about = "Normalize sales briefs, push contacts to the CRM, and sign or verify CRM webhooks.",
    after_help = "Examples:\n  leadflow normalize --file brief.txt\n  leadflow upsert --text \"...\"\n  leadflow verify --body '{}' --timestamp 1732392000 --signature sha256=..."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Extract a normalized record from a brief without contacting the CRM")]
    Normalize {
        #[command(flatten)]
        input: BriefInput,
    },
    #[command(about = "Extract a record from a brief and upsert it as a CRM contact")]
    Upsert {
        #[command(flatten)]
        input: BriefInput,
    },
    #[command(about = "Compute the webhook signature header for a body and timestamp")]
    Sign {
        #[arg(long, help = "Raw request body, signed byte for byte")]
        body: String,
        #[arg(long, help = "Unix timestamp in seconds; defaults to now")]
        timestamp: Option<String>,
    },
    #[command(about = "Verify a webhook signature against the configured secret")]
    Verify {
        #[arg(long, help = "Raw request body, byte for byte as received")]
        body: String,
        #[arg(long)]
        timestamp: String,
        #[arg(long, help = "Signature header value, `sha256=<hex>`")]
        signature: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Normalize { input } => commands::normalize::run(&input),
        Command::Upsert { input } => commands::upsert::run(&input),
        Command::Sign { body, timestamp } => commands::sign::run(&body, timestamp.as_deref()),
        Command::Verify { body, timestamp, signature } => {
            commands::verify::run(&body, &timestamp, &signature)
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
