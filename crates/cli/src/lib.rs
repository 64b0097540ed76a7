pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "cxhook",
    about = "cxhook operator CLI",
    long_about = "Inspect configuration, list fulfillment tags, run requests locally, and smoke-test a running webhook.",
    after_help = "Examples:\n  cxhook config\n  cxhook tags\n  cxhook fulfill --file request.json\n  cxhook smoke --url http://127.0.0.1:8080/webhook"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "List the fulfillment tags the webhook answers")]
    Tags,
    #[command(about = "Run a webhook request body through the handlers without a server")]
    Fulfill {
        #[arg(long, help = "Request JSON file (reads stdin when omitted)")]
        file: Option<PathBuf>,
    },
    #[command(about = "POST a sample confirm request to a running webhook and verify the reply")]
    Smoke {
        #[arg(long, help = "Full webhook URL, e.g. http://127.0.0.1:8080/webhook")]
        url: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Tags => commands::tags::run(),
        Command::Fulfill { file } => commands::fulfill::run(file.as_deref()),
        Command::Smoke { url } => commands::smoke::run(&url),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
