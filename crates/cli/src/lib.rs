pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pitchcraft_core::config::{ConfigOverrides, LoadOptions};
use pitchcraft_core::{Language, ReportKind};

#[derive(Debug, Parser)]
#[command(
    name = "pitchcraft",
    about = "Pitchcraft sales-proposal CLI",
    long_about = "Run the guided proposal wizard, inspect the service catalog and configuration, and regenerate proposal documents from saved state.",
    after_help = "Examples:\n  pitchcraft wizard\n  pitchcraft catalog --json\n  pitchcraft proposal --lang en --kind detailed"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the saved-state file path")]
    state: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the service catalog file path")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the log level")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the interactive five-step proposal wizard")]
    Wizard,
    #[command(about = "List the service catalog with monthly prices and bundle tiers")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog, saved state, and LLM endpoint reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Regenerate the proposal document from saved state")]
    Proposal {
        #[arg(long, default_value = "en", help = "Proposal language (en|ar)")]
        lang: Language,
        #[arg(long, default_value = "quick", help = "Report kind (quick|detailed)")]
        kind: ReportKind,
        #[arg(long, help = "Output file path (defaults to a name derived from the company)")]
        out: Option<PathBuf>,
    },
    #[command(about = "Discard saved wizard state and start a new proposal")]
    Reset,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                state_path: self.state.clone(),
                catalog_path: self.catalog.clone(),
                log_level: self.log_level.clone(),
                llm_base_url: None,
                llm_model: None,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    let result = match cli.command {
        Command::Wizard => commands::wizard::run(options),
        Command::Catalog { json } => commands::catalog::run(options, json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(options, json) }
        }
        Command::Proposal { lang, kind, out } => {
            commands::proposal::run(options, lang, kind, out.as_deref())
        }
        Command::Reset => commands::reset::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
