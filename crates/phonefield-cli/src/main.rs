mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, countries, phone, replay, Context};
use crate::error::{exit_code_for, report_error};
use crate::util::parse_country;
use phonefield_config as config;
use phonefield_core::UnmatchedPrefix;

#[derive(Debug, Parser)]
#[command(name = "phonefield", version, about = "phonefield CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Country used for values without a leading '+'
    #[arg(long, global = true)]
    default_country: Option<String>,
    /// Keep unmatched '+' values instead of failing
    #[arg(long, global = true)]
    lenient: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format a value for display
    Format(phone::PhoneArgs),
    /// Show the resolved country and national digits
    Parse(phone::PhoneArgs),
    /// Exit non-zero when a value is not a valid phone number
    Validate(phone::PhoneArgs),
    /// List known countries
    Countries(countries::CountriesArgs),
    /// Replay field events from a file or stdin
    Replay(replay::ReplayArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        default_country,
        lenient,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let mut app_config =
                config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            if let Some(raw) = default_country {
                app_config.default_country_iso = parse_country(&raw)?;
            }
            if lenient {
                app_config.resolve.unmatched_prefix = UnmatchedPrefix::Lenient;
            }

            let engine = app_config
                .engine()
                .with_context(|| "build phone engine")?;
            debug!(
                default_country = engine.default_country_iso(),
                rules = engine.rules().len(),
                "engine ready"
            );

            let ctx = Context {
                engine: &engine,
                json,
                config: &app_config,
            };

            match command {
                Command::Format(args) => phone::format(&ctx, args),
                Command::Parse(args) => phone::parse(&ctx, args),
                Command::Validate(args) => phone::validate(&ctx, args),
                Command::Countries(args) => countries::list_countries(&ctx, args),
                Command::Replay(args) => replay::replay(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
