pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use royal_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing::Level;

use commands::book::BookArgs;
use commands::join::JoinArgs;
use commands::playlist::PlaylistArgs;
use commands::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(
    name = "royal",
    about = "Royal Events booking CLI",
    long_about = "Price events, draft service agreements, generate playlists, and capture leads.",
    after_help = "Examples:\n  royal quote --start 19:00 --end 23:00 --mics\n  \
                  royal playlist --vibe \"rooftop sunset\" --count 15\n  royal doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price an event from its times and add-ons")]
    Quote(QuoteArgs),
    #[command(about = "Fill the booking form, draft the agreement, and optionally confirm it")]
    Book(BookArgs),
    #[command(about = "Generate a schema-constrained playlist for a vibe")]
    Playlist(PlaylistArgs),
    #[command(about = "Join the mailing list")]
    Join(JoinArgs),
    #[command(about = "Apply pending migrations to the sqlite lead store")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, AI credential, and lead store readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

/// Logs go to stderr so stdout stays a single JSON outcome.
fn init_logging(config: &AppConfig) {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report config errors themselves; logging falls back to defaults.
    let logging_config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    init_logging(&logging_config);

    let result = match cli.command {
        Command::Quote(args) => commands::quote::run(&args),
        Command::Book(args) => commands::book::run(&args),
        Command::Playlist(args) => commands::playlist::run(&args),
        Command::Join(args) => commands::join::run(&args),
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
