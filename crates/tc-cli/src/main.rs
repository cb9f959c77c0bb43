use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tc_cli::commands::{adjust, analyze, note, start, status, stop, submit, summary};
use tc_cli::observer::XpropObserver;
use tc_cli::writer::LogWriter;
use tc_cli::{Cli, Commands, Config};

/// Load config, applying the `--file` override.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(file) = &cli.file {
        config.log_file.clone_from(file);
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Whole-file read for the analysis commands; a missing log is a hard
/// error rather than an empty report.
fn read_log(config: &Config) -> Result<String> {
    std::fs::read_to_string(&config.log_file)
        .with_context(|| format!("failed to read log file {}", config.log_file.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = load_config(&cli)?;

    match &cli.command {
        Some(Commands::Start { interval, note }) => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
                .context("failed to install signal handler")?;
            start::run(
                &config,
                &XpropObserver,
                *interval,
                note.as_deref(),
                &shutdown,
            )?;
        }
        Some(Commands::Stop { note }) => stop::run(&config, note.as_deref())?,
        Some(Commands::Note { text }) => note::run(&LogWriter::new(&config.log_file), text)?,
        Some(Commands::Adjust { seconds }) => {
            adjust::run(&LogWriter::new(&config.log_file), *seconds)?;
        }
        Some(Commands::Submit) => submit::run(&LogWriter::new(&config.log_file))?,
        Some(Commands::Summary { range, json }) => {
            let log_text = read_log(&config)?;
            summary::run(
                &mut std::io::stdout().lock(),
                &log_text,
                range.as_deref(),
                config.rounding.as_ref(),
                chrono::Local::now().naive_local(),
                *json,
            )?;
        }
        Some(Commands::Analyze { json }) => {
            let log_text = read_log(&config)?;
            analyze::run(&mut std::io::stdout().lock(), &log_text, *json)?;
        }
        Some(Commands::Status) => status::run(&mut std::io::stdout().lock(), &config)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
