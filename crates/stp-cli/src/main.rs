use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stp_cli::commands::{analytics, clock, plan, progress, serve, session, util, validate};
use stp_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init so a subscriber installed elsewhere (tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout();
    match &cli.command {
        Some(Commands::Plan(args)) => {
            let config = load_config(cli.config.as_deref())?;
            plan::run(&mut stdout, args, &config, util::today())?;
        }
        Some(Commands::Analytics(args)) => {
            let config = load_config(cli.config.as_deref())?;
            analytics::run(&mut stdout, args, &config, util::today())?;
        }
        Some(Commands::Progress(args)) => {
            let config = load_config(cli.config.as_deref())?;
            progress::run(&mut stdout, args, &config, util::today())?;
        }
        Some(Commands::Validate(args)) => {
            // Validation only needs today's date
            validate::run(&mut stdout, args, util::today())?;
        }
        Some(Commands::Clock(args)) => {
            let config = load_config(cli.config.as_deref())?;
            clock::run(args, &config)?;
        }
        Some(Commands::Serve(args)) => {
            let config = load_config(cli.config.as_deref())?;
            serve::run(args, &config)?;
        }
        Some(Commands::Session) => {
            session::run(util::today())?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
