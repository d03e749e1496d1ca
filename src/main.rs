mod cli;
mod config;
mod core;
mod logging;
mod repl;
mod tui;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::core::error::AppError;
use crate::core::form::FormController;

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let (config, warnings) = Config::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Form);

    logging::init_logging(&config.logging, !matches!(command, Commands::Form))?;
    for warning in warnings {
        tracing::warn!("{warning}");
    }

    let options = config.form.to_options();
    match command {
        Commands::Form => tui::run(FormController::new(options)),
        Commands::Repl => repl::run(FormController::new(options)),
        Commands::Generate(args) => {
            let text = cli::run_generate(&args, options)?;
            println!("{text}");
            Ok(())
        }
    }
}
