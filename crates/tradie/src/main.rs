// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tradie - SMS-driven dispatch for independent trade contractors.
//!
//! This is the binary entry point for the Tradie service.

use clap::{Parser, Subcommand};

mod doctor;
mod local;
mod serve;
mod shell;
mod stack;

/// Tradie - SMS-driven dispatch for independent trade contractors.
#[derive(Parser, Debug)]
#[command(name = "tradie", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler and the line-based `from|body` stdin transport.
    Serve,
    /// Launch an interactive session texting as one phone number.
    Shell {
        /// Phone number the simulated texts come from.
        #[arg(long, default_value = "+15550100000")]
        phone: String,
    },
    /// Run diagnostic checks against the local environment.
    Doctor {
        /// Run additional intensive checks.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match tradie_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tradie_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Shell { phone }) => shell::run_shell(config, &phone).await,
        Some(Commands::Doctor { deep, plain }) => doctor::run_doctor(&config, deep, plain).await,
        None => {
            println!("tradie: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tradie={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = tradie_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.service.name, "Tradie");
    }
}
