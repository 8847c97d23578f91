// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Crypto Ecosystems CLI - taxonomy of open source ecosystems

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use crypto_ecosystems::commands;
use crypto_ecosystems::config;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ce")]
#[command(author, version, about = "Crypto Ecosystems Taxonomy Tool", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CE_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate all of the migrations
    Validate {
        /// The directory containing the migration files
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Export the taxonomy to a JSON Lines file
    Export {
        /// The directory containing the migration files
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// The name of an ecosystem if you only want to export one
        #[arg(short, long)]
        ecosystem: Option<String>,

        /// Only run migrations named before this date (e.g. 2015 or 2015-08-01)
        #[arg(short, long)]
        max_date: Option<String>,

        /// The output file
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Completions need no config
    let config = match cli.command {
        Commands::Completions { .. } => config::Config::default(),
        _ => config::load(cli.config.as_deref())?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let color = !cli.no_color && std::io::stdout().is_terminal();

    // Execute command
    match cli.command {
        Commands::Validate { root } => {
            let root = root.unwrap_or(config.migrations_dir);
            commands::validate::run(&root, cli.json, color)
        }
        Commands::Export { root, ecosystem, max_date, output } => {
            let root = root.unwrap_or(config.migrations_dir);
            commands::export::run(&commands::export::ExportArgs {
                root: &root,
                ecosystem: ecosystem.as_deref(),
                max_date: max_date.as_deref(),
                output: &output,
            })
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
