use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "izzico")]
#[command(about = "IzzIco assistant CLI - directive parsing and widget state tools", long_about = None)]
struct Cli {
    /// Config file (defaults to <config_dir>/izzico/assistant.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the persisted widget state (defaults to <data_dir>/izzico/state)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract directives from an assistant reply and print them as JSON
    Parse {
        /// Reply text; read from stdin when omitted
        text: Option<String>,
    },
    /// Inspect or clear the persisted widget state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the restorable record, or null when absent or stale
    Show,
    /// Remove the persisted record
    Clear,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let resolve_paths =
        || commands::utils::CliPaths::resolve(cli.config.clone(), cli.state_dir.clone());

    match cli.command {
        Commands::Parse { text } => commands::parse::run(text)?,
        Commands::State { action } => match action {
            StateAction::Show => commands::state::show(&resolve_paths()?)?,
            StateAction::Clear => commands::state::clear(&resolve_paths()?)?,
        },
        Commands::Config => commands::config::show(&resolve_paths()?)?,
    }

    Ok(())
}
