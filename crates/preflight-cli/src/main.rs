mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "preflight",
    about = "Pre-flight checks for the clinical trial MCP deployment (run with no arguments to verify imports)",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .preflight/ or .git/)
    #[arg(long, global = true, env = "PREFLIGHT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the MCP framework, analyzer and database capabilities resolve (default)
    Verify,

    /// Show whether MCP chat is available and what is missing
    Status,

    /// Print step-by-step MCP setup instructions
    Setup,

    /// Check the data directory layout and databases
    Paths {
        /// Create missing directories before checking
        #[arg(long)]
        create: bool,
    },

    /// Inspect, validate or create the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let command = cli.command.unwrap_or(Commands::Verify);

    let result = match command {
        Commands::Verify => cmd::verify::run(cli.json).map(|verdict| verdict.exit_code()),
        Commands::Status => cmd::status::run(&root, cli.json).map(|()| 0),
        Commands::Setup => cmd::setup::run(&root, cli.json).map(|()| 0),
        Commands::Paths { create } => cmd::paths::run(&root, create, cli.json).map(|()| 0),
        Commands::Config { subcommand } => {
            cmd::config::run(&root, subcommand, cli.json).map(|()| 0)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
