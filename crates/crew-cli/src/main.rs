//! crew: run a crew of agents over configured tasks

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "crew")]
#[command(about = "Run config-defined agents over tasks in declaration order", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to the nearest crew.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every task once, in file order
    Run(RunArgs),

    /// List configured agents
    Agents,

    /// List configured tasks
    Tasks,

    /// List built-in tools in invocation order
    Tools,

    /// Write a default crew.toml in the current directory
    Init,
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Agents document (overrides settings)
    #[arg(long)]
    pub agents: Option<PathBuf>,

    /// Tasks document (overrides settings)
    #[arg(long)]
    pub tasks: Option<PathBuf>,

    /// Keep passing over the task list until nothing new runs
    #[arg(long)]
    pub until_stable: bool,

    /// Print the run report as JSON (task trace goes to stderr)
    #[arg(long)]
    pub json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Some(Commands::Run(args)) => commands::run(config, &args),
        Some(Commands::Agents) => commands::agents(config, &RunArgs::default()),
        Some(Commands::Tasks) => commands::tasks(config, &RunArgs::default()),
        Some(Commands::Tools) => commands::tools(),
        Some(Commands::Init) => commands::init(),
        // Default to a plain run when no command specified
        None => commands::run(config, &RunArgs::default()),
    }
}
