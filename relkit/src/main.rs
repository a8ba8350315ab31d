mod commands;
mod formatting;
mod reporter;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relkit")]
#[command(about = "Release task runner: build, post-process, document and publish a library")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root holding package.json, builder.json and relkit.toml
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Task configuration to use instead of <root>/relkit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tasks or pipelines in order, stopping at the first failure
    Run {
        #[arg(required = true)]
        tasks: Vec<String>,
        #[arg(long, action)]
        dry_run: bool,
    },
    /// Print the steps a run would execute
    Plan {
        #[arg(required = true)]
        tasks: Vec<String>,
        #[arg(long, action)]
        json: bool,
    },
    /// List pipelines and task targets
    List {
        #[arg(long, action)]
        json: bool,
    },
    /// Load every input and resolve every pipeline
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // RUST_LOG wins over the flags when set.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { tasks, dry_run } => {
            commands::cmd_run(cli.root, cli.config, tasks, dry_run, cli.quiet)?
        }
        Commands::Plan { tasks, json } => commands::cmd_plan(cli.root, cli.config, tasks, json)?,
        Commands::List { json } => commands::cmd_list(cli.root, cli.config, json)?,
        Commands::Check => commands::cmd_check(cli.root, cli.config)?,
    }

    Ok(())
}
