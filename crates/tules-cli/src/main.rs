use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "tules", version, about = "tules background companion")]
struct Cli {
    /// Use this directory instead of ~/.config/tules
    #[arg(long, global = true, env = "TULES_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the companion process (JSON lines on stdin/stdout)
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show today's dictionary API call count
    Counter,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    // stdout carries the message channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(data_dir, args),
        Commands::Config { action } => commands::config::run(data_dir, action),
        Commands::Counter => commands::counter::run(data_dir),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tules", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
