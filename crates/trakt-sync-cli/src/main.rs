use clap::{ArgAction, Parser, Subcommand};
use commands::sync;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "Trakt Sync CLI")]
#[command(about = "Synchronize your watch history from Simkl to Trakt.")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync watch history from Simkl to Trakt
    #[command(long_about = "Fetch your full Simkl watch history (shows, movies and anime) and add it to your Trakt history. All credentials are asked for interactively and are never stored. Optionally removes your existing Trakt history first.")]
    Sync,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging with verbose level
    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    // Create output handler
    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync => sync::run_sync(&output).await,
    }
}
