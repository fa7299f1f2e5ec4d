use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use gavel_cli::commands;
use gavel_cli::commands::scrape::ScrapeArgs;

#[derive(Parser)]
#[command(name = "gavel")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Scrape county court hearing schedules into CSV datasets",
    long_about = "Gavel logs into a county court web portal, searches hearings by \
                  courtroom and date, and scrapes case, party, and charge data from \
                  the paginated results into two CSV files."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log into the portal, run every configured search, and export CSV
    Scrape(ScrapeArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Scrape(args) => commands::scrape::execute(args),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("gavel=debug,gavel_core=debug,gavel_browser=debug,gavel_portal=debug")
    } else {
        EnvFilter::new("gavel=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
