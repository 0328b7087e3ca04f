use anyhow::Result;
use clap::{Parser, Subcommand};

/// chefdeck - recipes, meal calendar and grocery lists
#[derive(Parser)]
#[command(name = "chefdeck")]
#[command(about = "Recipe manager with a meal calendar and grocery lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = chefdeck::config::Config::load(cli.config)?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    chefdeck::observability::init_observability(
        "chefdeck",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
        config.logging.format,
    )?;

    match cli.command {
        Commands::Serve { host, port } => chefdeck::cli::serve(config, host, port).await,
        Commands::Migrate => chefdeck::cli::migrate(&config).await,
        Commands::Reset => chefdeck::cli::reset(&config).await,
    }
}
