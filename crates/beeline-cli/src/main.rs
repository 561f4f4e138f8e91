use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "beeline-cli", version, about = "Beeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session clock driver
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Reward computations
    Reward {
        #[command(subcommand)]
        action: commands::reward::RewardAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action).await,
        Commands::Reward { action } => commands::reward::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
