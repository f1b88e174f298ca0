use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartcollege::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartcollege=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Login { username, password } => cli::commands::login(username, password).await,
        Commands::Logout => cli::commands::logout().await,
        Commands::Whoami { format, remote } => cli::commands::whoami(format, remote).await,
        Commands::Refresh => cli::commands::refresh().await,
        Commands::Routes => cli::commands::routes().await,
        Commands::Open { path } => cli::commands::open(&path).await,
        Commands::Request { method, path, body } => {
            cli::commands::request(&method, &path, body).await
        }
        Commands::Serve { host, port } => cli::commands::serve(host, port).await,
    }
}
