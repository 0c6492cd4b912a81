//! aur - query and download packages from the Arch User Repository

use anyhow::Result;
use aur_core::Method;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aur_cli::cmd::{self, Context};
use aur_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --debug surfaces per-request transport logs
    let mut filter = EnvFilter::from_default_env();
    if cli.debug {
        filter = filter.add_directive("aur::transport=info".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::new(&cli);

    match cli.command {
        Commands::Info { packages } => cmd::info::info(&ctx, Method::Info, &packages).await,
        Commands::Multiinfo { packages } => {
            cmd::info::info(&ctx, Method::MultiInfo, &packages).await
        }
        Commands::Msearch { maintainers } => {
            cmd::info::info(&ctx, Method::MSearch, &maintainers).await
        }
        Commands::Search { terms } => cmd::search::search(&ctx, &terms).await,
        Commands::Download { packages, dest } => {
            cmd::download::download(&ctx, &packages, dest).await
        }
    }
}
