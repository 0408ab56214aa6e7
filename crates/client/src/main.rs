//! Overworld headless client binary.
//!
//! Composition root for a scripted run:
//! 1. Content (config, maps, animations, script) via `ContentFactory`
//! 2. Runtime via `RuntimeBuilder`, with the script as the player's reader
//! 3. A bus consumer standing in for the renderer
//!
//! # Examples
//!
//! ```bash
//! # Replay data/scripts/stroll.ron on data/maps/town.ron
//! cargo run -p overworld-client
//!
//! # Different script and spawn, verbose movement logs
//! RUST_LOG=overworld=debug cargo run -p overworld-client -- --script ledge --spawn 4,2
//! ```
mod cli;
mod session;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    let summary = session::run(&cli).await?;
    println!("{summary}");
    Ok(())
}
