//! sitefind CLI entry point.
//!
//! # Examples
//!
//! ```bash
//! # Index a site's document root
//! sitefind index /srv/www
//!
//! # Search, JSON output
//! sitefind search "getting started" --json
//!
//! # Search, rendered through the configured template
//! sitefind search "O'Brien"
//! ```

use clap::Parser;
use sitefind::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitefind=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
