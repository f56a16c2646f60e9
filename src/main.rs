//! Bookstore HTTP server.
//!
//! Reads its configuration from the environment (see [`bookstore::config`]),
//! opens the store once and serves the book endpoints until Ctrl-C.

use std::sync::Arc;

use bookstore::{books, router, store, Bookstore, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing from the configured filter directives.
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing(&config);

    let db = store::connect(&config.store_url)?;
    info!(store = %config.store_url, "store opened");

    let service = Arc::new(books::router(Bookstore::new(db)));
    info!(endpoints = ?service.endpoints(), "endpoints registered");

    router::serve(service, &config.addr).await?;
    Ok(())
}
