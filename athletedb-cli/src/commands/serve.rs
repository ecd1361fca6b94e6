//! `athletedb serve` - run the HTTP API

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use athletedb_core::{MeasurementTypeStore, SqliteStore};
use athletedb_server::{AppState, AthleteDbServer, ServerConfig};

#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, default_value = "athletedb.sqlite3")]
    pub db: PathBuf,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let store = SqliteStore::open(&args.db)?;

    // The registry must exist before the first form render
    store.reinitialize_defaults()?;

    let state = Arc::new(AppState::new(store));
    let server = AthleteDbServer::new(ServerConfig::new(args.host, args.port), state);
    server.run().await?;
    Ok(())
}
