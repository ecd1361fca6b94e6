//! `athletedb defaults` - reseed the built-in measurement types

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use athletedb_core::{MeasurementTypeStore, SqliteStore, TypeFilter};

#[derive(Args)]
pub struct DefaultsArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "athletedb.sqlite3")]
    pub db: PathBuf,
}

pub fn run(args: DefaultsArgs) -> Result<()> {
    let store = SqliteStore::open(&args.db)?;
    store.reinitialize_defaults()?;

    let total = store.list_types(&TypeFilter::default())?.len();
    tracing::info!("built-in measurement types upserted ({total} descriptors in registry)");
    Ok(())
}
