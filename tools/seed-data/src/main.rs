//! Seed a data directory with demo accounts and listings.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p seed-data -- --data-dir data
//! cargo run -p seed-data -- --data-dir data --force
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;

use campus_core::tracing::init_tracing;
use campus_market::config::MarketConfig;
use campus_market::domain::repository::CollectionStore;
use campus_market::infra::store::JsonFileStore;

mod dataset;

#[derive(Parser)]
#[command(about = "Write demo users and listings into a data directory")]
struct Args {
    /// Directory that will hold users.json and products.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Overwrite existing documents
    #[arg(long)]
    force: bool,
}

fn seed(data_dir: &Path, force: bool) -> Result<()> {
    let config = MarketConfig::at(data_dir);
    let users_path = config.users_file();
    let products_path = config.products_file();
    if !force {
        for path in [&users_path, &products_path] {
            if path.exists() {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
        }
    }

    let users = dataset::user_records()?;
    let products = dataset::product_records()?;
    JsonFileStore::new(&users_path).flush(&users)?;
    JsonFileStore::new(&products_path).flush(&products)?;
    info!(
        users = users.len(),
        products = products.len(),
        data_dir = %data_dir.display(),
        "seed data written"
    );
    Ok(())
}

fn main() -> Result<()> {
    init_tracing("info");
    let args = Args::parse();
    seed(&args.data_dir, args.force)
}
