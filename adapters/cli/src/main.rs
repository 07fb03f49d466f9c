#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Path Defence headlessly.

mod autoplay;
mod settings;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_world::{ProgressStore, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    settings::{Cli, Settings},
    store::JsonFileStore,
};

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::resolve(Cli::parse())?;
    let mut store = JsonFileStore::new(settings.progress.clone());
    let progress = if settings.fresh { None } else { store.load() };
    info!(
        path = %store.path().display(),
        saved_level = progress.map(|progress| progress.level),
        seed = settings.seed,
        "starting session"
    );

    let mut world = World::new(settings.world.clone(), progress)
        .context("level configuration is invalid")?;
    let outcome = autoplay::run(&mut world, &settings, &mut store);

    println!("{outcome}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
