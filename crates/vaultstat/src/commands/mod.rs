pub(crate) mod scan;
pub(crate) mod watch;

use std::sync::Arc;

use anyhow::Result;
use vaultstat_engine::{Engine, EngineConfig};
use vaultstat_fs::FsVault;
use vaultstat_settings::Settings;

use crate::cli::{Cli, Commands};

pub(crate) async fn dispatch(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Scan(args) => scan::handle(args, global).await,
        Commands::Watch(args) => watch::handle(args, global).await,
    }
}

fn engine_for(vault: &Arc<FsVault>, settings: &Settings) -> Engine {
    Engine::new(
        vault.clone(),
        EngineConfig {
            exclude: settings.exclude_set(),
            deletion: settings.deletion,
        },
    )
}
