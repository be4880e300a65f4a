use std::sync::Arc;

use anyhow::{Context, Result};
use vaultstat_fs::FsVault;

use crate::cli::{GlobalArgs, ScanArgs};
use crate::{config, format};

pub(crate) async fn handle(args: ScanArgs, global: &GlobalArgs) -> Result<()> {
    let vault = Arc::new(FsVault::open(&args.root)?);
    let settings = config::resolve(vault.root(), global, args.format, None)?;
    let engine = super::engine_for(&vault, &settings);

    engine.enumerate().await.context("listing vault")?;
    let pass = engine.drain().await;

    let root = args.root.display().to_string();
    print!(
        "{}",
        format::render(settings.format, &root, &engine.snapshot(), &pass)?
    );
    Ok(())
}
