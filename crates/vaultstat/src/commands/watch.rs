use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};
use vaultstat_engine::DrainLoop;
use vaultstat_fs::FsVault;

use crate::cli::{GlobalArgs, WatchArgs};
use crate::{config, format, watcher};

pub(crate) async fn handle(args: WatchArgs, global: &GlobalArgs) -> Result<()> {
    let vault = Arc::new(FsVault::open(&args.root)?);
    let settings = config::resolve(vault.root(), global, None, args.interval_ms)?;
    let engine = Arc::new(super::engine_for(&vault, &settings));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut fs_watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = tx.send(res);
    })
    .context("starting file watcher")?;
    fs_watcher
        .watch(vault.root(), RecursiveMode::Recursive)
        .with_context(|| format!("watching {}", vault.root().display()))?;

    engine.enumerate().await.context("listing vault")?;
    engine.drain().await;
    let mut view = engine.subscribe();
    println!("{}", format::status_line(&view.borrow_and_update()));

    let drain_loop = DrainLoop::spawn(Arc::clone(&engine), settings.drain_interval());
    info!(
        root = %vault.root().display(),
        interval_ms = settings.drain_interval_ms,
        "watching vault"
    );

    let shutdown = shutdown_signal(args.exit_after_ms);
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(res) = rx.recv() => match res {
                Ok(event) => {
                    for change in watcher::change_events(&vault, &event) {
                        engine.notify(&change);
                    }
                }
                Err(err) => warn!(error = %err, "file watcher error"),
            },
            Ok(()) = view.changed() => {
                let total = *view.borrow_and_update();
                println!("{}", format::status_line(&total));
            }
        }
    }

    drain_loop.stop().await;
    engine.reset();
    info!("stopped watching");
    Ok(())
}

async fn shutdown_signal(exit_after_ms: Option<u64>) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let deadline = async {
        match exit_after_ms {
            Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        _ = ctrl_c => {}
        _ = deadline => {}
    }
}
