//! Translation of filesystem notifications into vault change events.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};
use vaultstat_fs::FsVault;
use vaultstat_types::ChangeEvent;

/// Change events for one raw notification. Paths outside the vault, or that
/// are not UTF-8, are dropped.
pub(crate) fn change_events(vault: &FsVault, event: &notify::Event) -> Vec<ChangeEvent> {
    let key = |path: &PathBuf| vault.key_for(path);

    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            match (key(&event.paths[0]), key(&event.paths[1])) {
                (Some(from), Some(to)) => vec![ChangeEvent::Renamed { from, to }],
                (Some(from), None) => vec![ChangeEvent::Deleted { key: from }],
                (None, Some(to)) => vec![ChangeEvent::Created { key: to }],
                (None, None) => Vec::new(),
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) | EventKind::Remove(_) => event
            .paths
            .iter()
            .filter_map(key)
            .map(|key| ChangeEvent::Deleted { key })
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) | EventKind::Create(_) => event
            .paths
            .iter()
            .filter_map(key)
            .map(|key| ChangeEvent::Created { key })
            .collect(),
        EventKind::Modify(_) => event
            .paths
            .iter()
            .filter_map(key)
            .map(|key| ChangeEvent::Modified { key })
            .collect(),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}
