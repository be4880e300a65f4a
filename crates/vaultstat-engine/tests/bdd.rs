//! BDD-style scenario tests for incremental aggregation.

use std::sync::Arc;

use vaultstat_engine::{DrainReport, Engine, EngineConfig};
use vaultstat_exclude::ExcludeSet;
use vaultstat_io_port::MemoryVault;
use vaultstat_types::{AggregateRecord, ChangeEvent, DeletionPolicy, MetricsRecord};

fn sample_vault() -> Arc<MemoryVault> {
    let vault = Arc::new(MemoryVault::new());
    vault.insert_note("A.md", "Hello world.");
    vault.insert_attachment("B.png", 100);
    vault.insert_note("C.md", "One two three four.");
    vault
}

fn engine(vault: &Arc<MemoryVault>, exclude: &str, deletion: DeletionPolicy) -> Engine {
    Engine::new(
        vault.clone(),
        EngineConfig {
            exclude: ExcludeSet::parse(exclude),
            deletion,
        },
    )
}

fn modified(key: &str) -> ChangeEvent {
    ChangeEvent::Modified { key: key.into() }
}

mod initial_scan {
    use super::*;

    #[tokio::test]
    async fn given_mixed_vault_when_enumerated_and_drained_then_totals_cover_every_file() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        let queued = engine.enumerate().await.expect("enumerate");
        let report = engine.drain().await;

        assert_eq!(queued, 3);
        assert_eq!(report.processed, 3);
        assert_eq!(report.applied, 3);
        let total = engine.snapshot();
        assert_eq!(total.files, 3);
        assert_eq!(total.documents, 2);
        assert_eq!(total.attachments, 1);
        assert_eq!(total.word_count, 6);
        assert_eq!(total.size_bytes, 12 + 100 + 19);
        assert_eq!(total.quality, 0.0);
    }

    #[tokio::test]
    async fn given_drain_then_subscribers_see_published_total() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        let view = engine.subscribe();

        engine.enumerate().await.expect("enumerate");
        assert_eq!(*view.borrow(), AggregateRecord::default());

        engine.drain().await;
        assert_eq!(view.borrow().files, 3);
    }

    #[tokio::test]
    async fn given_enumerate_twice_before_drain_then_keys_queued_once() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        assert_eq!(engine.enumerate().await.expect("enumerate"), 3);
        assert_eq!(engine.enumerate().await.expect("enumerate"), 0);
        assert_eq!(engine.pending(), 3);
    }

    #[tokio::test]
    async fn given_empty_vault_then_totals_are_zero() {
        let vault = Arc::new(MemoryVault::new());
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        engine.enumerate().await.expect("enumerate");
        let report = engine.drain().await;

        assert_eq!(report, DrainReport::default());
        assert_eq!(engine.snapshot(), AggregateRecord::default());
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn given_modified_note_then_only_its_contribution_changes() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        vault.insert_note("A.md", "Hello brave new world.");
        engine.notify(&modified("A.md"));
        engine.drain().await;

        let total = engine.snapshot();
        assert_eq!(total.files, 3);
        assert_eq!(total.word_count, 8);
        assert_eq!(total.size_bytes, 22 + 100 + 19);
    }

    #[tokio::test]
    async fn given_repeated_events_for_one_key_then_processed_once() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        engine.notify(&modified("A.md"));
        engine.notify(&modified("A.md"));
        engine.notify(&ChangeEvent::Resolved { key: "A.md".into() });
        let report = engine.drain().await;

        assert_eq!(report.processed, 1);
        assert_eq!(engine.snapshot().files, 1);
    }

    #[tokio::test]
    async fn given_unchanged_key_drained_twice_then_totals_are_stable() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;
        let first = engine.snapshot();

        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        assert_eq!(engine.snapshot(), first);
    }

    #[tokio::test]
    async fn given_note_retyped_as_attachment_then_kind_counts_move() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        vault.rename("C.md", "C.bin");
        engine.notify(&ChangeEvent::Renamed {
            from: "C.md".into(),
            to: "C.bin".into(),
        });
        engine.drain().await;

        let total = engine.snapshot();
        assert_eq!(total.files, 3);
        assert_eq!(total.documents, 1);
        assert_eq!(total.attachments, 2);
        assert_eq!(total.word_count, 2);
        assert!(engine.record("C.md").is_none());
        assert!(engine.record("C.bin").is_some());
    }

    #[tokio::test]
    async fn given_direct_apply_then_snapshot_reflects_it() {
        let vault = Arc::new(MemoryVault::new());
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        engine.apply("x.md", MetricsRecord::document(10, 4, 3, 1));
        engine.apply("y.md", MetricsRecord::document(10, 2, 3, 0));

        let total = engine.snapshot();
        assert_eq!(total.documents, 2);
        assert_eq!(total.link_count, 6);
        assert_eq!(total.quality, 3.0);
    }
}

mod exclusion {
    use super::*;

    #[tokio::test]
    async fn given_excluded_directory_then_its_files_are_skipped_and_siblings_processed() {
        let vault = Arc::new(MemoryVault::new());
        vault.insert_note("archive/old.md", "stale words here");
        vault.insert_note("notes/new.md", "fresh");
        let engine = engine(&vault, "archive", DeletionPolicy::Retract);

        engine.enumerate().await.expect("enumerate");
        let report = engine.drain().await;

        assert_eq!(report.processed, 2);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.applied, 1);
        assert!(engine.record("archive/old.md").is_none());
        assert_eq!(engine.snapshot().word_count, 1);
        assert_eq!(engine.pending(), 0);
    }

    #[tokio::test]
    async fn given_nested_excluded_segment_then_key_is_skipped() {
        let vault = Arc::new(MemoryVault::new());
        vault.insert_note("projects/.trash/gone.md", "a b c");
        let engine = engine(&vault, "templates, .trash", DeletionPolicy::Retract);

        engine.notify(&ChangeEvent::Created {
            key: "projects/.trash/gone.md".into(),
        });
        let report = engine.drain().await;

        assert_eq!(report.excluded, 1);
        assert_eq!(engine.snapshot(), AggregateRecord::default());
    }

    #[tokio::test]
    async fn given_partial_segment_match_then_key_is_processed() {
        let vault = Arc::new(MemoryVault::new());
        vault.insert_note("archived/keep.md", "kept");
        let engine = engine(&vault, "archive", DeletionPolicy::Retract);

        engine.enqueue("archived/keep.md");
        engine.drain().await;

        assert!(engine.record("archived/keep.md").is_some());
    }
}

mod deletion {
    use super::*;

    async fn drained(deletion: DeletionPolicy) -> (Arc<MemoryVault>, Engine) {
        let vault = sample_vault();
        let engine = engine(&vault, "", deletion);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;
        (vault, engine)
    }

    #[tokio::test]
    async fn given_retract_policy_when_file_deleted_then_contribution_is_removed() {
        let (vault, engine) = drained(DeletionPolicy::Retract).await;

        vault.remove("C.md");
        engine.notify(&ChangeEvent::Deleted { key: "C.md".into() });
        let report = engine.drain().await;

        assert_eq!(report.retracted, 1);
        let total = engine.snapshot();
        assert_eq!(total.files, 2);
        assert_eq!(total.documents, 1);
        assert_eq!(total.word_count, 2);
        assert!(engine.record("C.md").is_none());
    }

    #[tokio::test]
    async fn given_retain_policy_when_file_deleted_then_stale_record_stays() {
        let (vault, engine) = drained(DeletionPolicy::Retain).await;

        vault.remove("C.md");
        engine.notify(&ChangeEvent::Deleted { key: "C.md".into() });
        let report = engine.drain().await;

        assert_eq!(report.missing, 1);
        assert_eq!(engine.snapshot().files, 3);
        assert_eq!(engine.snapshot().word_count, 6);
        assert!(engine.record("C.md").is_some());
    }

    #[tokio::test]
    async fn given_retract_policy_when_structure_disappears_then_record_is_removed() {
        let (vault, engine) = drained(DeletionPolicy::Retract).await;

        vault.insert_document("A.md", "Hello world.", None);
        engine.notify(&modified("A.md"));
        engine.drain().await;

        assert!(engine.record("A.md").is_none());
        assert_eq!(engine.snapshot().documents, 1);
    }

    #[tokio::test]
    async fn given_unknown_key_deleted_then_reported_missing() {
        let (_vault, engine) = drained(DeletionPolicy::Retract).await;
        let before = engine.snapshot();

        engine.notify(&ChangeEvent::Deleted {
            key: "never-seen.md".into(),
        });
        let report = engine.drain().await;

        assert_eq!(report.missing, 1);
        assert_eq!(engine.snapshot(), before);
    }
}

mod directories {
    use super::*;

    async fn drained_with_folder() -> (Arc<MemoryVault>, Engine) {
        let vault = Arc::new(MemoryVault::new());
        vault.insert_note("notes/a.md", "one two three");
        vault.insert_note("notes/deep/b.md", "four");
        vault.insert_note("top.md", "five");
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;
        (vault, engine)
    }

    #[tokio::test]
    async fn given_folder_renamed_then_children_move_with_it() {
        let (vault, engine) = drained_with_folder().await;
        let before = engine.snapshot();

        vault.rename_dir("notes", "moved");
        engine.notify(&ChangeEvent::Renamed {
            from: "notes".into(),
            to: "moved".into(),
        });
        let report = engine.drain().await;

        assert_eq!(report.retracted, 2);
        assert_eq!(report.applied, 2);
        assert_eq!(
            engine.recorded_keys(),
            vec!["moved/a.md", "moved/deep/b.md", "top.md"]
        );
        assert_eq!(engine.snapshot(), before);
    }

    #[tokio::test]
    async fn given_folder_deleted_then_every_child_is_retracted() {
        let (vault, engine) = drained_with_folder().await;

        vault.remove("notes/a.md");
        vault.remove("notes/deep/b.md");
        engine.notify(&ChangeEvent::Deleted {
            key: "notes".into(),
        });
        engine.drain().await;

        assert_eq!(engine.recorded_keys(), vec!["top.md"]);
        assert_eq!(engine.snapshot().word_count, 1);
    }

    #[tokio::test]
    async fn given_folder_moved_in_then_its_files_are_recorded() {
        let (vault, engine) = drained_with_folder().await;

        vault.insert_note("inbox/new.md", "six seven");
        engine.notify(&ChangeEvent::Created {
            key: "inbox".into(),
        });
        engine.drain().await;

        assert!(engine.record("inbox/new.md").is_some());
        assert_eq!(engine.snapshot().word_count, 7);
    }

    #[tokio::test]
    async fn given_key_sharing_a_name_prefix_then_it_is_not_expanded() {
        let (vault, engine) = drained_with_folder().await;
        vault.insert_note("notes2/c.md", "eight");

        engine.notify(&ChangeEvent::Deleted {
            key: "notes".into(),
        });
        let report = engine.drain().await;

        // notes/* still exist, so they are re-applied; notes2 is untouched.
        assert_eq!(report.applied, 2);
        assert!(engine.record("notes2/c.md").is_none());
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn given_resolve_failure_then_drain_continues_and_stored_record_survives() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        vault.insert_note("A.md", "changed content now");
        vault.fail_resolve("A.md");
        engine.notify(&modified("A.md"));
        engine.notify(&modified("C.md"));
        let report = engine.drain().await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(engine.pending(), 0);
        assert_eq!(engine.record("A.md").map(|r| r.word_count), Some(2));
    }

    #[tokio::test]
    async fn given_unreadable_note_then_counted_with_zero_words() {
        let vault = sample_vault();
        vault.fail_read("C.md");
        let engine = engine(&vault, "", DeletionPolicy::Retract);

        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        let total = engine.snapshot();
        assert_eq!(total.documents, 2);
        assert_eq!(total.word_count, 2);
    }

    #[tokio::test]
    async fn given_failed_key_then_it_can_be_requeued() {
        let vault = sample_vault();
        vault.fail_resolve("A.md");
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enqueue("A.md");
        engine.drain().await;

        vault.insert_note("A.md", "Hello world.");
        assert!(engine.enqueue("A.md"));
        engine.drain().await;

        assert_eq!(engine.record("A.md").map(|r| r.word_count), Some(2));
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn given_reset_then_engine_starts_from_zero() {
        let vault = sample_vault();
        let engine = engine(&vault, "", DeletionPolicy::Retract);
        engine.enumerate().await.expect("enumerate");
        engine.drain().await;

        engine.reset();
        assert_eq!(engine.snapshot(), AggregateRecord::default());

        engine.enumerate().await.expect("enumerate");
        engine.drain().await;
        assert_eq!(engine.snapshot().files, 3);
    }

    #[tokio::test]
    async fn given_concurrent_drains_then_each_key_applied_once() {
        let vault = sample_vault();
        let engine = Arc::new(engine(&vault, "", DeletionPolicy::Retract));
        engine.enumerate().await.expect("enumerate");

        let a = tokio::spawn({
            let engine = Arc::clone(&engine);
            async move { engine.drain().await }
        });
        let b = tokio::spawn({
            let engine = Arc::clone(&engine);
            async move { engine.drain().await }
        });
        let (a, b) = (a.await.expect("join"), b.await.expect("join"));

        assert_eq!(a.processed + b.processed, 3);
        assert_eq!(engine.snapshot().files, 3);
    }
}
