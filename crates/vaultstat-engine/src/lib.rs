//! # vaultstat-engine
//!
//! **Tier 3 (Orchestration)**
//!
//! Incremental aggregation over a changing vault.
//!
//! ## What belongs here
//! * The deduplicated backlog and the keyed store with its running total
//! * Drain passes and their scheduling
//! * Mapping change notifications to backlog entries
//!
//! ## What does NOT belong here
//! * Tokenization and per-file counting (use vaultstat-collect)
//! * Filesystem access (implement `vaultstat_io_port::Vault`)

mod backlog;
mod engine;
mod ledger;
mod schedule;

pub use backlog::Backlog;
pub use engine::{DrainReport, Engine, EngineConfig};
pub use ledger::Ledger;
pub use schedule::{DEFAULT_DRAIN_INTERVAL, DrainLoop};
