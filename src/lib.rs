// Commercial Paper Registry - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod cusip;      // Maturity-date suffix derivation
pub mod db;         // SQLite append-only ledger
pub mod dispatch;   // Named-function invocation surface
pub mod entities;
pub mod error;
pub mod ledger;
pub mod registry;   // Create-if-absent / read-by-key

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, LedgerConfig, NamespaceConfig};
pub use cusip::{derive_suffix, maturity_date};
pub use db::SqliteLedger;
pub use dispatch::{DispatchError, Dispatcher, IssueRequest};
pub use entities::{
    Account, CommercialPaper, Customer, Entity, EntityKind, Owner, Record, Regulator, Vendor,
};
pub use error::{CusipError, RegistryError};
pub use ledger::{Ledger, LedgerError, MemoryLedger};
pub use registry::{CreateOutcome, Registry};

use std::sync::Arc;

/// Open the configured ledger and wrap it in a registry
pub fn open_registry(config: &AppConfig) -> anyhow::Result<Registry> {
    let ledger: Arc<dyn Ledger> = match &config.ledger {
        LedgerConfig::Memory => Arc::new(MemoryLedger::new()),
        LedgerConfig::Sqlite { path } => Arc::new(SqliteLedger::open(path)?),
    };
    tracing::info!(ledger = config.ledger.label(), "ledger opened");

    Ok(Registry::new(ledger, config.namespaces.clone())?)
}
