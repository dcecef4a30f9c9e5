// 📚 Registry - create-if-absent and read-by-key over the ledger
//
// Every ledger key is `prefix(kind) + id`, on both the write and the read
// path. One implementation serves all entity kinds.
//
// create() is a read-then-write with three outcomes:
//
//   slot absent            -> write            (Created)
//   slot holds bad bytes   -> write anyway     (OverwroteCorrupt)
//   slot holds a record    -> AlreadyExists, ledger untouched
//
// The read and the write are NOT atomic. Two concurrent creates for the same
// id can both see "absent" and both write; resolving that is up to the ledger.
// No locking, no retries.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, NamespaceConfig};
use crate::entities::{decode_record, Entity, EntityKind, Record};
use crate::error::RegistryError;
use crate::ledger::{Ledger, LedgerError};

// ============================================================================
// CREATE OUTCOME
// ============================================================================

/// What create() found in the slot before writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Nothing was stored at the key
    Created,

    /// The key held bytes that did not decode as the expected kind, and they
    /// were replaced. A half-written or malformed record never blocks
    /// re-creation.
    OverwroteCorrupt,
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct Registry {
    ledger: Arc<dyn Ledger>,
    namespaces: NamespaceConfig,
}

impl Registry {
    /// Build a registry over a ledger; the namespace mapping is validated
    /// here and fixed for the registry's lifetime.
    pub fn new(ledger: Arc<dyn Ledger>, namespaces: NamespaceConfig) -> Result<Self, ConfigError> {
        namespaces.validate()?;
        Ok(Registry { ledger, namespaces })
    }

    pub fn with_default_namespaces(ledger: Arc<dyn Ledger>) -> Self {
        Registry {
            ledger,
            namespaces: NamespaceConfig::default(),
        }
    }

    pub fn namespaces(&self) -> &NamespaceConfig {
        &self.namespaces
    }

    /// Ledger key for a record: `<prefix><id>`
    pub fn key_for(&self, kind: EntityKind, id: &str) -> String {
        format!("{}{}", self.namespaces.prefix(kind), id)
    }

    /// Bytes currently at `key`, or None when the ledger has nothing there
    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
        match self.ledger.get(key) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(LedgerError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(persistence(key, e)),
        }
    }

    // ========================================================================
    // CREATE
    // ========================================================================

    /// Store a new entity unless a well-formed record already holds its key
    pub fn create(&self, entity: &Entity) -> Result<CreateOutcome, RegistryError> {
        let kind = entity.kind();
        let id = entity.id();
        if id.is_empty() {
            return Err(RegistryError::InvalidId { kind });
        }

        let encode_error = |reason: String| RegistryError::Encode {
            kind,
            id: id.to_string(),
            reason,
        };
        let bytes = entity.to_bytes().map_err(|e| encode_error(e.to_string()))?;
        // Bytes that would not read back (NaN/inf serialize as null) are never
        // written: they would look corrupt and be overwritten by the next create.
        Entity::decode(kind, &bytes).map_err(encode_error)?;
        let key = self.key_for(kind, id);

        let outcome = match self.fetch(&key)? {
            None => {
                debug!(%kind, id, %key, "no existing record, initializing");
                CreateOutcome::Created
            }
            Some(existing) => match Entity::decode(kind, &existing) {
                Ok(current) => {
                    info!(%kind, id, %key, "record already exists, refusing to reinitialize");
                    return Err(RegistryError::AlreadyExists {
                        kind,
                        id: current.id().to_string(),
                    });
                }
                Err(reason) => {
                    // Permissive: bad bytes in the slot do not block creation.
                    warn!(
                        %kind,
                        id,
                        %key,
                        existing_bytes = existing.len(),
                        %reason,
                        "corrupt slot overwritten"
                    );
                    CreateOutcome::OverwroteCorrupt
                }
            },
        };

        self.ledger
            .put(&key, &bytes)
            .map_err(|e| persistence(&key, e))?;

        info!(%kind, id, %key, ?outcome, "record created");
        Ok(outcome)
    }

    /// Typed create
    pub fn create_record<R: Record>(&self, record: &R) -> Result<CreateOutcome, RegistryError> {
        self.create(&record.clone().into_entity())
    }

    // ========================================================================
    // READ
    // ========================================================================

    /// Raw bytes stored for a record, without decoding
    fn read_bytes(&self, kind: EntityKind, id: &str) -> Result<Vec<u8>, RegistryError> {
        let key = self.key_for(kind, id);
        self.fetch(&key)?.ok_or_else(|| {
            debug!(%kind, id, %key, "record not found");
            RegistryError::NotFound {
                kind,
                id: id.to_string(),
            }
        })
    }

    /// Read and decode a record of the given kind
    pub fn read(&self, kind: EntityKind, id: &str) -> Result<Entity, RegistryError> {
        let bytes = self.read_bytes(kind, id)?;
        Entity::decode(kind, &bytes).map_err(|reason| decode_failure(kind, id, reason))
    }

    /// Typed read
    pub fn read_record<R: Record>(&self, id: &str) -> Result<R, RegistryError> {
        let bytes = self.read_bytes(R::KIND, id)?;
        decode_record::<R>(&bytes).map_err(|reason| decode_failure(R::KIND, id, reason))
    }

    /// True only when a well-formed record holds the key
    pub fn exists(&self, kind: EntityKind, id: &str) -> Result<bool, RegistryError> {
        match self.read(kind, id) {
            Ok(_) => Ok(true),
            Err(RegistryError::NotFound { .. }) | Err(RegistryError::DecodeFailure { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn persistence(key: &str, err: LedgerError) -> RegistryError {
    let reason = match err {
        LedgerError::KeyNotFound(k) => format!("key not found: {}", k),
        LedgerError::Backend { reason, .. } => reason,
    };
    RegistryError::Persistence {
        key: key.to_string(),
        reason,
    }
}

fn decode_failure(kind: EntityKind, id: &str, reason: String) -> RegistryError {
    warn!(%kind, id, %reason, "error decoding record");
    RegistryError::DecodeFailure {
        kind,
        id: id.to_string(),
        reason,
    }
}

// ============================================================================
// TESTS
// ============================================================================
