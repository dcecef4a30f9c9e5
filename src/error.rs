use thiserror::Error;

use crate::entities::EntityKind;

/// Identifier derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CusipError {
    #[error("invalid issue timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("no {table} suffix code for key {key}")]
    SuffixLookupOutOfRange { table: &'static str, key: u32 },
}

/// Registry errors. Every variant names the record it concerns.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{kind} id must not be empty")]
    InvalidId { kind: EntityKind },

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("error decoding {kind} '{id}': {reason}")]
    DecodeFailure {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    #[error("error encoding {kind} '{id}': {reason}")]
    Encode {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    #[error("ledger failure at '{key}': {reason}")]
    Persistence { key: String, reason: String },
}

impl RegistryError {
    /// Id of the record the error concerns, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::InvalidId { .. } => None,
            Self::AlreadyExists { id, .. }
            | Self::NotFound { id, .. }
            | Self::DecodeFailure { id, .. }
            | Self::Encode { id, .. } => Some(id),
            Self::Persistence { key, .. } => Some(key),
        }
    }
}
