// Entity Models
// Every record the registry stores is one of five kinds.
//
// Each entity has:
// - A required, non-empty id that never changes once created
// - Its own field-tagged JSON encoding (stable key names)
// - A kind, which selects the ledger namespace its key lives in

pub mod account;
pub mod commercial_paper;
pub mod customer;
pub mod regulator;
pub mod vendor;

pub use account::Account;
pub use commercial_paper::{CommercialPaper, Owner};
pub use customer::Customer;
pub use regulator::Regulator;
pub use vendor::Vendor;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Vendor,
    CommercialPaper,
    Account,
    Customer,
    Regulator,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Vendor,
        EntityKind::CommercialPaper,
        EntityKind::Account,
        EntityKind::Customer,
        EntityKind::Regulator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Vendor => "Vendor",
            EntityKind::CommercialPaper => "CommercialPaper",
            EntityKind::Account => "Account",
            EntityKind::Customer => "Customer",
            EntityKind::Regulator => "Regulator",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts the kind name in any case, plus the short forms `cp`, `acct`,
    /// `cust` and `reg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vendor" => Ok(EntityKind::Vendor),
            "commercialpaper" | "cp" => Ok(EntityKind::CommercialPaper),
            "account" | "acct" => Ok(EntityKind::Account),
            "customer" | "cust" => Ok(EntityKind::Customer),
            "regulator" | "reg" => Ok(EntityKind::Regulator),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A struct stored under exactly one entity kind
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KIND: EntityKind;

    /// Bare id (ledger key without namespace prefix)
    fn id(&self) -> &str;

    fn into_entity(self) -> Entity;
}

/// Decode bytes as a well-formed record: every field present and a non-empty id
pub fn decode_record<R: Record>(bytes: &[u8]) -> Result<R, String> {
    let record: R = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if record.id().is_empty() {
        return Err(format!("{} record has an empty id", R::KIND));
    }
    Ok(record)
}

// ============================================================================
// ENTITY
// ============================================================================

/// Any record stored in the registry
///
/// Serializes as the inner record alone; the kind is implied by the
/// namespace of the key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Vendor(Vendor),
    CommercialPaper(CommercialPaper),
    Account(Account),
    Customer(Customer),
    Regulator(Regulator),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Vendor(_) => EntityKind::Vendor,
            Entity::CommercialPaper(_) => EntityKind::CommercialPaper,
            Entity::Account(_) => EntityKind::Account,
            Entity::Customer(_) => EntityKind::Customer,
            Entity::Regulator(_) => EntityKind::Regulator,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Vendor(v) => v.id(),
            Entity::CommercialPaper(cp) => cp.id(),
            Entity::Account(a) => a.id(),
            Entity::Customer(c) => c.id(),
            Entity::Regulator(r) => r.id(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode ledger bytes as the given kind
    pub fn decode(kind: EntityKind, bytes: &[u8]) -> Result<Entity, String> {
        match kind {
            EntityKind::Vendor => decode_record::<Vendor>(bytes).map(Entity::Vendor),
            EntityKind::CommercialPaper => {
                decode_record::<CommercialPaper>(bytes).map(Entity::CommercialPaper)
            }
            EntityKind::Account => decode_record::<Account>(bytes).map(Entity::Account),
            EntityKind::Customer => decode_record::<Customer>(bytes).map(Entity::Customer),
            EntityKind::Regulator => decode_record::<Regulator>(bytes).map(Entity::Regulator),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
