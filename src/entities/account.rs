// 💳 Account Entity - a company that issues and holds commercial paper
//
// The account's `prefix` is the base identifier for every instrument it
// issues: CUSIP = prefix + two-character maturity suffix.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, Record};

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// Account Entity
///
/// Wire format: `{"id", "prefix", "cashBalance", "assetIds"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identity - never changes
    pub id: String,

    /// CUSIP base (issuer code) for instruments this account issues
    pub prefix: String,

    #[serde(rename = "cashBalance")]
    pub cash_balance: f64,

    /// CUSIPs of instruments this account holds
    #[serde(rename = "assetIds")]
    pub asset_ids: Vec<String>,
}

impl Account {
    /// Create a new account with no assets
    pub fn new(id: impl Into<String>, prefix: impl Into<String>, cash_balance: f64) -> Self {
        Account {
            id: id.into(),
            prefix: prefix.into(),
            cash_balance,
            asset_ids: Vec::new(),
        }
    }
}

impl Record for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_entity(self) -> Entity {
        Entity::Account(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
