// 📄 Commercial Paper Entity - a short-term discounted instrument
//
// Identity is the CUSIP: the issuer's base identifier plus a two-character
// suffix encoding the maturity date. The CUSIP is stamped once at issue and
// never recomputed.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, Record};
use crate::cusip;
use crate::error::CusipError;

// ============================================================================
// OWNER
// ============================================================================

/// A holder of some quantity of an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub company: String,
    pub quantity: i64,
}

// ============================================================================
// COMMERCIAL PAPER ENTITY
// ============================================================================

/// Commercial Paper Entity
///
/// Wire format: `{"cusip", "ticker", "par", "qty", "discount", "maturity",
/// "owner", "issuer", "issueDate"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialPaper {
    /// Stable identity; empty until stamped
    pub cusip: String,

    pub ticker: String,

    /// Face value per unit
    pub par: f64,

    #[serde(rename = "qty")]
    pub quantity: i64,

    /// Discount rate applied at issue
    pub discount: f64,

    /// Holding period in days
    pub maturity: i64,

    #[serde(rename = "owner")]
    pub owners: Vec<Owner>,

    /// Id of the issuing Account
    pub issuer: String,

    /// Issue timestamp, Unix epoch milliseconds as a string
    #[serde(rename = "issueDate")]
    pub issue_date: String,
}

impl CommercialPaper {
    /// Derive the maturity suffix and set `cusip = base + suffix`
    ///
    /// Returns the stamped CUSIP. Fails without touching `cusip` when the
    /// issue date is not a valid epoch-millis timestamp.
    pub fn stamp_cusip(&mut self, base: &str) -> Result<&str, CusipError> {
        let suffix = cusip::derive_suffix(&self.issue_date, self.maturity)?;
        self.cusip = format!("{}{}", base, suffix);
        Ok(&self.cusip)
    }

    /// Give the whole issue to the issuer when no owners were supplied
    pub fn default_owner_to_issuer(&mut self) {
        if self.owners.is_empty() {
            self.owners.push(Owner {
                company: self.issuer.clone(),
                quantity: self.quantity,
            });
        }
    }
}

impl Record for CommercialPaper {
    const KIND: EntityKind = EntityKind::CommercialPaper;

    fn id(&self) -> &str {
        &self.cusip
    }

    fn into_entity(self) -> Entity {
        Entity::CommercialPaper(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_paper() -> CommercialPaper {
        CommercialPaper {
            cusip: String::new(),
            ticker: "ACME-CP".to_string(),
            par: 1000.0,
            quantity: 50,
            discount: 7.5,
            maturity: 366,
            owners: Vec::new(),
            issuer: "ACME".to_string(),
            // 2024-01-15T00:00:00Z
            issue_date: "1705276800000".to_string(),
        }
    }

    #[test]
    fn test_stamp_cusip() {
        let mut cp = create_test_paper();
        assert_eq!(cp.stamp_cusip("12345A").unwrap(), "12345AAF");
        assert_eq!(cp.id(), "12345AAF");
    }

    #[test]
    fn test_stamp_cusip_invalid_issue_date() {
        let mut cp = create_test_paper();
        cp.issue_date = "yesterday".to_string();

        assert!(matches!(
            cp.stamp_cusip("12345A"),
            Err(CusipError::InvalidTimestamp(_))
        ));
        assert!(cp.cusip.is_empty());
    }

    #[test]
    fn test_default_owner_to_issuer() {
        let mut cp = create_test_paper();
        cp.default_owner_to_issuer();

        assert_eq!(cp.owners, vec![Owner { company: "ACME".to_string(), quantity: 50 }]);

        // Existing owners are left alone
        cp.owners[0].quantity = 20;
        cp.default_owner_to_issuer();
        assert_eq!(cp.owners.len(), 1);
        assert_eq!(cp.owners[0].quantity, 20);
    }

    #[test]
    fn test_wire_names() {
        let mut cp = create_test_paper();
        cp.default_owner_to_issuer();
        let json = serde_json::to_value(&cp).unwrap();

        assert_eq!(json["qty"], 50);
        assert_eq!(json["issueDate"], "1705276800000");
        assert_eq!(json["owner"][0]["company"], "ACME");
        assert!(json.get("owners").is_none());
    }
}
