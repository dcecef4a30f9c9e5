// 🏪 Vendor Entity - a points-issuing merchant
//
// Stored under the vendor namespace. The id is supplied by the caller and is
// the only field the registry looks at; the rest is carried as-is.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, Record};

/// Vendor Entity
///
/// Wire format: `{"id", "vendorname", "vendortype", "vptquantity"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,

    #[serde(rename = "vendorname")]
    pub name: String,

    /// Free-form category, e.g. "retail", "airline"
    #[serde(rename = "vendortype")]
    pub vendor_type: String,

    /// Loyalty points the vendor holds
    #[serde(rename = "vptquantity")]
    pub points_quantity: i64,
}

impl Vendor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        vendor_type: impl Into<String>,
        points_quantity: i64,
    ) -> Self {
        Vendor {
            id: id.into(),
            name: name.into(),
            vendor_type: vendor_type.into(),
            points_quantity,
        }
    }
}

impl Record for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_entity(self) -> Entity {
        Entity::Vendor(self)
    }
}
