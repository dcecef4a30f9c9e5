// 👤 Customer Entity - a loyalty points holder identified by mobile number

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, Record};

/// Wire format: `{"id", "customermobile", "points"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,

    #[serde(rename = "customermobile")]
    pub mobile: String,

    pub points: i64,
}

impl Customer {
    pub fn new(id: impl Into<String>, mobile: impl Into<String>, points: i64) -> Self {
        Customer {
            id: id.into(),
            mobile: mobile.into(),
            points,
        }
    }
}

impl Record for Customer {
    const KIND: EntityKind = EntityKind::Customer;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_entity(self) -> Entity {
        Entity::Customer(self)
    }
}
