// ⚖️ Regulator Entity - the authority that mints a points currency

use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind, Record};

/// Wire format: `{"id", "curname", "points", "quantity"}`
///
/// `points` is a label (e.g. "LP"), not a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulator {
    pub id: String,

    #[serde(rename = "curname")]
    pub currency_name: String,

    pub points: String,

    pub quantity: i64,
}

impl Regulator {
    pub fn new(
        id: impl Into<String>,
        currency_name: impl Into<String>,
        points: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Regulator {
            id: id.into(),
            currency_name: currency_name.into(),
            points: points.into(),
            quantity,
        }
    }
}

impl Record for Regulator {
    const KIND: EntityKind = EntityKind::Regulator;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_entity(self) -> Entity {
        Entity::Regulator(self)
    }
}
