//! The one illustrative entity this service exists to exercise: a widget
//! with a name, a SKU, and a price. Nothing about it is meant to be a real
//! business domain -- it exists only to drive the CRUD pipeline, the
//! repository port, and the use-case/audit/UoW machinery end to end.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier. Wrapping `Uuid` in a newtype keeps call sites from
/// accidentally passing a raw `Uuid` meant for a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(pub Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WidgetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to create a widget. Validated by the `create_widget` use case, not
/// here -- this type only carries data, it has no behavior of its own.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWidget {
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
}

/// Input to update a widget. Every field is optional so a caller can patch
/// just the fields they want changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWidget {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_id_round_trips_through_display_and_parse() {
        let id = WidgetId::new();
        let parsed: WidgetId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
