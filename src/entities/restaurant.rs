// 🍽️ Restaurant Entity

use rusqlite::Row;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{extra_columns, optional_column, Flag};

/// Columns mapped to typed fields; everything else goes to `extra`
const KNOWN_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "cuisine",
    "isVeg",
    "hasOutdoorSeating",
    "isLuxury",
    "rating",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Unique key, at most one row per id
    pub id: i64,

    /// Only present when the store has a `name` column
    #[serde(default)]
    pub name: Option<String>,

    /// Cuisine category, matched exactly (case-sensitive)
    pub cuisine: String,

    pub is_veg: bool,
    pub has_outdoor_seating: bool,
    pub is_luxury: bool,

    /// Score used by the sort-by-rating listing
    pub rating: f64,

    /// Store columns beyond the ones above, serialized as-is
    #[serde(skip)]
    pub extra: BTreeMap<String, Value>,
}

impl Restaurant {
    /// Map one `SELECT *` row by column name
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Restaurant {
            id: row.get("id")?,
            name: optional_column(row, "name")?,
            cuisine: row.get("cuisine")?,
            is_veg: row.get::<_, Flag>("isVeg")?.0,
            has_outdoor_seating: row.get::<_, Flag>("hasOutdoorSeating")?.0,
            is_luxury: row.get::<_, Flag>("isLuxury")?.0,
            rating: row.get("rating")?,
            extra: extra_columns(row, &KNOWN_COLUMNS)?,
        })
    }
}

impl Serialize for Restaurant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        map.serialize_entry("cuisine", &self.cuisine)?;
        map.serialize_entry("isVeg", &self.is_veg)?;
        map.serialize_entry("hasOutdoorSeating", &self.has_outdoor_seating)?;
        map.serialize_entry("isLuxury", &self.is_luxury)?;
        map.serialize_entry("rating", &self.rating)?;
        for (column, value) in &self.extra {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
