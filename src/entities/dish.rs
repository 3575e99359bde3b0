// 🥗 Dish Entity

use rusqlite::Row;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{extra_columns, optional_column, Flag};

const KNOWN_COLUMNS: [&str; 4] = ["id", "name", "isVeg", "price"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub is_veg: bool,
    pub price: f64,
    #[serde(skip)]
    pub extra: BTreeMap<String, Value>,
}

impl Dish {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Dish {
            id: row.get("id")?,
            name: optional_column(row, "name")?,
            is_veg: row.get::<_, Flag>("isVeg")?.0,
            price: row.get("price")?,
            extra: extra_columns(row, &KNOWN_COLUMNS)?,
        })
    }
}

impl Serialize for Dish {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        map.serialize_entry("isVeg", &self.is_veg)?;
        map.serialize_entry("price", &self.price)?;
        for (column, value) in &self.extra {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
