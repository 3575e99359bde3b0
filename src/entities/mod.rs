// Catalog Entities
// Read-only records projected from the `restaurants` and `dishes` tables.
//
// Rows are read with `SELECT *` and mapped by column name. Known columns land
// in typed fields; any other column the store carries is kept in `extra` and
// serialized next to them, so a client sees every column of the row.

pub mod restaurant;
pub mod dish;
pub mod flag;

pub use restaurant::Restaurant;
pub use dish::Dish;
pub use flag::Flag;

use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde_json::Value;
use std::collections::BTreeMap;

/// Value of an optional column, `None` when the table doesn't have it
fn optional_column<T: rusqlite::types::FromSql>(
    row: &Row<'_>,
    name: &str,
) -> rusqlite::Result<Option<T>> {
    match row.as_ref().column_index(name) {
        Ok(index) => row.get(index),
        Err(_) => Ok(None),
    }
}

/// Every column of the row not named in `known`, as JSON
fn extra_columns(row: &Row<'_>, known: &[&str]) -> rusqlite::Result<BTreeMap<String, Value>> {
    let mut extra = BTreeMap::new();

    for (index, name) in row.as_ref().column_names().into_iter().enumerate() {
        if known.iter().any(|k| k.eq_ignore_ascii_case(name)) {
            continue;
        }
        let value = match row.get_ref(index)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::from(b.to_vec()),
        };
        extra.insert(name.to_string(), value);
    }

    Ok(extra)
}
